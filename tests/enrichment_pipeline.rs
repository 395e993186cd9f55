//! End-to-end enrichment pipeline tests against stub providers.
//!
//! Run with: cargo test --test enrichment_pipeline

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use feedback_enrich::ai::{AiError, AiResult, GenerationClient, LlmClient};
use feedback_enrich::feedback::enrichment::{
    gibberish_result, summary_fallback, ACTIONS_FALLBACK, REPLY_FALLBACK,
};
use feedback_enrich::{is_gibberish, FeedbackEnricher, FeedbackInput};

// ── Stub providers ─────────────────────────────────────────────

/// Deterministic replies keyed on which template produced the prompt
struct TemplateStub {
    calls: AtomicUsize,
    actions: &'static str,
}

impl TemplateStub {
    fn new(actions: &'static str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            actions,
        })
    }
}

#[async_trait]
impl LlmClient for TemplateStub {
    async fn generate(&self, prompt: &str) -> AiResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let text = if prompt.contains("customer service AI") {
            "Thank you, we're glad you enjoyed it!"
        } else if prompt.contains("summarizing customer feedback") {
            "Positive review of the food quality."
        } else {
            self.actions
        };
        Ok(text.to_string())
    }
    fn model_name(&self) -> &str {
        "template-stub"
    }
    fn provider_name(&self) -> &str {
        "Test"
    }
}

/// Fails every call
struct FailingStub {
    calls: AtomicUsize,
}

#[async_trait]
impl LlmClient for FailingStub {
    async fn generate(&self, _prompt: &str) -> AiResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(AiError::Api {
            status: 503,
            body: "service unavailable".to_string(),
        })
    }
    fn model_name(&self) -> &str {
        "failing-stub"
    }
    fn provider_name(&self) -> &str {
        "Test"
    }
}

/// Never answers in time
struct HangingStub;

#[async_trait]
impl LlmClient for HangingStub {
    async fn generate(&self, _prompt: &str) -> AiResult<String> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok("too late".to_string())
    }
    fn model_name(&self) -> &str {
        "hanging-stub"
    }
    fn provider_name(&self) -> &str {
        "Test"
    }
}

/// Answers after a fixed delay
struct SleepingStub {
    delay: Duration,
}

#[async_trait]
impl LlmClient for SleepingStub {
    async fn generate(&self, _prompt: &str) -> AiResult<String> {
        tokio::time::sleep(self.delay).await;
        Ok("Add more seating near the windows".to_string())
    }
    fn model_name(&self) -> &str {
        "sleeping-stub"
    }
    fn provider_name(&self) -> &str {
        "Test"
    }
}

fn enricher(provider: Arc<dyn LlmClient>) -> FeedbackEnricher {
    FeedbackEnricher::new(GenerationClient::new(provider))
}

fn review(rating: i64, text: &str) -> FeedbackInput {
    FeedbackInput::new(rating, text).unwrap()
}

// ── Tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_deterministic_provider_gives_identical_results() {
    let stub = TemplateStub::new(r#"["Keep the seasonal menu", "Highlight the chef's specials"]"#);
    let enricher = enricher(stub.clone());
    let input = review(5, "The risotto was perfectly cooked and seasoned.");

    let first = enricher.enrich(&input).await;
    let second = enricher.enrich(&input).await;

    assert_eq!(first, second);
    assert_eq!(stub.calls.load(Ordering::SeqCst), 6);
}

#[tokio::test]
async fn test_long_json_array_is_cut_to_three() {
    let stub = TemplateStub::new(
        r#"["Hire another barista", "Open earlier on weekends", "Add oat milk", "Repaint the sign", "Offer loyalty cards"]"#,
    );
    let result = enricher(stub)
        .enrich(&review(4, "Good coffee but the queue is always long."))
        .await;

    assert_eq!(
        result.recommended_actions,
        vec![
            "Hire another barista",
            "Open earlier on weekends",
            "Add oat milk"
        ]
    );
}

#[tokio::test]
async fn test_fenced_json_actions() {
    let stub = TemplateStub::new("```json\n[\"Fix the wobbly tables\", \"Dim the lighting\"]\n```");
    let result = enricher(stub)
        .enrich(&review(3, "Tables wobble and the lights are harsh."))
        .await;

    assert_eq!(
        result.recommended_actions,
        vec!["Fix the wobbly tables", "Dim the lighting"]
    );
}

#[tokio::test]
async fn test_bullet_prose_actions() {
    let stub = TemplateStub::new(
        "- Train staff to greet guests promptly\n- Add a second cashier at lunch\n- Ok",
    );
    let result = enricher(stub)
        .enrich(&review(2, "Nobody greeted us and lunch took forever."))
        .await;

    assert_eq!(
        result.recommended_actions,
        vec![
            "Train staff to greet guests promptly",
            "Add a second cashier at lunch"
        ]
    );
}

#[tokio::test]
async fn test_failing_provider_still_completes() {
    let stub = Arc::new(FailingStub {
        calls: AtomicUsize::new(0),
    });
    let result = enricher(stub.clone())
        .enrich(&review(2, "Delivery arrived an hour late and cold."))
        .await;

    assert_eq!(result.user_reply, REPLY_FALLBACK);
    assert_eq!(result.admin_summary, summary_fallback(2));
    assert_eq!(result.recommended_actions, ACTIONS_FALLBACK.to_vec());
    assert_eq!(stub.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_resolves_to_fallbacks() {
    let client = GenerationClient::new(Arc::new(HangingStub)).with_timeout(Duration::from_secs(5));
    let result = FeedbackEnricher::new(client)
        .enrich(&review(4, "Nice view from the balcony seats."))
        .await;

    assert_eq!(result.user_reply, REPLY_FALLBACK);
    assert_eq!(result.admin_summary, summary_fallback(4));
    assert_eq!(result.recommended_actions.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_artifact_calls_overlap() {
    let delay = Duration::from_secs(2);
    let enricher = enricher(Arc::new(SleepingStub { delay }));

    let started = tokio::time::Instant::now();
    let result = enricher
        .enrich(&review(4, "Cozy place but it gets crowded at lunch."))
        .await;
    let elapsed = started.elapsed();

    assert_eq!(result.user_reply, "Add more seating near the windows");
    assert!(elapsed >= delay, "elapsed {elapsed:?}");
    assert!(elapsed < delay * 2, "calls ran one after another: {elapsed:?}");
}

#[tokio::test]
async fn test_gibberish_makes_no_calls() {
    let stub = TemplateStub::new("[]");
    let enricher = enricher(stub.clone());

    for text in ["aaaaaaa", "zxcvzxcv", "ok", "1234567890!!"] {
        assert!(is_gibberish(text), "{text:?} should be gibberish");
        let result = enricher.enrich(&review(3, text)).await;
        assert_eq!(result, gibberish_result(3));
    }
    assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
}
