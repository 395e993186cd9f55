//! Enrichment Orchestrator
//!
//! Gibberish gate first. Clean reviews fan out into three independent
//! prompt → generate → parse branches that run concurrently and are joined
//! before the result is assembled. Each branch resolves its own failure to
//! its own fallback, so `enrich` always returns a complete result.

use tracing::{debug, info, warn};

use super::gibberish::{classify, GibberishReason};
use super::parser::{parse_actions_with_source, parse_text, ActionsSource};
use super::prompts::build_prompt;
use super::{Artifact, EnrichmentResult, FeedbackInput, GenerationOutcome};
use crate::ai::GenerationClient;

// =============================================================================
// FALLBACK TEXT
// =============================================================================

/// Reply used when the reply call fails
pub const REPLY_FALLBACK: &str = "Thank you for your valuable feedback! We appreciate you taking the time to share your thoughts with us.";

/// Actions used when the actions call fails
pub const ACTIONS_FALLBACK: [&str; 3] = [
    "Review customer feedback regularly",
    "Address specific concerns raised",
    "Follow up with customer to ensure satisfaction",
];

/// Reply for reviews rejected by the gibberish gate
pub const GIBBERISH_REPLY: &str = "Thank you for your feedback! We'd love to hear more details about your experience so we can serve you better.";

/// Actions for reviews rejected by the gibberish gate
pub const GIBBERISH_ACTIONS: [&str; 3] = [
    "Request clarification from customer",
    "Follow up to understand the rating",
    "Encourage more detailed feedback",
];

/// Summary used when the summary call fails
pub fn summary_fallback(rating: u8) -> String {
    format!("Customer provided a {rating}-star review with feedback about their experience.")
}

/// Summary for reviews rejected by the gibberish gate
pub fn gibberish_summary(rating: u8) -> String {
    format!("Customer left a {rating}-star rating with unclear or invalid feedback text.")
}

/// Full fallback triple for gibberish reviews. No generation is involved.
pub fn gibberish_result(rating: u8) -> EnrichmentResult {
    EnrichmentResult {
        user_reply: GIBBERISH_REPLY.to_string(),
        admin_summary: gibberish_summary(rating),
        recommended_actions: GIBBERISH_ACTIONS.iter().map(|s| s.to_string()).collect(),
    }
}

// =============================================================================
// ORCHESTRATOR
// =============================================================================

/// Feedback enrichment pipeline
#[derive(Debug, Clone)]
pub struct FeedbackEnricher {
    client: GenerationClient,
}

impl FeedbackEnricher {
    pub fn new(client: GenerationClient) -> Self {
        Self { client }
    }

    /// Derive reply, summary and actions for one submission. Never fails.
    pub async fn enrich(&self, input: &FeedbackInput) -> EnrichmentResult {
        let rating = input.rating();
        let review = input.review();

        if let Some(reason) = classify(review) {
            info!(?reason, rating, "review flagged as gibberish, skipping generation");
            return gibberish_result(rating);
        }

        let (reply, summary, actions) = tokio::join!(
            self.generate(Artifact::Reply, rating, review),
            self.generate(Artifact::Summary, rating, review),
            self.generate(Artifact::Actions, rating, review),
        );

        let result = EnrichmentResult {
            user_reply: resolve_text(reply, Artifact::Reply, || REPLY_FALLBACK.to_string()),
            admin_summary: resolve_text(summary, Artifact::Summary, || summary_fallback(rating)),
            recommended_actions: resolve_actions(actions),
        };

        debug!(
            rating,
            actions = result.recommended_actions.len(),
            "enrichment assembled"
        );
        result
    }

    /// Reason the review would skip generation, if any
    pub fn gibberish_reason(&self, input: &FeedbackInput) -> Option<GibberishReason> {
        classify(input.review())
    }

    async fn generate(&self, artifact: Artifact, rating: u8, review: &str) -> GenerationOutcome {
        let prompt = build_prompt(artifact, rating, review);
        self.client.generate_for(artifact.label(), &prompt).await.into()
    }
}

/// Success → trimmed text; failure or blank output → fallback
fn resolve_text<F>(outcome: GenerationOutcome, artifact: Artifact, fallback: F) -> String
where
    F: FnOnce() -> String,
{
    match outcome {
        GenerationOutcome::Success(raw) => {
            let text = parse_text(&raw);
            if text.is_empty() {
                warn!(%artifact, "blank generation, using fallback");
                fallback()
            } else {
                text
            }
        }
        GenerationOutcome::Failure(reason) => {
            warn!(%artifact, %reason, "generation failed, using fallback");
            fallback()
        }
    }
}

fn resolve_actions(outcome: GenerationOutcome) -> Vec<String> {
    match outcome {
        GenerationOutcome::Success(raw) => {
            let (actions, source) = parse_actions_with_source(&raw);
            if source != ActionsSource::StrictJson {
                debug!(?source, "actions recovered by fallback parse stage");
            }
            actions
        }
        GenerationOutcome::Failure(reason) => {
            warn!(artifact = %Artifact::Actions, %reason, "generation failed, using fallback");
            ACTIONS_FALLBACK.iter().map(|s| s.to_string()).collect()
        }
    }
}
