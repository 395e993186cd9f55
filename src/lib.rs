//! Feedback Enrich - customer feedback backend
//!
//! Collects star ratings with free-text reviews and augments each submission
//! with generated text before it is stored:
//!
//! ```text
//! (rating, review) → Gibberish gate → 3 × (Prompt → Generate → Parse) → EnrichmentResult
//! ```
//!
//! The three generation calls run concurrently and each one falls back to
//! fixed text on failure, so enrichment never fails from the caller's side.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use feedback_enrich::ai::{gemini::GeminiClient, AiConfig, GenerationClient};
//! use feedback_enrich::feedback::{enrichment::FeedbackEnricher, FeedbackInput};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let provider = GeminiClient::new(AiConfig::from_env()?)?;
//! let enricher = FeedbackEnricher::new(GenerationClient::new(Arc::new(provider)));
//!
//! let input = FeedbackInput::new(4, "Fast delivery, but the box was damaged.")?;
//! let result = enricher.enrich(&input).await;
//! println!("{}", result.user_reply);
//! # Ok(())
//! # }
//! ```

// Core error handling
pub mod error;

// Environment-driven configuration
pub mod config;

// Generation provider clients
pub mod ai;

// Feedback domain: classifier, prompts, parser, orchestrator, insights
pub mod feedback;

// Persistence collaborator
pub mod database;

// REST API (when enabled)
#[cfg(feature = "server")]
pub mod api;

// Essential re-exports
pub use ai::{AiError, AiResult, GenerationClient, LlmClient};
pub use config::AppConfig;
pub use database::{FeedbackStore, InMemoryFeedbackStore, SubmissionFilter};
pub use error::{ConfigError, StoreError, ValidationError};
pub use feedback::enrichment::FeedbackEnricher;
pub use feedback::gibberish::is_gibberish;
pub use feedback::insights::{FeedbackStats, InsightAnswer, InsightService};
pub use feedback::{EnrichmentResult, FeedbackInput, FeedbackSubmission};
