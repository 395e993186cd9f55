//! Admin insights
//!
//! Dashboard statistics and natural-language questions over the stored
//! feedback history. Answers go through the same generation client as
//! enrichment and, like enrichment, never fail: a provider error turns into
//! a plain statistical summary.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::prompts::build_insight_prompt;
use super::{FeedbackSubmission, MAX_RATING, MIN_RATING};
use crate::ai::GenerationClient;
use crate::config::DEFAULT_INSIGHT_CONTEXT_LIMIT;
use crate::database::{FeedbackStore, SubmissionFilter};
use crate::error::{StoreError, ValidationError};

/// Answer returned when nothing has been submitted yet
pub const NO_FEEDBACK_ANSWER: &str =
    "There is no customer feedback yet. Once submissions arrive I can analyze trends, common complaints and recommended actions.";

/// Count of submissions for one star rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingBucket {
    pub rating: u8,
    pub count: usize,
}

/// Aggregate figures shown on the admin dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackStats {
    pub total: usize,
    /// 0.0 when there are no submissions
    pub average_rating: f64,
    /// Ordered 5 stars down to 1 star
    pub by_rating: Vec<RatingBucket>,
}

impl FeedbackStats {
    pub fn from_submissions(submissions: &[FeedbackSubmission]) -> Self {
        let total = submissions.len();
        let sum: u64 = submissions.iter().map(|s| u64::from(s.rating)).sum();
        let average_rating = if total == 0 {
            0.0
        } else {
            sum as f64 / total as f64
        };

        let by_rating = (MIN_RATING..=MAX_RATING)
            .rev()
            .map(|rating| RatingBucket {
                rating,
                count: submissions.iter().filter(|s| s.rating == rating).count(),
            })
            .collect();

        Self {
            total,
            average_rating,
            by_rating,
        }
    }

    /// Average rounded to one decimal, as displayed
    pub fn average_display(&self) -> String {
        format!("{:.1}", self.average_rating)
    }

    /// Deterministic prose summary used when generation is unavailable
    pub fn describe(&self) -> String {
        let distribution: Vec<String> = self
            .by_rating
            .iter()
            .map(|b| format!("{}★: {}", b.rating, b.count))
            .collect();
        format!(
            "Based on {} submission(s), the average rating is {}/5 ({}).",
            self.total,
            self.average_display(),
            distribution.join(", ")
        )
    }
}

/// Answer to an admin question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightAnswer {
    pub response: String,
    pub submissions_considered: usize,
    /// False when the answer is the statistical fallback
    pub generated: bool,
}

/// Insight service errors. Generation problems are not errors here.
#[derive(Debug, thiserror::Error)]
pub enum InsightError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Answers admin questions over the feedback history
#[derive(Clone)]
pub struct InsightService {
    store: Arc<dyn FeedbackStore>,
    client: GenerationClient,
    context_limit: usize,
}

impl InsightService {
    pub fn new(store: Arc<dyn FeedbackStore>, client: GenerationClient) -> Self {
        Self {
            store,
            client,
            context_limit: DEFAULT_INSIGHT_CONTEXT_LIMIT,
        }
    }

    /// Maximum number of recent submissions quoted into the prompt
    pub fn with_context_limit(mut self, limit: usize) -> Self {
        self.context_limit = limit.max(1);
        self
    }

    /// Statistics over every stored submission
    pub async fn stats(&self) -> Result<FeedbackStats, StoreError> {
        let all = self.store.list(&SubmissionFilter::default()).await?;
        Ok(FeedbackStats::from_submissions(&all))
    }

    /// Answer a natural-language question about the feedback
    pub async fn answer(&self, question: &str) -> Result<InsightAnswer, InsightError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ValidationError::EmptyQuestion.into());
        }

        let all = self.store.list(&SubmissionFilter::default()).await?;
        if all.is_empty() {
            return Ok(InsightAnswer {
                response: NO_FEEDBACK_ANSWER.to_string(),
                submissions_considered: 0,
                generated: false,
            });
        }

        let stats = FeedbackStats::from_submissions(&all);
        let recent = &all[..all.len().min(self.context_limit)];
        let prompt = build_insight_prompt(question, &stats, recent);

        let answer = match self.client.generate_for("insight", &prompt).await {
            Ok(text) if !text.trim().is_empty() => InsightAnswer {
                response: text.trim().to_string(),
                submissions_considered: recent.len(),
                generated: true,
            },
            Ok(_) => {
                warn!("blank insight generation, answering from statistics");
                fallback_answer(&stats, recent.len())
            }
            Err(e) => {
                warn!(error = %e, "insight generation failed, answering from statistics");
                fallback_answer(&stats, recent.len())
            }
        };

        info!(
            considered = answer.submissions_considered,
            generated = answer.generated,
            "admin question answered"
        );
        Ok(answer)
    }
}

fn fallback_answer(stats: &FeedbackStats, considered: usize) -> InsightAnswer {
    InsightAnswer {
        response: format!(
            "I couldn't run a detailed analysis right now. {}",
            stats.describe()
        ),
        submissions_considered: considered,
        generated: false,
    }
}
