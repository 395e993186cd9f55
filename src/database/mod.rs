//! Feedback persistence
//!
//! [`FeedbackStore`] is injected into the API layer. The in-memory store is
//! always available; the Postgres store needs the `database` feature.

#[cfg(feature = "database")]
pub mod feedback_repository;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::feedback::FeedbackSubmission;

#[cfg(feature = "database")]
pub use feedback_repository::PgFeedbackStore;

/// Query options for listing submissions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionFilter {
    pub rating: Option<u8>,
    pub user_id: Option<String>,
    pub limit: Option<usize>,
}

impl SubmissionFilter {
    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, submission: &FeedbackSubmission) -> bool {
        self.rating.map_or(true, |r| submission.rating == r)
            && self
                .user_id
                .as_deref()
                .map_or(true, |u| submission.user_id.as_deref() == Some(u))
    }
}

/// Persistence collaborator for feedback submissions
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Persist a new submission
    async fn create(&self, submission: &FeedbackSubmission) -> Result<(), StoreError>;

    /// Matching submissions, newest first
    async fn list(&self, filter: &SubmissionFilter) -> Result<Vec<FeedbackSubmission>, StoreError>;

    /// Short backend name for logging
    fn backend_name(&self) -> &str;
}

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryFeedbackStore {
    submissions: RwLock<Vec<FeedbackSubmission>>,
}

impl InMemoryFeedbackStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FeedbackStore for InMemoryFeedbackStore {
    async fn create(&self, submission: &FeedbackSubmission) -> Result<(), StoreError> {
        self.submissions.write().await.push(submission.clone());
        Ok(())
    }

    async fn list(&self, filter: &SubmissionFilter) -> Result<Vec<FeedbackSubmission>, StoreError> {
        let guard = self.submissions.read().await;
        let mut matching: Vec<FeedbackSubmission> =
            guard.iter().filter(|s| filter.matches(s)).cloned().collect();
        drop(guard);

        // Stable sort keeps insertion order reversed for equal timestamps
        matching.reverse();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        if let Some(limit) = filter.limit {
            matching.truncate(limit);
        }
        Ok(matching)
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}
