//! Feedback API endpoints

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{ApiError, AppState};
use crate::database::SubmissionFilter;
use crate::error::ValidationError;
use crate::feedback::insights::FeedbackStats;
use crate::feedback::{FeedbackInput, FeedbackSubmission, Submitter, MAX_RATING, MIN_RATING};

// Request/response types
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeedbackRequest {
    pub rating: i64,
    pub review: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeedbackResponse {
    pub success: bool,
    pub ai_response: String,
    pub submission_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionsQuery {
    pub rating: Option<i64>,
    pub user_id: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SubmissionsResponse {
    pub success: bool,
    pub submissions: Vec<FeedbackSubmission>,
    pub count: usize,
}

/// POST /api/feedback/submit
async fn submit_feedback(
    State(state): State<AppState>,
    payload: Result<Json<SubmitFeedbackRequest>, JsonRejection>,
) -> Result<Json<SubmitFeedbackResponse>, ApiError> {
    let Json(req) = payload?;
    let input = FeedbackInput::new(req.rating, &req.review)?;

    let enrichment = state.enricher.enrich(&input).await;
    let submitter = Submitter {
        user_id: req.user_id,
        name: req.name,
        email: req.email,
    };
    let submission = FeedbackSubmission::new(&input, submitter, enrichment);
    state.store.create(&submission).await?;

    info!(
        id = %submission.id,
        rating = submission.rating,
        backend = state.store.backend_name(),
        "feedback submitted"
    );

    Ok(Json(SubmitFeedbackResponse {
        success: true,
        ai_response: submission.user_response,
        submission_id: submission.id,
    }))
}

/// GET /api/feedback/admin/submissions
async fn list_submissions(
    State(state): State<AppState>,
    Query(query): Query<SubmissionsQuery>,
) -> Result<Json<SubmissionsResponse>, ApiError> {
    let mut filter = SubmissionFilter::default();
    if let Some(rating) = query.rating {
        filter = filter.with_rating(rating_filter(rating)?);
    }
    if let Some(user_id) = query.user_id.filter(|u| !u.trim().is_empty()) {
        filter = filter.with_user(user_id);
    }
    if let Some(limit) = query.limit {
        filter = filter.with_limit(limit);
    }

    let submissions = state.store.list(&filter).await?;
    Ok(Json(SubmissionsResponse {
        success: true,
        count: submissions.len(),
        submissions,
    }))
}

/// GET /api/feedback/admin/stats
async fn feedback_stats(State(state): State<AppState>) -> Result<Json<FeedbackStats>, ApiError> {
    Ok(Json(state.insights.stats().await?))
}

fn rating_filter(rating: i64) -> Result<u8, ValidationError> {
    u8::try_from(rating)
        .ok()
        .filter(|r| (MIN_RATING..=MAX_RATING).contains(r))
        .ok_or(ValidationError::RatingOutOfRange(rating))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/feedback/submit", post(submit_feedback))
        .route("/api/feedback/admin/submissions", get(list_submissions))
        .route("/api/feedback/admin/stats", get(feedback_stats))
}
