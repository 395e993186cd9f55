//! Postgres feedback repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::{debug, info};

use super::{FeedbackStore, SubmissionFilter};
use crate::error::StoreError;
use crate::feedback::FeedbackSubmission;

const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS feedback_submissions (
    id                  TEXT PRIMARY KEY,
    user_id             TEXT,
    name                TEXT,
    email               TEXT,
    rating              SMALLINT NOT NULL CHECK (rating BETWEEN 1 AND 5),
    review              TEXT NOT NULL,
    ai_summary          TEXT NOT NULL,
    recommended_actions JSONB NOT NULL DEFAULT '[]'::jsonb,
    user_response       TEXT NOT NULL,
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW()
)"#;

const CREATE_INDEX_SQL: &str = r#"
CREATE INDEX IF NOT EXISTS feedback_submissions_created_at_idx
    ON feedback_submissions (created_at DESC)"#;

#[derive(Debug, FromRow)]
struct FeedbackRow {
    id: String,
    user_id: Option<String>,
    name: Option<String>,
    email: Option<String>,
    rating: i16,
    review: String,
    ai_summary: String,
    recommended_actions: Json<Vec<String>>,
    user_response: String,
    created_at: DateTime<Utc>,
}

impl From<FeedbackRow> for FeedbackSubmission {
    fn from(row: FeedbackRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            rating: row.rating.clamp(1, 5) as u8,
            review: row.review,
            ai_summary: row.ai_summary,
            recommended_actions: row.recommended_actions.0,
            user_response: row.user_response,
            created_at: row.created_at,
        }
    }
}

/// Postgres-backed [`FeedbackStore`]
#[derive(Clone, Debug)]
pub struct PgFeedbackStore {
    pool: PgPool,
}

impl PgFeedbackStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the submissions table and index if missing
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE_SQL).execute(&self.pool).await?;
        sqlx::query(CREATE_INDEX_SQL).execute(&self.pool).await?;
        info!("feedback_submissions schema ready");
        Ok(())
    }
}

#[async_trait]
impl FeedbackStore for PgFeedbackStore {
    async fn create(&self, submission: &FeedbackSubmission) -> Result<(), StoreError> {
        sqlx::query(
            r#"INSERT INTO feedback_submissions (id, user_id, name, email, rating, review, ai_summary, recommended_actions, user_response, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"#,
        )
        .bind(&submission.id)
        .bind(&submission.user_id)
        .bind(&submission.name)
        .bind(&submission.email)
        .bind(i16::from(submission.rating))
        .bind(&submission.review)
        .bind(&submission.ai_summary)
        .bind(Json(&submission.recommended_actions))
        .bind(&submission.user_response)
        .bind(submission.created_at)
        .execute(&self.pool)
        .await?;

        debug!("Created feedback submission {}", submission.id);
        Ok(())
    }

    async fn list(&self, filter: &SubmissionFilter) -> Result<Vec<FeedbackSubmission>, StoreError> {
        let rows = sqlx::query_as::<_, FeedbackRow>(
            r#"SELECT id, user_id, name, email, rating, review, ai_summary, recommended_actions, user_response, created_at FROM feedback_submissions WHERE ($1::SMALLINT IS NULL OR rating = $1) AND ($2::TEXT IS NULL OR user_id = $2) ORDER BY created_at DESC LIMIT $3"#,
        )
        .bind(filter.rating.map(i16::from))
        .bind(filter.user_id.as_deref())
        .bind(filter.limit.map(|l| l as i64))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(FeedbackSubmission::from).collect())
    }

    fn backend_name(&self) -> &str {
        "postgres"
    }
}
