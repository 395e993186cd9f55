//! REST API
//!
//! axum routes for the feedback form and the admin dashboard. All handlers
//! share one [`AppState`]; the store and the generation provider are chosen
//! by the binary and injected here.

pub mod admin_routes;
pub mod feedback_routes;

use std::sync::Arc;

use axum::{
    extract::rejection::JsonRejection,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::ai::GenerationClient;
use crate::database::FeedbackStore;
use crate::error::{ConfigError, StoreError, ValidationError};
use crate::feedback::enrichment::FeedbackEnricher;
use crate::feedback::insights::{InsightError, InsightService};

// =============================================================================
// STATE
// =============================================================================

#[derive(Clone)]
pub struct AppState {
    pub enricher: FeedbackEnricher,
    pub store: Arc<dyn FeedbackStore>,
    pub insights: InsightService,
}

impl AppState {
    pub fn new(
        client: GenerationClient,
        store: Arc<dyn FeedbackStore>,
        insight_context_limit: usize,
    ) -> Self {
        Self {
            enricher: FeedbackEnricher::new(client.clone()),
            insights: InsightService::new(store.clone(), client)
                .with_context_limit(insight_context_limit),
            store,
        }
    }
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

/// Handler failure, rendered as `{ success: false, error, details }`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(#[from] ValidationError),

    #[error("Invalid request body")]
    BadRequest(String),

    #[error("Failed to access feedback storage")]
    Store(#[from] StoreError),
}

impl From<InsightError> for ApiError {
    fn from(e: InsightError) -> Self {
        match e {
            InsightError::Validation(v) => ApiError::Validation(v),
            InsightError::Store(s) => ApiError::Store(s),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, details) = match &self {
            ApiError::Validation(e) => (StatusCode::BAD_REQUEST, vec![e.to_string()]),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, vec![msg.clone()]),
            ApiError::Store(e) => {
                error!(error = %e, "store operation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, Vec::new())
            }
        };

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            details,
        };
        (status, Json(body)).into_response()
    }
}

// =============================================================================
// ROUTER
// =============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

/// GET /api/health
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Full application router with CORS and request tracing.
///
/// `cors_origin` of `*` allows any origin.
pub fn create_router(state: AppState, cors_origin: &str) -> Result<Router, ConfigError> {
    Ok(Router::new()
        .route("/api/health", get(health_check))
        .merge(feedback_routes::routes())
        .merge(admin_routes::routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(cors_origin)?),
        )
        .with_state(state))
}

fn cors_layer(origin: &str) -> Result<CorsLayer, ConfigError> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if origin == "*" {
        return Ok(cors.allow_origin(Any));
    }
    let origin = origin
        .parse::<HeaderValue>()
        .map_err(|e| ConfigError::invalid("CORS_ORIGIN", origin, e.to_string()))?;
    Ok(cors.allow_origin(origin))
}
