//! HTTP server: the plan-generation API plus static frontend serving.
//!
//! All state is read-only after startup and shared via `Arc`, so request
//! handlers never contend on anything; concurrency comes entirely from the
//! surrounding runtime.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use thiserror::Error;
use tower_http::cors::CorsLayer;

use tasksmith_core::model::TextModel;
use tasksmith_core::plan::{self, PlanError, PlanRequest, RetryPolicy, Task};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Failures surfaced by the plan API, mapped to HTTP status + JSON body.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body was not valid JSON.
    #[error("Invalid JSON payload.")]
    InvalidPayload,

    /// The `goal` field was missing, empty, or not a string.
    #[error("Goal text is required.")]
    MissingGoal,

    /// No API key was configured at startup. No remote call is made.
    #[error("API key is not configured on the server.")]
    NotConfigured,

    /// Generation failed after the retry budget; carries the final cause.
    #[error("Failed to generate plan. Detail: {0}")]
    Upstream(PlanError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidPayload | Self::MissingGoal => StatusCode::BAD_REQUEST,
            Self::NotConfigured | Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Server state
// ---------------------------------------------------------------------------

/// Process-wide read-only dependencies, constructed once at startup.
pub struct AppState {
    /// The configured text model; `None` when no API key was provided, in
    /// which case every plan request fails with [`ApiError::NotConfigured`].
    pub model: Option<Arc<dyn TextModel>>,
    /// Retry schedule for plan generation.
    pub retry: RetryPolicy,
    /// Directory the static frontend is served from.
    pub frontend_dir: PathBuf,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/generate-plan", post(generate_plan))
        .route("/{filename}", get(asset))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(state: Arc<AppState>, bind: &str, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("tasksmith listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("tasksmith shut down");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Extract a non-empty goal from the request body.
///
/// Invalid JSON and a missing/empty/non-string `goal` are distinguished so
/// the client sees which part of the contract it broke. Validation runs
/// before the configured-model check: a bad request is a 400 even when the
/// service carries no credential.
fn parse_goal(body: &[u8]) -> Result<String, ApiError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|_| ApiError::InvalidPayload)?;
    let request: PlanRequest = serde_json::from_value(value).map_err(|_| ApiError::MissingGoal)?;
    if request.goal.is_empty() {
        return Err(ApiError::MissingGoal);
    }
    Ok(request.goal)
}

async fn generate_plan(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Vec<Task>>, ApiError> {
    let goal = parse_goal(&body)?;

    let model = state.model.as_deref().ok_or(ApiError::NotConfigured)?;

    let tasks = plan::generate_plan(model, &goal, &state.retry)
        .await
        .map_err(|e| match e {
            PlanError::EmptyGoal => ApiError::MissingGoal,
            e => {
                tracing::error!(error = %e, "plan generation failed");
                ApiError::Upstream(e)
            }
        })?;

    Ok(Json(tasks))
}

async fn index(State(state): State<Arc<AppState>>) -> Response {
    let path = state.frontend_dir.join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "frontend entry not readable");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("frontend entry not available: {e}"),
            )
                .into_response()
        }
    }
}

/// Content type for servable asset names. `None` for anything that is not
/// a plain `.css`/`.js` filename.
fn asset_content_type(filename: &str) -> Option<&'static str> {
    if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
        return None;
    }
    if filename.ends_with(".css") {
        Some("text/css")
    } else if filename.ends_with(".js") {
        Some("application/javascript")
    } else {
        None
    }
}

async fn asset(State(state): State<Arc<AppState>>, Path(filename): Path<String>) -> Response {
    let Some(content_type) = asset_content_type(&filename) else {
        return (StatusCode::NOT_FOUND, "not found").into_response();
    };

    match tokio::fs::read(state.frontend_dir.join(&filename)).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type)], bytes).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
