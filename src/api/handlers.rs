//! HTTP request handlers

use super::sse::sse_stream;
use super::sample::sample_messages;
use super::types::{
    ErrorResponse, QueuedResponse, RetryRequest, SessionQuery, SessionView, SubmitRequest,
    SuccessResponse,
};
use super::AppState;
use crate::activity::{ActivityEvent, ActivitySnapshot};
use crate::runtime::RuntimeStopped;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Session snapshot and streaming
        .route("/api/session", get(get_session))
        .route("/api/session/stream", get(stream_session))
        // User actions
        .route("/api/session/messages", post(submit_message))
        .route("/api/session/retry", post(retry_message))
        .route("/api/session/reset", post(reset_session))
        // Agent activity
        .route("/api/activity", get(get_activity).post(record_activity))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Session
// ============================================================

async fn get_session(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Json<SessionView> {
    let view = SessionView::from(&state.conversation.snapshot());
    if query.sample {
        Json(view.with_sample(&sample_messages()))
    } else {
        Json(view)
    }
}

async fn stream_session(State(state): State<AppState>) -> impl IntoResponse {
    sse_stream(state.conversation.subscribe())
}

// ============================================================
// User Actions
// ============================================================

async fn submit_message(
    State(state): State<AppState>,
    Json(req): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<QueuedResponse>), AppError> {
    state.conversation.submit(req.text).await?;
    Ok((StatusCode::ACCEPTED, Json(QueuedResponse { queued: true })))
}

async fn retry_message(
    State(state): State<AppState>,
    body: Option<Json<RetryRequest>>,
) -> Result<(StatusCode, Json<QueuedResponse>), AppError> {
    let requested = body
        .and_then(|Json(req)| req.text)
        .filter(|text| !text.trim().is_empty());

    let text = match requested {
        Some(text) => text,
        None => state
            .conversation
            .snapshot()
            .session
            .last_user_text()
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest("Nothing to retry".to_string()))?,
    };

    state.conversation.retry(text).await?;
    Ok((StatusCode::ACCEPTED, Json(QueuedResponse { queued: true })))
}

async fn reset_session(State(state): State<AppState>) -> Result<Json<SuccessResponse>, AppError> {
    state.conversation.reset().await?;
    Ok(Json(SuccessResponse { success: true }))
}

// ============================================================
// Activity
// ============================================================

async fn get_activity(State(state): State<AppState>) -> Json<ActivitySnapshot> {
    Json(state.activity.snapshot())
}

async fn record_activity(
    State(state): State<AppState>,
    Json(event): Json<ActivityEvent>,
) -> Json<SuccessResponse> {
    tracing::debug!(kind = ?event.kind, message = %event.message, "Activity recorded");
    state.activity.record(event);
    Json(SuccessResponse { success: true })
}

async fn get_version() -> &'static str {
    concat!("victory-path ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Internal(String),
}

impl From<RuntimeStopped> for AppError {
    fn from(e: RuntimeStopped) -> Self {
        tracing::error!(error = %e, "Dropping request");
        AppError::Internal(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
