//! HTTP surface: routes, CORS, and the handler boundary where every failure
//! becomes a structured JSON response.

use crate::error::RelayError;
use crate::models::{ProbeReport, RelayRequest, RelayResponse};
use crate::relay::Relay;
use crate::Error;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header::CONTENT_TYPE, Method, StatusCode},
    routing::{any, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info_span, Instrument};
use uuid::Uuid;

pub const RELAY_PATH: &str = "/api/gemini";
pub const PROBE_PATH: &str = "/api/test-gemini";

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay>,
}

impl AppState {
    pub fn new(relay: Relay) -> Self {
        Self {
            relay: Arc::new(relay),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            RELAY_PATH,
            post(relay_handler).fallback(method_not_allowed),
        )
        .route(PROBE_PATH, any(probe_handler))
        .fallback(not_found_handler)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Permissive CORS; every OPTIONS request is answered here with 200 and an
/// empty body before reaching a handler.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}

async fn relay_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<RelayResponse>, RelayError> {
    let span = info_span!("relay", request_id = %Uuid::new_v4());

    // Unreadable or oversized bodies still get the JSON error shape.
    let body = body.map_err(|rejection| {
        span.in_scope(|| tracing::error!("Server error: {}", rejection.body_text()));
        RelayError::Internal(rejection.body_text())
    })?;

    relay_body(&state.relay, &body).instrument(span).await
}

async fn relay_body(relay: &Relay, body: &[u8]) -> Result<Json<RelayResponse>, RelayError> {
    let request: RelayRequest = serde_json::from_slice(body).map_err(|e| {
        tracing::error!("Server error: {}", e);
        Error::from(e)
    })?;

    let response = relay.relay(request).await?;
    Ok(Json(RelayResponse { response }))
}

async fn probe_handler(State(state): State<AppState>) -> Result<Json<ProbeReport>, RelayError> {
    let span = info_span!("probe", request_id = %Uuid::new_v4());
    state.relay.probe().instrument(span).await.map(Json)
}

async fn method_not_allowed() -> RelayError {
    RelayError::MethodNotAllowed
}

async fn not_found_handler() -> StatusCode {
    StatusCode::NOT_FOUND
}
