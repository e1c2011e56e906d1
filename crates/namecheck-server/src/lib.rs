//! Prediction service: one route that asks an external model whether a
//! personal name is realistic.
//!
//! The router is built from a [`ServerState`] holding the shared
//! [`Completion`] client, so tests can drive it with a stub provider.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::routing::{get, post};
use axum::Router;
use namecheck_llm::Completion;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared server state accessible from all handlers.
pub struct ServerState {
    /// Created once at startup and shared read-only by every request.
    pub completion: Arc<dyn Completion>,
    /// Answer malformed names locally before calling the provider.
    pub precheck: bool,
}

impl ServerState {
    pub fn new(completion: Arc<dyn Completion>, precheck: bool) -> Self {
        Self { completion, precheck }
    }
}

/// Builds the application router.
pub fn build_router(state: Arc<ServerState>) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %req.method(),
                uri = %req.uri(),
            )
        })
        .on_response(|res: &Response<Body>, latency: Duration, _span: &tracing::Span| {
            info!(
                latency = %format!("{} ms", latency.as_millis()),
                status = %res.status().as_u16(),
                "finished processing request"
            );
        });

    let logged_routes = Router::new()
        .route("/predict", post(handlers::predict::predict))
        .layer(trace_layer);

    Router::new()
        .merge(logged_routes)
        .route("/health", get(handlers::health))
        .with_state(state)
}
