//! HTTP gateway exposing the unified client.
//!
//! | Route | Behavior |
//! |-------|----------|
//! | `GET /health` | liveness |
//! | `GET /region` | resolved region |
//! | `GET /planes/:plane` | build/describe the `control` or `data` handle |
//! | `GET /operations/:operation/route` | routing decision, nothing invoked |
//! | `POST /operations/:operation` | invoke with the JSON object body as arguments |

pub mod handlers;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::unified::UnifiedClient;

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<UnifiedClient>,
}

pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/region", get(handlers::region_handler))
        .route("/planes/:plane", get(handlers::plane_handler))
        .route("/operations/:operation", post(handlers::invoke_handler))
        .route("/operations/:operation/route", get(handlers::route_handler))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_seconds),
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
