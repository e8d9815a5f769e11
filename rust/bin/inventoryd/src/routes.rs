//! Route registration — collects module routes + system endpoints.

use std::sync::Arc;

use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tracing::debug;

use crate::cors::{self, CorsConfig};

/// Build the complete router with all routes.
pub fn build_router(module_routes: Vec<(String, Router)>, cors: Arc<CorsConfig>) -> Router {
    // System endpoints (public, no state needed).
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/version", get(version));

    // Module routes are already Router<()> (they called .with_state() internally).
    for (name, router) in module_routes {
        debug!("Mounting routes for module {}", name);
        app = app.merge(router);
    }

    app.layer(middleware::from_fn_with_state(cors, cors::cors_middleware))
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "inventoryd",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
