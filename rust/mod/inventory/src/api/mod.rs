mod products;
mod stock_moves;
mod suppliers;

use std::sync::Arc;

use axum::Router;

use crate::service::InventoryService;

/// Shared application state.
pub type AppState = Arc<InventoryService>;

/// Build the complete inventory API router.
///
/// All resource routes live under `/api`, matching the paths the
/// browser client calls.
pub fn build_router(svc: Arc<InventoryService>) -> Router {
    let api = Router::new()
        .merge(products::routes())
        .merge(suppliers::routes())
        .merge(stock_moves::routes());

    Router::new().nest("/api", api).with_state(svc)
}
