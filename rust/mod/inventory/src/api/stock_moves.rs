use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use inventory_core::ServiceError;

use crate::api::AppState;
use crate::model::{MoveInput, StockMove};

/// The ledger is append-only: list and create, no update or delete.
pub fn routes() -> Router<AppState> {
    Router::new().route("/stock_moves", get(list_moves).post(create_move))
}

async fn list_moves(
    State(svc): State<AppState>,
) -> Result<Json<Vec<StockMove>>, ServiceError> {
    let moves = svc.list_moves().map_err(ServiceError::from)?;
    Ok(Json(moves))
}

async fn create_move(
    State(svc): State<AppState>,
    Json(input): Json<MoveInput>,
) -> Result<(StatusCode, Json<StockMove>), ServiceError> {
    let entry = svc.apply_move(input).map_err(ServiceError::from)?;
    Ok((StatusCode::CREATED, Json(entry)))
}
