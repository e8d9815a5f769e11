use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use inventory_core::ServiceError;

use crate::api::AppState;
use crate::model::{Supplier, SupplierInput};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/suppliers", get(list_suppliers).post(create_supplier))
        .route(
            "/suppliers/{id}",
            get(get_supplier)
                .put(replace_supplier)
                .delete(delete_supplier),
        )
}

async fn list_suppliers(
    State(svc): State<AppState>,
) -> Result<Json<Vec<Supplier>>, ServiceError> {
    let suppliers = svc.list_suppliers().map_err(ServiceError::from)?;
    Ok(Json(suppliers))
}

async fn create_supplier(
    State(svc): State<AppState>,
    Json(input): Json<SupplierInput>,
) -> Result<(StatusCode, Json<Supplier>), ServiceError> {
    let supplier = svc.create_supplier(input).map_err(ServiceError::from)?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

async fn get_supplier(
    State(svc): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Supplier>, ServiceError> {
    let supplier = svc.get_supplier(id).map_err(ServiceError::from)?;
    Ok(Json(supplier))
}

async fn replace_supplier(
    State(svc): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<SupplierInput>,
) -> Result<Json<Supplier>, ServiceError> {
    let supplier = svc
        .replace_supplier(id, input)
        .map_err(ServiceError::from)?;
    Ok(Json(supplier))
}

async fn delete_supplier(
    State(svc): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    svc.delete_supplier(id).map_err(ServiceError::from)?;
    Ok(StatusCode::NO_CONTENT)
}
