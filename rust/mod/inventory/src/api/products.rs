use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use inventory_core::ServiceError;

use crate::api::AppState;
use crate::model::{Product, ProductInput};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(replace_product).delete(delete_product),
        )
}

async fn list_products(
    State(svc): State<AppState>,
) -> Result<Json<Vec<Product>>, ServiceError> {
    let products = svc.list_products().map_err(ServiceError::from)?;
    Ok(Json(products))
}

async fn create_product(
    State(svc): State<AppState>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<Product>), ServiceError> {
    let product = svc.create_product(input).map_err(ServiceError::from)?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn get_product(
    State(svc): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>, ServiceError> {
    let product = svc.get_product(id).map_err(ServiceError::from)?;
    Ok(Json(product))
}

async fn replace_product(
    State(svc): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<ProductInput>,
) -> Result<Json<Product>, ServiceError> {
    let product = svc.replace_product(id, input).map_err(ServiceError::from)?;
    Ok(Json(product))
}

async fn delete_product(
    State(svc): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    svc.delete_product(id).map_err(ServiceError::from)?;
    Ok(StatusCode::NO_CONTENT)
}
