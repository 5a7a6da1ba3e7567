use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, put},
    Router,
};
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use super::common::{map_service_error, success_response};
use crate::errors::ApiError;
use crate::settlement::OrderStatus;
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// Operator status change with lifecycle enforcement.
#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Order updated"),
        (status = 400, description = "Illegal transition, including any mutation of a terminal order"),
        (status = 404, description = "Order not found")
    ),
    tag = "orders"
)]
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateStatusRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let updated = state
        .services
        .orders
        .update_status(id, payload.status)
        .await
        .map_err(map_service_error)?;

    info!("Order {} moved to {}", id, payload.status);

    Ok(success_response(updated))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "The order", body = crate::entities::order::Model),
        (status = 404, description = "Order not found")
    ),
    tag = "orders"
)]
pub async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let order = state
        .services
        .orders
        .get(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(order))
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/status", put(update_status))
}
