use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::post,
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use super::common::{created_response, map_service_error, success_response, validate_input};
use crate::errors::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateWithdrawalRequest {
    pub amount: Decimal,
}

/// Operator decision on a pending withdrawal.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawalDecision {
    Approved,
    Rejected,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DecisionRequest {
    pub decision: WithdrawalDecision,
}

#[derive(Debug, Deserialize, validator::Validate)]
pub struct SellerPath {
    #[validate(email)]
    pub email: String,
}

/// Seller requests a withdrawal against their spendable balance.
#[utoipa::path(
    post,
    path = "/api/v1/sellers/{email}/withdrawals",
    params(("email" = String, Path, description = "Seller email")),
    request_body = CreateWithdrawalRequest,
    responses(
        (status = 201, description = "Withdrawal request created"),
        (status = 400, description = "Non-positive amount or below the configured minimum"),
        (status = 422, description = "Amount exceeds the spendable balance")
    ),
    tag = "withdrawals"
)]
pub async fn create_withdrawal(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
    axum::Json(payload): axum::Json<CreateWithdrawalRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&SellerPath {
        email: email.clone(),
    })?;

    let created = state
        .services
        .withdrawals
        .request(&email, payload.amount)
        .await
        .map_err(map_service_error)?;

    info!(
        "Withdrawal {} created for {} ({})",
        created.id, email, created.amount
    );

    Ok(created_response(created))
}

/// Operator approves or rejects a pending request, exactly once.
#[utoipa::path(
    post,
    path = "/api/v1/withdrawals/{id}/decision",
    params(("id" = Uuid, Path, description = "Withdrawal id")),
    request_body = DecisionRequest,
    responses(
        (status = 200, description = "Decision recorded"),
        (status = 404, description = "Withdrawal not found"),
        (status = 409, description = "Withdrawal was already decided")
    ),
    tag = "withdrawals"
)]
pub async fn decide_withdrawal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<DecisionRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let approve = matches!(payload.decision, WithdrawalDecision::Approved);
    let updated = state
        .services
        .withdrawals
        .decide(id, approve)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(updated))
}

/// All withdrawal requests for a seller, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/sellers/{email}/withdrawals",
    params(("email" = String, Path, description = "Seller email")),
    responses((status = 200, description = "Withdrawal requests, newest first", body = Vec<crate::entities::withdrawal::Model>)),
    tag = "withdrawals"
)]
pub async fn list_withdrawals(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let withdrawals = state
        .services
        .withdrawals
        .list(&email)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(withdrawals))
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/sellers/:email/withdrawals",
            post(create_withdrawal).get(list_withdrawals),
        )
        .route("/withdrawals/:id/decision", post(decide_withdrawal))
}
