use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;

use super::common::{created_response, map_service_error, success_response, validate_input};
use crate::errors::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReferralRequest {
    #[validate(email)]
    pub inviter_email: String,
    #[validate(email)]
    pub invited_email: String,
}

/// Credits the configured referral bonus to the inviter, once per invitee.
#[utoipa::path(
    post,
    path = "/api/v1/referrals",
    request_body = CreateReferralRequest,
    responses(
        (status = 201, description = "Referral bonus credited"),
        (status = 400, description = "Invalid emails or self-referral"),
        (status = 409, description = "Bonus already credited for this invitee")
    ),
    tag = "referrals"
)]
pub async fn create_referral(
    State(state): State<Arc<AppState>>,
    axum::Json(payload): axum::Json<CreateReferralRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let created = state
        .services
        .referrals
        .credit(&payload.inviter_email, &payload.invited_email)
        .await
        .map_err(map_service_error)?;

    info!(
        "Referral credited: {} invited {}",
        payload.inviter_email, payload.invited_email
    );

    Ok(created_response(created))
}

/// Referral records where this seller is the inviter.
#[utoipa::path(
    get,
    path = "/api/v1/sellers/{email}/referrals",
    params(("email" = String, Path, description = "Seller email")),
    responses((status = 200, description = "Referrals credited to the seller", body = Vec<crate::entities::referral::Model>)),
    tag = "referrals"
)]
pub async fn list_referrals(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let referrals = state
        .services
        .referrals
        .list_for_inviter(&email)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(referrals))
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/referrals", post(create_referral))
        .route("/sellers/:email/referrals", get(list_referrals))
}
