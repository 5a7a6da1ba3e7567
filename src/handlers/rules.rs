use std::sync::Arc;

use axum::{extract::State, routing::get, Router};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use super::common::success_response;
use crate::errors::ApiError;
use crate::AppState;

/// Business rules consumed (not computed) by the settlement core and the
/// surrounding flows. Dashboards read them from here instead of hardcoding.
#[derive(Debug, Serialize, ToSchema)]
pub struct BusinessRules {
    pub minimum_withdraw_amount: Decimal,
    pub referral_bonus_amount: Decimal,
    /// Reduces the invited seller's membership price at purchase time; never
    /// part of the inviter's balance.
    pub referral_discount_amount: Decimal,
    pub in_city_delivery_charge: Decimal,
    pub out_of_city_delivery_charge: Decimal,
}

#[utoipa::path(
    get,
    path = "/api/v1/rules",
    responses((status = 200, description = "Configured business rules", body = BusinessRules)),
    tag = "rules"
)]
pub async fn get_rules(
    State(state): State<Arc<AppState>>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let cfg = &state.config;
    Ok(success_response(BusinessRules {
        minimum_withdraw_amount: cfg.minimum_withdraw_amount,
        referral_bonus_amount: cfg.referral_bonus_amount,
        referral_discount_amount: cfg.referral_discount_amount,
        in_city_delivery_charge: cfg.in_city_delivery_charge,
        out_of_city_delivery_charge: cfg.out_of_city_delivery_charge,
    }))
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/rules", get(get_rules))
}
