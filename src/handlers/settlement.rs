use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Router,
};
use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use super::common::{map_service_error, success_response};
use crate::errors::ApiError;
use crate::settlement::{OrderRecord, SettlementWindow};
use crate::AppState;

/// Window selection: either a token (`today`, `3d`, `7d`, `15d`, `month`,
/// `3m`, `all`) or an explicit inclusive `from`/`to` date pair.
#[derive(Debug, Deserialize, IntoParams)]
pub struct WindowQuery {
    pub window: Option<String>,
    /// Inclusive start date, `YYYY-MM-DD` in the reporting timezone.
    pub from: Option<String>,
    /// Inclusive end date, `YYYY-MM-DD` in the reporting timezone.
    pub to: Option<String>,
}

impl WindowQuery {
    pub fn resolve(&self, offset: FixedOffset) -> Result<SettlementWindow, ApiError> {
        match (&self.from, &self.to) {
            (Some(from), Some(to)) => {
                let from = parse_day_start(from, offset)?;
                let to = parse_day_end(to, offset)?;
                if from > to {
                    return Err(ApiError::BadRequest(
                        "'from' must not be after 'to'".to_string(),
                    ));
                }
                Ok(SettlementWindow::Custom { from, to })
            }
            (None, None) => match &self.window {
                None => Ok(SettlementWindow::AllTime),
                Some(token) => SettlementWindow::parse(token).ok_or_else(|| {
                    ApiError::BadRequest(format!("Unknown window token '{}'", token))
                }),
            },
            _ => Err(ApiError::BadRequest(
                "Custom ranges need both 'from' and 'to'".to_string(),
            )),
        }
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| ApiError::BadRequest(format!("Invalid date '{}': {}", raw, e)))
}

fn parse_day_start(
    raw: &str,
    offset: FixedOffset,
) -> Result<chrono::DateTime<Utc>, ApiError> {
    let date = parse_date(raw)?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid date '{}'", raw)))?;
    to_utc(midnight, offset, raw)
}

fn parse_day_end(raw: &str, offset: FixedOffset) -> Result<chrono::DateTime<Utc>, ApiError> {
    let date = parse_date(raw)?;
    let end = date
        .and_hms_opt(23, 59, 59)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid date '{}'", raw)))?;
    to_utc(end, offset, raw)
}

fn to_utc(
    naive: chrono::NaiveDateTime,
    offset: FixedOffset,
    raw: &str,
) -> Result<chrono::DateTime<Utc>, ApiError> {
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| ApiError::BadRequest(format!("Ambiguous date '{}'", raw)))
}

/// Window-filtered order list plus the excluded-row count for the window.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderListResponse {
    pub orders: Vec<OrderRecord>,
    pub excluded_records: usize,
}

/// Spendable balance in whole Taka.
#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceResponse {
    pub seller_email: String,
    pub spendable_balance: i64,
}

/// Settlement report for one seller and window.
#[utoipa::path(
    get,
    path = "/api/v1/sellers/{email}/settlement",
    params(
        ("email" = String, Path, description = "Seller email"),
        WindowQuery
    ),
    responses(
        (status = 200, description = "Settlement report", body = crate::settlement::SettlementSummary),
        (status = 400, description = "Unknown window token or malformed date range")
    ),
    tag = "settlement"
)]
pub async fn get_settlement(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
    Query(params): Query<WindowQuery>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let window = params.resolve(state.config.reporting_offset())?;

    let report = state
        .services
        .settlement
        .compute_settlement(&email, window)
        .await
        .map_err(map_service_error)?;

    info!("Computed settlement for {} over {:?}", email, window);

    // Truncation to whole Taka happens here, once, at the presentation edge.
    Ok(success_response(report.summary()))
}

/// Withdrawal-adjusted lifetime balance.
#[utoipa::path(
    get,
    path = "/api/v1/sellers/{email}/balance",
    params(("email" = String, Path, description = "Seller email")),
    responses((status = 200, description = "Spendable balance", body = BalanceResponse)),
    tag = "settlement"
)]
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let spendable = state
        .services
        .settlement
        .spendable_balance(&email)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(BalanceResponse {
        seller_email: email,
        spendable_balance: crate::settlement::report::to_taka(spendable),
    }))
}

/// Window-filtered orders for the seller dashboard tables.
#[utoipa::path(
    get,
    path = "/api/v1/sellers/{email}/orders",
    params(
        ("email" = String, Path, description = "Seller email"),
        WindowQuery
    ),
    responses(
        (status = 200, description = "Validated orders in the window plus the excluded-row count", body = OrderListResponse),
        (status = 400, description = "Unknown window token or malformed date range")
    ),
    tag = "settlement"
)]
pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
    Query(params): Query<WindowQuery>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let window = params.resolve(state.config.reporting_offset())?;

    let (orders, excluded_records) = state
        .services
        .settlement
        .list_orders(&email, window)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(OrderListResponse {
        orders,
        excluded_records,
    }))
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sellers/:email/settlement", get(get_settlement))
        .route("/sellers/:email/balance", get(get_balance))
        .route("/sellers/:email/orders", get(list_orders))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn offset() -> FixedOffset {
        FixedOffset::east_opt(6 * 3600).unwrap()
    }

    #[test]
    fn defaults_to_all_time() {
        let q = WindowQuery {
            window: None,
            from: None,
            to: None,
        };
        assert_eq!(q.resolve(offset()).unwrap(), SettlementWindow::AllTime);
    }

    #[test]
    fn resolves_tokens() {
        let q = WindowQuery {
            window: Some("7d".into()),
            from: None,
            to: None,
        };
        assert_eq!(q.resolve(offset()).unwrap(), SettlementWindow::Last7Days);
    }

    #[test]
    fn rejects_unknown_token() {
        let q = WindowQuery {
            window: Some("fortnight".into()),
            from: None,
            to: None,
        };
        assert!(q.resolve(offset()).is_err());
    }

    #[test]
    fn custom_range_covers_whole_days_in_reporting_zone() {
        let q = WindowQuery {
            window: None,
            from: Some("2025-01-01".into()),
            to: Some("2025-01-31".into()),
        };
        match q.resolve(offset()).unwrap() {
            SettlementWindow::Custom { from, to } => {
                // 2025-01-01T00:00:00+06:00 == 2024-12-31T18:00:00Z
                assert_eq!(
                    from,
                    "2024-12-31T18:00:00Z".parse::<DateTime<Utc>>().unwrap()
                );
                assert_eq!(to, "2025-01-31T17:59:59Z".parse::<DateTime<Utc>>().unwrap());
            }
            other => panic!("expected custom window, got {:?}", other),
        }
    }

    #[test]
    fn rejects_half_open_custom_range() {
        let q = WindowQuery {
            window: None,
            from: Some("2025-01-01".into()),
            to: None,
        };
        assert!(q.resolve(offset()).is_err());
    }

    #[test]
    fn rejects_inverted_custom_range() {
        let q = WindowQuery {
            window: None,
            from: Some("2025-02-01".into()),
            to: Some("2025-01-01".into()),
        };
        assert!(q.resolve(offset()).is_err());
    }
}
