use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Settlement API",
        version = "0.1.0",
        description = r#"
Seller settlement ledger service.

Derives time-windowed financial balances for a seller from an append-only set
of order records, withdrawal-approval records, and referral-bonus records.
Orders follow a Pending -> Processing -> Shipped -> Delivered lifecycle, with
Returned reachable from any non-terminal state; only Delivered orders count
toward revenue, and only Approved withdrawals reduce the spendable balance.

Amounts are reported in whole Taka, truncated once at the presentation edge.
"#
    ),
    paths(
        crate::handlers::settlement::get_settlement,
        crate::handlers::settlement::get_balance,
        crate::handlers::settlement::list_orders,
        crate::handlers::orders::update_status,
        crate::handlers::orders::get_order,
        crate::handlers::withdrawals::create_withdrawal,
        crate::handlers::withdrawals::decide_withdrawal,
        crate::handlers::withdrawals::list_withdrawals,
        crate::handlers::referrals::create_referral,
        crate::handlers::referrals::list_referrals,
        crate::handlers::rules::get_rules,
    ),
    components(schemas(
        crate::settlement::SettlementSummary,
        crate::settlement::OrderStatus,
        crate::settlement::OrderRecord,
        crate::entities::order::Model,
        crate::entities::withdrawal::Model,
        crate::entities::withdrawal::WithdrawalStatus,
        crate::entities::referral::Model,
        crate::handlers::settlement::BalanceResponse,
        crate::handlers::settlement::OrderListResponse,
        crate::handlers::orders::UpdateStatusRequest,
        crate::handlers::withdrawals::CreateWithdrawalRequest,
        crate::handlers::withdrawals::DecisionRequest,
        crate::handlers::withdrawals::WithdrawalDecision,
        crate::handlers::referrals::CreateReferralRequest,
        crate::handlers::rules::BusinessRules,
        crate::errors::ErrorResponse,
    )),
    tags(
        (name = "settlement", description = "Settlement reports and balances"),
        (name = "orders", description = "Order lifecycle operations"),
        (name = "withdrawals", description = "Withdrawal request lifecycle"),
        (name = "referrals", description = "Referral bonus ledger"),
        (name = "rules", description = "Configured business rules"),
    )
)]
pub struct ApiDoc;

/// Swagger UI mounted at `/docs`, serving the generated document.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_api_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/sellers/{email}/settlement",
            "/api/v1/sellers/{email}/balance",
            "/api/v1/sellers/{email}/orders",
            "/api/v1/sellers/{email}/withdrawals",
            "/api/v1/sellers/{email}/referrals",
            "/api/v1/orders/{id}",
            "/api/v1/orders/{id}/status",
            "/api/v1/withdrawals/{id}/decision",
            "/api/v1/referrals",
            "/api/v1/rules",
        ] {
            assert!(
                doc.paths.paths.contains_key(path),
                "missing from OpenAPI document: {}",
                path
            );
        }
    }
}
