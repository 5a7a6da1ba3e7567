use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Settlement buckets for one requested window, plus the window-independent
/// spendable balance. Amounts accumulate as `Decimal`; truncation to integer
/// Taka happens exactly once, in [`SettlementReport::summary`]. Recomputed on
/// demand, never persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SettlementReport {
    /// Sum over Pending/Processing/Shipped orders of
    /// `seller_sale_price - delivery_charge`.
    pub pending_balance: Decimal,
    /// Sum over Delivered orders of `seller_sale_price - delivery_charge`.
    pub received_balance: Decimal,
    /// Sum over Delivered orders of `seller_sale_price - grand_total`,
    /// minus `rejected_revenue`.
    pub net_revenue: Decimal,
    /// Sum over Returned orders of `seller_sale_price - delivery_charge`.
    pub rejected_balance: Decimal,
    /// Sum over Returned orders of
    /// `seller_sale_price - (delivery_charge + items_total)`.
    pub rejected_revenue: Decimal,
    /// Window `items_total` minus `items_total` of Returned orders, so
    /// returned stock drops out of the currently-imported figure.
    pub imported_goods_value: Decimal,
    /// All-time received balance plus referral income minus every Approved
    /// withdrawal. Never window-scoped.
    pub spendable_balance: Decimal,
    /// Raw rows excluded by ingestion validation, surfaced so dashboards can
    /// flag data-quality problems.
    pub excluded_records: usize,
}

/// Display form of a settlement report: whole Taka, truncated once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SettlementSummary {
    pub pending_balance: i64,
    pub received_balance: i64,
    pub net_revenue: i64,
    pub rejected_balance: i64,
    pub rejected_revenue: i64,
    pub imported_goods_value: i64,
    pub spendable_balance: i64,
    pub excluded_records: usize,
}

/// Truncates toward zero to whole Taka.
pub fn to_taka(amount: Decimal) -> i64 {
    amount.trunc().to_i64().unwrap_or_default()
}

impl SettlementReport {
    pub fn summary(&self) -> SettlementSummary {
        SettlementSummary {
            pending_balance: to_taka(self.pending_balance),
            received_balance: to_taka(self.received_balance),
            net_revenue: to_taka(self.net_revenue),
            rejected_balance: to_taka(self.rejected_balance),
            rejected_revenue: to_taka(self.rejected_revenue),
            imported_goods_value: to_taka(self.imported_goods_value),
            spendable_balance: to_taka(self.spendable_balance),
            excluded_records: self.excluded_records,
        }
    }
}
