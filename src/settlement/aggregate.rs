//! The balance aggregator: a pure fold over validated snapshots.
//!
//! All per-order contributions are commutative sums, so results are
//! independent of input ordering. The only time dependence is the explicitly
//! passed `now`; identical snapshots and `now` yield identical reports.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;

use crate::entities::{order, withdrawal};
use crate::settlement::record::{ingest_all, OrderRecord};
use crate::settlement::report::SettlementReport;
use crate::settlement::status::FinancialClass;
use crate::settlement::window::SettlementWindow;

/// Per-window bucket sums before withdrawal adjustment.
#[derive(Clone, Debug, Default, PartialEq)]
struct WindowTotals {
    pending_balance: Decimal,
    received_balance: Decimal,
    settled_revenue: Decimal,
    rejected_balance: Decimal,
    rejected_revenue: Decimal,
    items_total: Decimal,
    returned_items_total: Decimal,
}

impl WindowTotals {
    fn accumulate(&mut self, record: &OrderRecord) {
        self.items_total += record.items_total;
        match record.status.classify() {
            FinancialClass::Settled => {
                self.received_balance += record.seller_sale_price - record.delivery_charge;
                self.settled_revenue += record.seller_sale_price - record.grand_total;
            }
            FinancialClass::PendingFinancial => {
                self.pending_balance += record.seller_sale_price - record.delivery_charge;
            }
            FinancialClass::Void => {
                self.rejected_balance += record.seller_sale_price - record.delivery_charge;
                self.rejected_revenue += record.seller_sale_price
                    - (record.delivery_charge + record.items_total);
                self.returned_items_total += record.items_total;
            }
        }
    }
}

fn window_totals(
    records: &[OrderRecord],
    window: &SettlementWindow,
    now: DateTime<FixedOffset>,
) -> WindowTotals {
    let mut totals = WindowTotals::default();
    for record in records {
        if window.contains(record.order_date, now) {
            totals.accumulate(record);
        }
    }
    totals
}

/// Sum of Approved withdrawal amounts. Pending and Rejected requests never
/// reduce the balance.
pub fn approved_withdrawal_total(withdrawals: &[withdrawal::Model]) -> Decimal {
    withdrawals
        .iter()
        .filter(|w| w.status == withdrawal::WithdrawalStatus::Approved)
        .map(|w| w.amount)
        .sum()
}

/// Computes the settlement report for one window over a seller's snapshot.
///
/// `orders` is the raw feed; validation happens here, once, and rejected rows
/// are counted in `excluded_records`. The spendable balance is always derived
/// from the all-time received balance: withdrawals permanently consume
/// balance and must not resurface when the caller narrows the window.
pub fn compute_settlement(
    orders: &[order::Model],
    withdrawals: &[withdrawal::Model],
    referral_income: Decimal,
    window: &SettlementWindow,
    now: DateTime<FixedOffset>,
) -> SettlementReport {
    let (records, malformed) = ingest_all(orders);

    let scoped = window_totals(&records, window, now);
    let lifetime = match window {
        SettlementWindow::AllTime => scoped.clone(),
        _ => window_totals(&records, &SettlementWindow::AllTime, now),
    };

    let spendable_balance =
        lifetime.received_balance + referral_income - approved_withdrawal_total(withdrawals);

    SettlementReport {
        pending_balance: scoped.pending_balance,
        received_balance: scoped.received_balance,
        net_revenue: scoped.settled_revenue - scoped.rejected_revenue,
        rejected_balance: scoped.rejected_balance,
        rejected_revenue: scoped.rejected_revenue,
        imported_goods_value: scoped.items_total - scoped.returned_items_total,
        spendable_balance,
        excluded_records: malformed.len(),
    }
}

/// The withdrawal-adjusted lifetime balance on its own, for callers that only
/// need the spendable figure.
pub fn compute_spendable_balance(
    orders: &[order::Model],
    withdrawals: &[withdrawal::Model],
    referral_income: Decimal,
    now: DateTime<FixedOffset>,
) -> Decimal {
    compute_settlement(
        orders,
        withdrawals,
        referral_income,
        &SettlementWindow::AllTime,
        now,
    )
    .spendable_balance
}
