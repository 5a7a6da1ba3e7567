//! The settlement core: pure, synchronous, side-effect-free functions over
//! immutable snapshots of a seller's orders, withdrawals, and referral
//! income. No I/O happens below this module boundary.

pub mod aggregate;
pub mod record;
pub mod report;
pub mod status;
pub mod window;

pub use aggregate::{compute_settlement, compute_spendable_balance};
pub use record::{ingest, ingest_all, MalformedOrder, MalformedReason, OrderRecord, ValidatedOrder};
pub use report::{SettlementReport, SettlementSummary};
pub use status::{FinancialClass, OrderStatus};
pub use window::SettlementWindow;
