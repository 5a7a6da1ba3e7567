use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order lifecycle states.
///
/// The forward chain is `Pending -> Processing -> Shipped -> Delivered`;
/// `Returned` may be entered from any non-terminal state. `Delivered` and
/// `Returned` are terminal and reject further mutation.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum OrderStatus {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "Processing")]
    Processing,
    #[sea_orm(string_value = "Shipped")]
    Shipped,
    #[sea_orm(string_value = "Delivered")]
    Delivered,
    #[sea_orm(string_value = "Returned")]
    Returned,
}

/// Financial classification of an order status, used by the aggregator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FinancialClass {
    /// Delivered: eligible for revenue recognition.
    Settled,
    /// Pending, Processing or Shipped: counted toward the pending balance only.
    PendingFinancial,
    /// Returned: excluded from revenue, tracked in the rejected buckets.
    Void,
}

impl OrderStatus {
    /// Pure classification used by the balance aggregator.
    pub fn classify(self) -> FinancialClass {
        match self {
            OrderStatus::Delivered => FinancialClass::Settled,
            OrderStatus::Pending | OrderStatus::Processing | OrderStatus::Shipped => {
                FinancialClass::PendingFinancial
            }
            OrderStatus::Returned => FinancialClass::Void,
        }
    }

    /// Terminal states admit no further transition.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Returned)
    }

    /// Whether an operator may move an order from `self` to `next`.
    ///
    /// The lifecycle advances one step at a time along the forward chain;
    /// `Returned` is reachable from any non-terminal state.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match (self, next) {
            (OrderStatus::Pending, OrderStatus::Processing) => true,
            (OrderStatus::Processing, OrderStatus::Shipped) => true,
            (OrderStatus::Shipped, OrderStatus::Delivered) => true,
            (_, OrderStatus::Returned) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(OrderStatus::Pending, OrderStatus::Processing, true; "pending to processing")]
    #[test_case(OrderStatus::Processing, OrderStatus::Shipped, true; "processing to shipped")]
    #[test_case(OrderStatus::Shipped, OrderStatus::Delivered, true; "shipped to delivered")]
    #[test_case(OrderStatus::Pending, OrderStatus::Returned, true; "pending to returned")]
    #[test_case(OrderStatus::Processing, OrderStatus::Returned, true; "processing to returned")]
    #[test_case(OrderStatus::Shipped, OrderStatus::Returned, true; "shipped to returned")]
    #[test_case(OrderStatus::Pending, OrderStatus::Shipped, false; "no skipping ahead")]
    #[test_case(OrderStatus::Pending, OrderStatus::Delivered, false; "no jump to delivered")]
    #[test_case(OrderStatus::Processing, OrderStatus::Pending, false; "no moving backward")]
    #[test_case(OrderStatus::Delivered, OrderStatus::Returned, false; "delivered is terminal")]
    #[test_case(OrderStatus::Delivered, OrderStatus::Shipped, false; "delivered rejects regression")]
    #[test_case(OrderStatus::Returned, OrderStatus::Pending, false; "returned is terminal")]
    #[test_case(OrderStatus::Pending, OrderStatus::Pending, false; "self transition rejected")]
    fn transition_table(from: OrderStatus, to: OrderStatus, allowed: bool) {
        assert_eq!(from.can_transition_to(to), allowed);
    }

    #[test]
    fn classification_buckets() {
        assert_eq!(OrderStatus::Delivered.classify(), FinancialClass::Settled);
        assert_eq!(OrderStatus::Returned.classify(), FinancialClass::Void);
        for status in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Shipped,
        ] {
            assert_eq!(status.classify(), FinancialClass::PendingFinancial);
        }
    }

    #[test]
    fn terminal_states() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Returned.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Processing.is_terminal());
        assert!(!OrderStatus::Shipped.is_terminal());
    }
}
