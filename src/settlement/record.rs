use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::entities::order;
use crate::settlement::status::OrderStatus;

/// A fully validated order, safe for arithmetic. Produced once at ingestion;
/// the aggregator never re-validates.
#[derive(Clone, Debug, PartialEq, Serialize, utoipa::ToSchema)]
pub struct OrderRecord {
    pub id: Uuid,
    pub seller_email: String,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub items_total: Decimal,
    pub grand_total: Decimal,
    pub seller_sale_price: Decimal,
    pub delivery_charge: Decimal,
    pub is_cash_on_delivery: bool,
}

/// Why a raw order row was rejected at ingestion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum MalformedReason {
    MissingField(&'static str),
    UnparseableDate(String),
    UnparseableAmount(&'static str, String),
}

/// A raw order row that failed validation. Malformed rows are excluded from
/// every bucket in every window; they never contribute a substituted zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MalformedOrder {
    pub id: Uuid,
    pub reason: MalformedReason,
}

/// Ingestion result: a row is either fully usable or fully excluded.
#[derive(Clone, Debug, PartialEq)]
pub enum ValidatedOrder {
    Valid(Box<OrderRecord>),
    Malformed(MalformedOrder),
}

fn parse_amount(
    field: &'static str,
    value: Option<&String>,
) -> Result<Decimal, MalformedReason> {
    let raw = value.ok_or(MalformedReason::MissingField(field))?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(MalformedReason::MissingField(field));
    }
    Decimal::from_str(trimmed)
        .map_err(|_| MalformedReason::UnparseableAmount(field, raw.clone()))
}

fn parse_order_date(value: Option<&String>) -> Result<DateTime<Utc>, MalformedReason> {
    let raw = value.ok_or(MalformedReason::MissingField("order_date"))?;
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| MalformedReason::UnparseableDate(raw.clone()))
}

/// Validates one raw order row from the legacy feed.
///
/// Required: `order_date`, `seller_sale_price`, `delivery_charge`,
/// `grand_total`. A missing `items_total` is derived from the creation-time
/// invariant `grand_total = items_total + delivery_charge`.
pub fn ingest(model: &order::Model) -> ValidatedOrder {
    let malformed = |reason| {
        ValidatedOrder::Malformed(MalformedOrder {
            id: model.id,
            reason,
        })
    };

    let order_date = match parse_order_date(model.order_date.as_ref()) {
        Ok(v) => v,
        Err(reason) => return malformed(reason),
    };
    let seller_sale_price =
        match parse_amount("seller_sale_price", model.seller_sale_price.as_ref()) {
            Ok(v) => v,
            Err(reason) => return malformed(reason),
        };
    let delivery_charge = match parse_amount("delivery_charge", model.delivery_charge.as_ref()) {
        Ok(v) => v,
        Err(reason) => return malformed(reason),
    };
    let grand_total = match parse_amount("grand_total", model.grand_total.as_ref()) {
        Ok(v) => v,
        Err(reason) => return malformed(reason),
    };
    let items_total = match model.items_total.as_ref() {
        Some(_) => match parse_amount("items_total", model.items_total.as_ref()) {
            Ok(v) => v,
            Err(reason) => return malformed(reason),
        },
        None => grand_total - delivery_charge,
    };

    ValidatedOrder::Valid(Box::new(OrderRecord {
        id: model.id,
        seller_email: model.seller_email.clone(),
        order_date,
        status: model.status,
        items_total,
        grand_total,
        seller_sale_price,
        delivery_charge,
        is_cash_on_delivery: model.is_cash_on_delivery,
    }))
}

/// Validates a snapshot of raw rows, splitting it into usable records and
/// the excluded remainder.
pub fn ingest_all(models: &[order::Model]) -> (Vec<OrderRecord>, Vec<MalformedOrder>) {
    let mut valid = Vec::with_capacity(models.len());
    let mut malformed = Vec::new();
    for model in models {
        match ingest(model) {
            ValidatedOrder::Valid(record) => valid.push(*record),
            ValidatedOrder::Malformed(m) => malformed.push(m),
        }
    }
    (valid, malformed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    fn raw_order() -> order::Model {
        order::Model {
            id: Uuid::new_v4(),
            seller_email: "seller@example.com".into(),
            status: OrderStatus::Pending,
            order_date: Some("2025-03-10T08:30:00+06:00".into()),
            items_total: Some("320".into()),
            grand_total: Some("400".into()),
            seller_sale_price: Some("500".into()),
            delivery_charge: Some("80".into()),
            paid_amount: Some("80".into()),
            due_amount: Some("320".into()),
            is_cash_on_delivery: true,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn valid_row_parses_all_amounts() {
        let record = match ingest(&raw_order()) {
            ValidatedOrder::Valid(r) => r,
            ValidatedOrder::Malformed(m) => panic!("unexpected rejection: {:?}", m),
        };
        assert_eq!(record.seller_sale_price, dec!(500));
        assert_eq!(record.grand_total, dec!(400));
        assert_eq!(record.items_total, dec!(320));
        assert_eq!(record.delivery_charge, dec!(80));
        assert_eq!(
            record.order_date,
            "2025-03-10T02:30:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }

    #[test]
    fn missing_sale_price_rejects_whole_row() {
        let mut model = raw_order();
        model.seller_sale_price = None;
        assert_matches!(
            ingest(&model),
            ValidatedOrder::Malformed(MalformedOrder {
                reason: MalformedReason::MissingField("seller_sale_price"),
                ..
            })
        );
    }

    #[test]
    fn non_numeric_amount_rejects_whole_row() {
        let mut model = raw_order();
        model.seller_sale_price = Some("NaN".into());
        assert_matches!(
            ingest(&model),
            ValidatedOrder::Malformed(MalformedOrder {
                reason: MalformedReason::UnparseableAmount("seller_sale_price", _),
                ..
            })
        );
    }

    #[test]
    fn unparseable_date_rejects_whole_row() {
        let mut model = raw_order();
        model.order_date = Some("10/03/2025".into());
        assert_matches!(
            ingest(&model),
            ValidatedOrder::Malformed(MalformedOrder {
                reason: MalformedReason::UnparseableDate(_),
                ..
            })
        );
    }

    #[test]
    fn blank_amount_counts_as_missing() {
        let mut model = raw_order();
        model.grand_total = Some("   ".into());
        assert_matches!(
            ingest(&model),
            ValidatedOrder::Malformed(MalformedOrder {
                reason: MalformedReason::MissingField("grand_total"),
                ..
            })
        );
    }

    #[test]
    fn missing_items_total_is_derived_from_invariant() {
        let mut model = raw_order();
        model.items_total = None;
        let record = match ingest(&model) {
            ValidatedOrder::Valid(r) => r,
            ValidatedOrder::Malformed(m) => panic!("unexpected rejection: {:?}", m),
        };
        // grand_total = items_total + delivery_charge
        assert_eq!(record.items_total, dec!(320));
    }

    #[test]
    fn ingest_all_splits_valid_and_malformed() {
        let good = raw_order();
        let mut bad = raw_order();
        bad.order_date = None;
        let (valid, malformed) = ingest_all(&[good.clone(), bad.clone()]);
        assert_eq!(valid.len(), 1);
        assert_eq!(valid[0].id, good.id);
        assert_eq!(malformed.len(), 1);
        assert_eq!(malformed[0].id, bad.id);
    }
}
