use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::settlement::status::OrderStatus;

/// The `orders` table.
///
/// Rows are mirrored from the legacy storefront checkout feed, which stores
/// dates and monetary amounts as text and may leave any of them out. The
/// settlement core validates each row exactly once at ingestion; this entity
/// never interprets the text columns itself.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, utoipa::ToSchema)]
#[sea_orm(table_name = "orders")]
#[schema(as = Order)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owner key: the seller this order settles against.
    pub seller_email: String,

    /// Current lifecycle status; the only operator-mutable field.
    pub status: OrderStatus,

    /// Order placement instant, RFC 3339 text as delivered by the feed.
    pub order_date: Option<String>,

    /// Wholesale/import cost of the items.
    pub items_total: Option<String>,

    /// items_total + delivery_charge, fixed at creation.
    pub grand_total: Option<String>,

    /// The seller's resale price ("amar bikri mullo"), >= grand_total at
    /// creation time.
    pub seller_sale_price: Option<String>,

    /// 80 in-city / 150 out-of-city, fixed at creation.
    pub delivery_charge: Option<String>,

    pub paid_amount: Option<String>,
    pub due_amount: Option<String>,

    pub is_cash_on_delivery: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
