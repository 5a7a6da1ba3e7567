use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::instrument;

use crate::entities::{order, referral, withdrawal};
use crate::errors::ServiceError;
use crate::settlement::{
    self, ingest_all, OrderRecord, SettlementReport, SettlementWindow,
};

/// Read-side projection over the three stores. Fetches a seller's snapshot
/// and delegates all arithmetic to the pure settlement core.
///
/// Snapshot consistency: the three collections are fetched back to back, not
/// under one transaction; the aggregator computes over whatever it is given.
#[derive(Clone)]
pub struct SettlementService {
    db: Arc<DatabaseConnection>,
    reporting_offset: FixedOffset,
}

impl SettlementService {
    pub fn new(db: Arc<DatabaseConnection>, reporting_offset: FixedOffset) -> Self {
        Self {
            db,
            reporting_offset,
        }
    }

    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.reporting_offset)
    }

    async fn fetch_orders(&self, seller_email: &str) -> Result<Vec<order::Model>, ServiceError> {
        order::Entity::find()
            .filter(order::Column::SellerEmail.eq(seller_email))
            .all(&*self.db)
            .await
            .map_err(ServiceError::from)
    }

    async fn fetch_withdrawals(
        &self,
        seller_email: &str,
    ) -> Result<Vec<withdrawal::Model>, ServiceError> {
        withdrawal::Entity::find()
            .filter(withdrawal::Column::SellerEmail.eq(seller_email))
            .all(&*self.db)
            .await
            .map_err(ServiceError::from)
    }

    /// Sum of referral bonuses credited to this seller.
    pub async fn referral_income(&self, seller_email: &str) -> Result<Decimal, ServiceError> {
        let records = referral::Entity::find()
            .filter(referral::Column::InviterEmail.eq(seller_email))
            .all(&*self.db)
            .await?;
        Ok(records.iter().map(|r| r.amount).sum())
    }

    /// Computes the settlement report for one seller and window.
    #[instrument(skip(self), fields(seller_email = %seller_email))]
    pub async fn compute_settlement(
        &self,
        seller_email: &str,
        window: SettlementWindow,
    ) -> Result<SettlementReport, ServiceError> {
        let orders = self.fetch_orders(seller_email).await?;
        let withdrawals = self.fetch_withdrawals(seller_email).await?;
        let referral_income = self.referral_income(seller_email).await?;

        Ok(settlement::compute_settlement(
            &orders,
            &withdrawals,
            referral_income,
            &window,
            self.now(),
        ))
    }

    /// The withdrawal-adjusted lifetime balance: all-time received balance
    /// plus referral income minus every approved withdrawal.
    #[instrument(skip(self), fields(seller_email = %seller_email))]
    pub async fn spendable_balance(&self, seller_email: &str) -> Result<Decimal, ServiceError> {
        let orders = self.fetch_orders(seller_email).await?;
        let withdrawals = self.fetch_withdrawals(seller_email).await?;
        let referral_income = self.referral_income(seller_email).await?;

        Ok(settlement::compute_spendable_balance(
            &orders,
            &withdrawals,
            referral_income,
            self.now(),
        ))
    }

    /// Window-filtered, validated orders for dashboard tables, with the
    /// count of rows excluded by ingestion validation.
    #[instrument(skip(self), fields(seller_email = %seller_email))]
    pub async fn list_orders(
        &self,
        seller_email: &str,
        window: SettlementWindow,
    ) -> Result<(Vec<OrderRecord>, usize), ServiceError> {
        let orders = self.fetch_orders(seller_email).await?;
        let (records, malformed) = ingest_all(&orders);
        let now = self.now();
        let filtered = records
            .into_iter()
            .filter(|r| window.contains(r.order_date, now))
            .collect();
        Ok((filtered, malformed.len()))
    }
}
