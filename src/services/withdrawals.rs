use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::entities::withdrawal::{
    ActiveModel as WithdrawalActiveModel, Column as WithdrawalColumn, Entity as WithdrawalEntity,
    Model as WithdrawalModel, WithdrawalStatus,
};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::settlement::SettlementService;

/// Withdrawal request lifecycle: created by the seller, decided exactly once
/// by an operator, immutable afterward.
#[derive(Clone)]
pub struct WithdrawalService {
    db: Arc<DatabaseConnection>,
    settlement: SettlementService,
    event_sender: EventSender,
    minimum_withdraw_amount: Decimal,
}

impl WithdrawalService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        settlement: SettlementService,
        event_sender: EventSender,
        minimum_withdraw_amount: Decimal,
    ) -> Self {
        Self {
            db,
            settlement,
            event_sender,
            minimum_withdraw_amount,
        }
    }

    /// Creates a Pending withdrawal request after checking the amount
    /// against the configured minimum and the seller's spendable balance.
    #[instrument(skip(self), fields(seller_email = %seller_email, amount = %amount))]
    pub async fn request(
        &self,
        seller_email: &str,
        amount: Decimal,
    ) -> Result<WithdrawalModel, ServiceError> {
        if amount <= Decimal::ZERO {
            return Err(ServiceError::InvalidInput(
                "Withdrawal amount must be positive".to_string(),
            ));
        }
        if amount < self.minimum_withdraw_amount {
            return Err(ServiceError::InvalidInput(format!(
                "Withdrawal amount {} is below the minimum of {}",
                amount, self.minimum_withdraw_amount
            )));
        }

        let spendable = self.settlement.spendable_balance(seller_email).await?;
        if amount > spendable {
            return Err(ServiceError::InsufficientBalance(format!(
                "Requested {} exceeds spendable balance {}",
                amount, spendable
            )));
        }

        let model = WithdrawalActiveModel {
            id: Set(Uuid::new_v4()),
            seller_email: Set(seller_email.to_string()),
            amount: Set(amount),
            status: Set(WithdrawalStatus::Pending),
            request_date: Set(Utc::now()),
            approval_date: Set(None),
        };
        let created = model.insert(&*self.db).await?;

        info!(
            "Withdrawal {} requested by {} for {}",
            created.id, seller_email, amount
        );
        if let Err(e) = self
            .event_sender
            .send(Event::WithdrawalRequested {
                withdrawal_id: created.id,
                seller_email: seller_email.to_string(),
                amount,
            })
            .await
        {
            error!("Failed to publish WithdrawalRequested: {}", e);
        }

        Ok(created)
    }

    /// Approves or rejects a Pending request. A request that has already been
    /// decided is immutable; a second decision is a conflict.
    #[instrument(skip(self), fields(withdrawal_id = %withdrawal_id, approve))]
    pub async fn decide(
        &self,
        withdrawal_id: Uuid,
        approve: bool,
    ) -> Result<WithdrawalModel, ServiceError> {
        let withdrawal = WithdrawalEntity::find_by_id(withdrawal_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Withdrawal {} not found", withdrawal_id))
            })?;

        if withdrawal.status != WithdrawalStatus::Pending {
            return Err(ServiceError::Conflict(format!(
                "Withdrawal {} was already decided ({})",
                withdrawal_id, withdrawal.status
            )));
        }

        let seller_email = withdrawal.seller_email.clone();
        let mut active: WithdrawalActiveModel = withdrawal.into();
        if approve {
            active.status = Set(WithdrawalStatus::Approved);
            active.approval_date = Set(Some(Utc::now()));
        } else {
            active.status = Set(WithdrawalStatus::Rejected);
        }
        let updated = active.update(&*self.db).await?;

        info!(
            "Withdrawal {} {}",
            withdrawal_id,
            if approve { "approved" } else { "rejected" }
        );
        if let Err(e) = self
            .event_sender
            .send(Event::WithdrawalDecided {
                withdrawal_id,
                seller_email,
                approved: approve,
            })
            .await
        {
            error!("Failed to publish WithdrawalDecided: {}", e);
        }

        Ok(updated)
    }

    /// All withdrawal requests for a seller, newest first.
    pub async fn list(&self, seller_email: &str) -> Result<Vec<WithdrawalModel>, ServiceError> {
        WithdrawalEntity::find()
            .filter(WithdrawalColumn::SellerEmail.eq(seller_email))
            .order_by_desc(WithdrawalColumn::RequestDate)
            .all(&*self.db)
            .await
            .map_err(ServiceError::from)
    }
}
