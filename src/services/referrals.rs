use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::entities::referral::{
    ActiveModel as ReferralActiveModel, Column as ReferralColumn, Entity as ReferralEntity,
    Model as ReferralModel,
};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

/// Write side of the referral ledger: credits the configured bonus to the
/// inviter when an invited seller signs up, at most once per invitee.
#[derive(Clone)]
pub struct ReferralService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
    bonus_amount: Decimal,
}

impl ReferralService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender, bonus_amount: Decimal) -> Self {
        Self {
            db,
            event_sender,
            bonus_amount,
        }
    }

    /// Credits the referral bonus to `inviter_email`. Duplicate credits for
    /// the same invited seller are rejected.
    #[instrument(skip(self), fields(inviter_email = %inviter_email, invited_email = %invited_email))]
    pub async fn credit(
        &self,
        inviter_email: &str,
        invited_email: &str,
    ) -> Result<ReferralModel, ServiceError> {
        if inviter_email.eq_ignore_ascii_case(invited_email) {
            return Err(ServiceError::InvalidInput(
                "A seller cannot refer themselves".to_string(),
            ));
        }

        let existing = ReferralEntity::find()
            .filter(ReferralColumn::InvitedEmail.eq(invited_email))
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "A referral bonus was already credited for {}",
                invited_email
            )));
        }

        let model = ReferralActiveModel {
            id: Set(Uuid::new_v4()),
            inviter_email: Set(inviter_email.to_string()),
            invited_email: Set(invited_email.to_string()),
            amount: Set(self.bonus_amount),
            created_at: Set(Utc::now()),
        };
        let created = model.insert(&*self.db).await?;

        info!(
            "Referral bonus {} credited to {} for inviting {}",
            self.bonus_amount, inviter_email, invited_email
        );
        if let Err(e) = self
            .event_sender
            .send(Event::ReferralCredited {
                inviter_email: inviter_email.to_string(),
                invited_email: invited_email.to_string(),
                amount: self.bonus_amount,
            })
            .await
        {
            error!("Failed to publish ReferralCredited: {}", e);
        }

        Ok(created)
    }

    /// All referral records where this seller is the inviter.
    pub async fn list_for_inviter(
        &self,
        inviter_email: &str,
    ) -> Result<Vec<ReferralModel>, ServiceError> {
        ReferralEntity::find()
            .filter(ReferralColumn::InviterEmail.eq(inviter_email))
            .all(&*self.db)
            .await
            .map_err(ServiceError::from)
    }
}
