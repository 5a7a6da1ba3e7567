use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait, TransactionTrait,
};
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::entities::order::{
    ActiveModel as OrderActiveModel, Entity as OrderEntity, Model as OrderModel,
};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::settlement::status::OrderStatus;

/// Operator-facing order status mutation with lifecycle enforcement.
#[derive(Clone)]
pub struct OrderService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl OrderService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Moves an order to `new_status` if the transition is legal.
    ///
    /// Terminal orders (Delivered, Returned) reject every transition; the
    /// order is left unchanged and the error is surfaced to the caller.
    #[instrument(skip(self), fields(order_id = %order_id, new_status = %new_status))]
    pub async fn update_status(
        &self,
        order_id: Uuid,
        new_status: OrderStatus,
    ) -> Result<OrderModel, ServiceError> {
        let txn = self.db.begin().await?;

        let order = OrderEntity::find_by_id(order_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        let old_status = order.status;
        if !old_status.can_transition_to(new_status) {
            error!(
                "Rejected status transition from {} to {}",
                old_status, new_status
            );
            return Err(ServiceError::InvalidTransition(format!(
                "Cannot transition order {} from '{}' to '{}'",
                order_id, old_status, new_status
            )));
        }

        let mut active: OrderActiveModel = order.into();
        active.status = Set(new_status);
        active.updated_at = Set(Some(Utc::now()));
        let updated = active.update(&txn).await?;

        txn.commit().await?;

        info!(
            "Order {} status updated from '{}' to '{}'",
            order_id, old_status, new_status
        );
        if let Err(e) = self
            .event_sender
            .send(Event::OrderStatusChanged {
                order_id,
                old_status,
                new_status,
            })
            .await
        {
            error!("Failed to publish OrderStatusChanged: {}", e);
        }

        Ok(updated)
    }

    /// Fetches one order by id.
    pub async fn get(&self, order_id: Uuid) -> Result<OrderModel, ServiceError> {
        OrderEntity::find_by_id(order_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))
    }
}
