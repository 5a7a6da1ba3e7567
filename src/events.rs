use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::settlement::status::OrderStatus;

/// Domain events emitted by the write-side services. The settlement
/// aggregator itself never emits events; it is a pure read-side projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    OrderStatusChanged {
        order_id: Uuid,
        old_status: OrderStatus,
        new_status: OrderStatus,
    },
    WithdrawalRequested {
        withdrawal_id: Uuid,
        seller_email: String,
        amount: Decimal,
    },
    WithdrawalDecided {
        withdrawal_id: Uuid,
        seller_email: String,
        approved: bool,
    },
    ReferralCredited {
        inviter_email: String,
        invited_email: String,
        amount: Decimal,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously. Failure to deliver is reported to the
    /// caller but never blocks the originating operation's result.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Background loop draining the event channel. Currently log-only; outbound
/// integrations hook in here.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::OrderStatusChanged {
                order_id,
                old_status,
                new_status,
            } => {
                info!(%order_id, %old_status, %new_status, "order status changed");
            }
            Event::WithdrawalRequested {
                withdrawal_id,
                seller_email,
                amount,
            } => {
                info!(%withdrawal_id, %seller_email, %amount, "withdrawal requested");
            }
            Event::WithdrawalDecided {
                withdrawal_id,
                seller_email,
                approved,
            } => {
                info!(%withdrawal_id, %seller_email, approved, "withdrawal decided");
            }
            Event::ReferralCredited {
                inviter_email,
                invited_email,
                amount,
            } => {
                info!(%inviter_email, %invited_email, %amount, "referral bonus credited");
            }
        }
    }
    warn!("event channel closed; event processor exiting");
}
