use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::events::EventSender;
use crate::services::{
    orders::OrderService, referrals::ReferralService, settlement::SettlementService,
    withdrawals::WithdrawalService,
};

pub mod common;
pub mod health;
pub mod orders;
pub mod referrals;
pub mod rules;
pub mod settlement;
pub mod withdrawals;

/// Services used by the HTTP handlers.
#[derive(Clone)]
pub struct AppServices {
    pub settlement: Arc<SettlementService>,
    pub orders: Arc<OrderService>,
    pub withdrawals: Arc<WithdrawalService>,
    pub referrals: Arc<ReferralService>,
}

impl AppServices {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender, cfg: &AppConfig) -> Self {
        let settlement = SettlementService::new(db.clone(), cfg.reporting_offset());
        let orders = Arc::new(OrderService::new(db.clone(), event_sender.clone()));
        let withdrawals = Arc::new(WithdrawalService::new(
            db.clone(),
            settlement.clone(),
            event_sender.clone(),
            cfg.minimum_withdraw_amount,
        ));
        let referrals = Arc::new(ReferralService::new(
            db,
            event_sender,
            cfg.referral_bonus_amount,
        ));
        Self {
            settlement: Arc::new(settlement),
            orders,
            withdrawals,
            referrals,
        }
    }
}
