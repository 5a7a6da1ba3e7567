//! Service-level integration tests against an in-memory SQLite database.

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tokio::sync::mpsc;
use uuid::Uuid;

use settlement_api::entities::order;
use settlement_api::errors::ServiceError;
use settlement_api::events::EventSender;
use settlement_api::migrator::Migrator;
use settlement_api::services::{
    orders::OrderService, referrals::ReferralService, settlement::SettlementService,
    withdrawals::WithdrawalService,
};
use settlement_api::settlement::{OrderStatus, SettlementWindow};

struct TestContext {
    db: Arc<DatabaseConnection>,
    settlement: SettlementService,
    orders: OrderService,
    withdrawals: WithdrawalService,
    referrals: ReferralService,
    // Keep the receiver alive so event sends succeed.
    _event_rx: mpsc::Receiver<settlement_api::events::Event>,
}

async fn setup() -> TestContext {
    let db = Arc::new(
        Database::connect("sqlite::memory:")
            .await
            .expect("connect to in-memory sqlite"),
    );
    Migrator::up(&*db, None).await.expect("run migrations");

    let (tx, rx) = mpsc::channel(64);
    let event_sender = EventSender::new(tx);
    let offset = chrono::FixedOffset::east_opt(6 * 3600).unwrap();

    let settlement = SettlementService::new(db.clone(), offset);
    let orders = OrderService::new(db.clone(), event_sender.clone());
    let withdrawals = WithdrawalService::new(
        db.clone(),
        settlement.clone(),
        event_sender.clone(),
        dec!(500),
    );
    let referrals = ReferralService::new(db.clone(), event_sender, dec!(100));

    TestContext {
        db,
        settlement,
        orders,
        withdrawals,
        referrals,
        _event_rx: rx,
    }
}

async fn seed_order(
    db: &DatabaseConnection,
    seller: &str,
    status: OrderStatus,
    sale_price: &str,
    grand_total: &str,
    delivery: &str,
    items: &str,
    age_days: i64,
) -> Uuid {
    let id = Uuid::new_v4();
    let order_date = (Utc::now() - Duration::days(age_days)).to_rfc3339();
    order::ActiveModel {
        id: Set(id),
        seller_email: Set(seller.to_string()),
        status: Set(status),
        order_date: Set(Some(order_date)),
        items_total: Set(Some(items.to_string())),
        grand_total: Set(Some(grand_total.to_string())),
        seller_sale_price: Set(Some(sale_price.to_string())),
        delivery_charge: Set(Some(delivery.to_string())),
        paid_amount: Set(None),
        due_amount: Set(None),
        is_cash_on_delivery: Set(false),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
    }
    .insert(db)
    .await
    .expect("insert order");
    id
}

#[tokio::test]
async fn order_status_follows_the_lifecycle() {
    let ctx = setup().await;
    let id = seed_order(
        &ctx.db,
        "seller@example.com",
        OrderStatus::Pending,
        "500",
        "400",
        "80",
        "320",
        1,
    )
    .await;

    let updated = ctx
        .orders
        .update_status(id, OrderStatus::Processing)
        .await
        .expect("pending -> processing");
    assert_eq!(updated.status, OrderStatus::Processing);

    // Skipping ahead is rejected and leaves the order unchanged.
    let err = ctx
        .orders
        .update_status(id, OrderStatus::Delivered)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidTransition(_));
    assert_eq!(
        ctx.orders.get(id).await.unwrap().status,
        OrderStatus::Processing
    );

    ctx.orders
        .update_status(id, OrderStatus::Shipped)
        .await
        .expect("processing -> shipped");
    ctx.orders
        .update_status(id, OrderStatus::Delivered)
        .await
        .expect("shipped -> delivered");

    // Terminal states reject every further mutation.
    let err = ctx
        .orders
        .update_status(id, OrderStatus::Returned)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidTransition(_));
}

#[tokio::test]
async fn missing_order_is_not_found() {
    let ctx = setup().await;
    let err = ctx
        .orders
        .update_status(Uuid::new_v4(), OrderStatus::Processing)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn settlement_report_matches_the_ledger() {
    let ctx = setup().await;
    let seller = "seller@example.com";

    // Delivered: received 420, margin 100.
    seed_order(&ctx.db, seller, OrderStatus::Delivered, "500", "400", "80", "320", 1).await;
    // Returned: rejected 420, rejected revenue 100.
    seed_order(&ctx.db, seller, OrderStatus::Returned, "500", "400", "80", "320", 2).await;
    // Shipped: pending 420.
    seed_order(&ctx.db, seller, OrderStatus::Shipped, "500", "400", "80", "320", 3).await;
    // Corrupt row: excluded everywhere.
    let corrupt = seed_order(&ctx.db, seller, OrderStatus::Pending, "500", "400", "80", "320", 1).await;
    let model = ctx.orders.get(corrupt).await.unwrap();
    let mut active: order::ActiveModel = model.into();
    active.seller_sale_price = Set(Some("oops".to_string()));
    active.update(&*ctx.db).await.unwrap();
    // Another seller's order never leaks in.
    seed_order(&ctx.db, "other@example.com", OrderStatus::Delivered, "900", "700", "150", "550", 1).await;

    let report = ctx
        .settlement
        .compute_settlement(seller, SettlementWindow::AllTime)
        .await
        .expect("compute settlement");

    assert_eq!(report.received_balance, dec!(420));
    assert_eq!(report.pending_balance, dec!(420));
    assert_eq!(report.rejected_balance, dec!(420));
    assert_eq!(report.rejected_revenue, dec!(100));
    assert_eq!(report.net_revenue, dec!(0)); // 100 settled margin - 100 rejected
    assert_eq!(report.imported_goods_value, dec!(640)); // 3 x 320 - returned 320
    assert_eq!(report.excluded_records, 1);
    assert_eq!(report.spendable_balance, dec!(420));

    let summary = report.summary();
    assert_eq!(summary.received_balance, 420);
    assert_eq!(summary.excluded_records, 1);
}

#[tokio::test]
async fn withdrawal_lifecycle_enforces_rules() {
    let ctx = setup().await;
    let seller = "seller@example.com";

    // Lifetime received 10,000.
    seed_order(
        &ctx.db,
        seller,
        OrderStatus::Delivered,
        "10080",
        "10080",
        "80",
        "10000",
        30,
    )
    .await;
    // Referral bonus of 100 credited to the seller.
    ctx.referrals
        .credit(seller, "newseller@example.com")
        .await
        .expect("credit referral");

    let spendable = ctx.settlement.spendable_balance(seller).await.unwrap();
    assert_eq!(spendable, dec!(10100));

    // Below the configured minimum of 500.
    let err = ctx.withdrawals.request(seller, dec!(100)).await.unwrap_err();
    assert_matches!(err, ServiceError::InvalidInput(_));

    // Above the spendable balance.
    let err = ctx
        .withdrawals
        .request(seller, dec!(20000))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InsufficientBalance(_));

    // Non-positive amounts are rejected outright.
    let err = ctx.withdrawals.request(seller, dec!(0)).await.unwrap_err();
    assert_matches!(err, ServiceError::InvalidInput(_));

    // A pending request does not consume balance yet.
    let pending = ctx
        .withdrawals
        .request(seller, dec!(2000))
        .await
        .expect("create withdrawal");
    assert_eq!(
        ctx.settlement.spendable_balance(seller).await.unwrap(),
        dec!(10100)
    );

    // Approval consumes it exactly once.
    let approved = ctx
        .withdrawals
        .decide(pending.id, true)
        .await
        .expect("approve withdrawal");
    assert!(approved.approval_date.is_some());
    assert_eq!(
        ctx.settlement.spendable_balance(seller).await.unwrap(),
        dec!(8100)
    );

    // A decided request is immutable.
    let err = ctx.withdrawals.decide(pending.id, false).await.unwrap_err();
    assert_matches!(err, ServiceError::Conflict(_));

    // Rejected requests never consume balance.
    let second = ctx
        .withdrawals
        .request(seller, dec!(1000))
        .await
        .expect("second withdrawal");
    ctx.withdrawals
        .decide(second.id, false)
        .await
        .expect("reject withdrawal");
    assert_eq!(
        ctx.settlement.spendable_balance(seller).await.unwrap(),
        dec!(8100)
    );
}

#[tokio::test]
async fn referral_bonus_is_credited_once_per_invitee() {
    let ctx = setup().await;

    ctx.referrals
        .credit("inviter@example.com", "friend@example.com")
        .await
        .expect("first credit");

    // Same invitee, even from another inviter, is a conflict.
    let err = ctx
        .referrals
        .credit("someone@example.com", "friend@example.com")
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Conflict(_));

    // Self-referral is rejected.
    let err = ctx
        .referrals
        .credit("inviter@example.com", "inviter@example.com")
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidInput(_));

    assert_eq!(
        ctx.settlement
            .referral_income("inviter@example.com")
            .await
            .unwrap(),
        dec!(100)
    );
}

#[tokio::test]
async fn windowed_order_listing_reports_exclusions() {
    let ctx = setup().await;
    let seller = "seller@example.com";

    seed_order(&ctx.db, seller, OrderStatus::Pending, "500", "400", "80", "320", 1).await;
    seed_order(&ctx.db, seller, OrderStatus::Pending, "500", "400", "80", "320", 40).await;
    let corrupt = seed_order(&ctx.db, seller, OrderStatus::Pending, "500", "400", "80", "320", 1).await;
    let model = ctx.orders.get(corrupt).await.unwrap();
    let mut active: order::ActiveModel = model.into();
    active.order_date = Set(None);
    active.update(&*ctx.db).await.unwrap();

    let (orders, excluded) = ctx
        .settlement
        .list_orders(seller, SettlementWindow::Last7Days)
        .await
        .expect("list orders");
    assert_eq!(orders.len(), 1);
    assert_eq!(excluded, 1);

    let (all, excluded) = ctx
        .settlement
        .list_orders(seller, SettlementWindow::AllTime)
        .await
        .expect("list all orders");
    assert_eq!(all.len(), 2);
    assert_eq!(excluded, 1);
}
