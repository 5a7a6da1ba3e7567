//! Settlement API Library
//!
//! Derives a seller's time-windowed financial balances from orders,
//! withdrawals, and referral bonuses. The arithmetic lives in the pure
//! [`settlement`] module; everything else is the service shell around it.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod services;
pub mod settlement;

use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;
use serde::Serialize;

/// Shared application state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

/// Common response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }
}

/// All `/api/v1` routes.
pub fn api_v1_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(handlers::settlement::routes())
        .merge(handlers::orders::routes())
        .merge(handlers::withdrawals::routes())
        .merge(handlers::referrals::routes())
        .merge(handlers::rules::routes())
}

/// The complete application router with state applied.
pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", axum::routing::get(|| async { "settlement-api up" }))
        .merge(handlers::health::routes())
        .nest("/api/v1", api_v1_routes())
        .with_state(state)
        .merge(openapi::swagger_ui())
}
