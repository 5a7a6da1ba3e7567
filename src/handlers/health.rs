use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use sea_orm::ConnectionTrait;
use serde_json::json;

use crate::AppState;

async fn liveness() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// Readiness: checks that the database answers a trivial query.
async fn readiness(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    let stmt = sea_orm::Statement::from_string(
        state.db.get_database_backend(),
        "SELECT 1".to_string(),
    );
    match state.db.execute(stmt).await {
        Ok(_) => (StatusCode::OK, Json(json!({ "status": "ready" }))),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable", "error": e.to_string() })),
        ),
    }
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(liveness))
        .route("/health/ready", get(readiness))
}
