//! Health check endpoint

use axum::{extract::State, Json};
use serde_json::json;

use crate::state::AppState;

/// GET /api/v1/health
pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let db_ok = state.db.ping().await.is_ok();
    Json(json!({
        "status": if db_ok { "ok" } else { "degraded" },
        "database": db_ok,
    }))
}
