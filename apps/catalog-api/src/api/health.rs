//! Readiness endpoint backed by a database ping

use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router,
};
use sea_orm::DatabaseConnection;
use serde_json::json;

use crate::state::AppState;

async fn ready(State(db): State<DatabaseConnection>) -> impl IntoResponse {
    let status = database::postgres::check_health_detailed(&db).await;

    let body = json!({
        "status": if status.healthy { "ready" } else { "not ready" },
        "database": if status.healthy { "connected" } else { "disconnected" },
        "response_time_ms": status.response_time_ms,
    });

    let code = if status.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (code, Json(body))
}

/// Creates a router with the /ready endpoint
pub fn ready_router(state: &AppState) -> Router {
    Router::new()
        .route("/ready", get(ready))
        .with_state(state.db.clone())
}
