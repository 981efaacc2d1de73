use crate::AppContext;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

pub async fn health(State(ctx): State<Arc<AppContext>>) -> Json<Value> {
    let uptime = ctx.started_at.elapsed().as_secs();
    let db_ok = ctx.storage.ping().await;
    Json(json!({
        "status": if db_ok { "ok" } else { "degraded" },
        "db_ok": db_ok,
        "uptime_secs": uptime,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
