// rest/mod.rs — HTTP server and route binding.
//
// Endpoints:
//   GET    /api/health              (no auth)
//   POST   /api/users/register      (no auth)
//   POST   /api/users/login         (no auth)
//   GET    /api/tasks               (auth)
//   POST   /api/tasks               (auth)
//   PATCH  /api/tasks/{id}          (auth)
//   DELETE /api/tasks/{id}          (auth)

pub mod auth;
pub mod routes;

use anyhow::Result;
use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json, Response},
    routing::{get, patch, post},
    Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer};
use tracing::{error, info};

use crate::AppContext;

pub async fn start_rest_server(ctx: Arc<AppContext>) -> Result<()> {
    let bind = format!("{}:{}", ctx.config.bind_address, ctx.config.port);
    let addr: SocketAddr = bind.parse()?;

    let router = build_router(ctx);

    info!("listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    // The gate is layered onto the task group only; health and account
    // routes stay open.
    let task_routes = Router::new()
        .route(
            "/",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/{id}",
            patch(routes::tasks::update_task).delete(routes::tasks::delete_task),
        )
        .layer(middleware::from_fn_with_state(
            ctx.clone(),
            auth::require_auth,
        ));

    Router::new()
        .route("/api/health", get(routes::health::health))
        .route("/api/users/register", post(routes::users::register))
        .route("/api/users/login", post(routes::users::login))
        .nest("/api/tasks", task_routes)
        .layer(CorsLayer::permissive())
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(ctx)
}

/// Global fallback: anything escaping the handlers becomes a generic
/// 500. The detail stays server-side in the log.
fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    };
    error!("request handler panicked: {detail}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": "Something went wrong!" })),
    )
        .into_response()
}
