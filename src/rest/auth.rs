// rest/auth.rs — Bearer token auth middleware for the task route group.
//
// Header: Authorization: Bearer <token>
// On success the resolved caller identity is attached to the request as
// an `AuthUser` extension; on failure the request short-circuits with
// 401 before any store operation runs.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::debug;

use crate::auth;
use crate::error::ApiError;
use crate::AppContext;

/// Identity attached by the gate. Handlers read it via `Extension<AuthUser>`.
#[derive(Debug, Clone)]
pub struct AuthUser(pub String);

pub async fn require_auth(
    State(ctx): State<Arc<AppContext>>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let Some(token) = token else {
        return ApiError::Unauthorized("Missing bearer token").into_response();
    };

    match auth::verify_token(token, &ctx.auth_secret) {
        Ok(user_id) => {
            req.extensions_mut().insert(AuthUser(user_id));
            next.run(req).await
        }
        Err(e) => {
            debug!("rejected bearer token: {e}");
            ApiError::Unauthorized("Invalid or expired bearer token").into_response()
        }
    }
}
