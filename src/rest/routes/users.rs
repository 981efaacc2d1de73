// rest/routes/users.rs — Account registration and login.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::auth;
use crate::error::ApiError;
use crate::AppContext;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// POST /api/users/register — create an account and mint a token.
pub async fn register(
    State(ctx): State<Arc<AppContext>>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(req) = body.map_err(|rej| ApiError::Validation(rej.body_text()))?;
    if req.name.trim().is_empty() || req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation(
            "name, email, and password are required".to_string(),
        ));
    }

    let password_hash = auth::hash_password(&req.password);
    let user = ctx
        .users
        .create(&req.name, &req.email, &password_hash)
        .await
        .map_err(ApiError::store)?
        .ok_or_else(|| ApiError::Validation("email already registered".to_string()))?;

    let token = auth::issue_token(&user.id, ctx.config.token_ttl_secs, &ctx.auth_secret)
        .map_err(ApiError::store)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "user": { "id": user.id, "name": user.name, "email": user.email },
            "token": token,
        })),
    ))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/users/login — verify credentials and mint a token.
pub async fn login(
    State(ctx): State<Arc<AppContext>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = body.map_err(|rej| ApiError::Validation(rej.body_text()))?;

    let user = ctx
        .users
        .find_by_email(&req.email)
        .await
        .map_err(ApiError::store)?
        .ok_or(ApiError::Unauthorized("Invalid email or password"))?;

    if !auth::verify_password(&req.password, &user.password_hash) {
        return Err(ApiError::Unauthorized("Invalid email or password"));
    }

    let token = auth::issue_token(&user.id, ctx.config.token_ttl_secs, &ctx.auth_secret)
        .map_err(ApiError::store)?;
    Ok(Json(json!({ "token": token })))
}
