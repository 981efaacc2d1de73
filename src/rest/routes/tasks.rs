// rest/routes/tasks.rs — Task CRUD routes.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::ApiError;
use crate::rest::auth::AuthUser;
use crate::tasks::model::{NewTask, TaskChanges, TaskRow};
use crate::AppContext;

/// GET /api/tasks — the caller's tasks, newest first.
pub async fn list_tasks(
    State(ctx): State<Arc<AppContext>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<Vec<TaskRow>>, ApiError> {
    let tasks = ctx
        .tasks
        .list_for_user(&user_id)
        .await
        .map_err(ApiError::store)?;
    Ok(Json(tasks))
}

/// POST /api/tasks — create a task owned by the caller.
pub async fn create_task(
    State(ctx): State<Arc<AppContext>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    body: Result<Json<NewTask>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskRow>), ApiError> {
    let Json(new) = body.map_err(|rej| ApiError::Validation(rej.body_text()))?;
    if new.title.trim().is_empty() {
        return Err(ApiError::Validation("title is required".to_string()));
    }

    let task = ctx
        .tasks
        .create(&user_id, &new)
        .await
        .map_err(ApiError::store)?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// PATCH /api/tasks/{id} — apply a typed partial update.
pub async fn update_task(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
    body: Result<Json<TaskChanges>, JsonRejection>,
) -> Result<Json<TaskRow>, ApiError> {
    let Json(changes) = body.map_err(|rej| ApiError::Validation(rej.body_text()))?;
    if let Some(title) = &changes.title {
        if title.trim().is_empty() {
            return Err(ApiError::Validation("title cannot be empty".to_string()));
        }
    }

    // An empty patch is a read — skip the write.
    let task = if changes.is_empty() {
        ctx.tasks.get(&id).await.map_err(ApiError::store)?
    } else {
        ctx.tasks.update(&id, &changes).await.map_err(ApiError::store)?
    };

    task.map(Json).ok_or(ApiError::NotFound("Task"))
}

/// DELETE /api/tasks/{id} — permanent removal.
pub async fn delete_task(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let deleted = ctx.tasks.delete(&id).await.map_err(ApiError::store)?;
    if !deleted {
        return Err(ApiError::NotFound("Task"));
    }
    Ok(Json(json!({ "message": "Task deleted successfully" })))
}
