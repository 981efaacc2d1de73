//! Task table operations.

use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::model::{default_due_date, NewTask, TaskChanges, TaskPriority, TaskRow, TaskStatus};

pub struct TaskStorage {
    pub(crate) pool: SqlitePool,
}

impl TaskStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a task owned by `user_id`, filling `status`, `priority`,
    /// and `due_date` with defaults when absent. Returns the stored row
    /// with its generated id and creation timestamp.
    pub async fn create(&self, user_id: &str, new: &NewTask) -> Result<TaskRow> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let status = new.status.unwrap_or(TaskStatus::Pending);
        let priority = new.priority.unwrap_or(TaskPriority::Medium);
        let due_date = new.due_date.unwrap_or_else(|| default_due_date(now));

        sqlx::query(
            "INSERT INTO tasks (id, title, description, status, priority, due_date, user_id, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(status.as_str())
        .bind(priority.as_str())
        .bind(due_date.to_rfc3339())
        .bind(user_id)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        self.get(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("task not found after insert"))
    }

    pub async fn get(&self, id: &str) -> Result<Option<TaskRow>> {
        Ok(sqlx::query_as("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// All of one user's tasks, newest first. Full scan — no pagination.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<TaskRow>> {
        Ok(
            sqlx::query_as("SELECT * FROM tasks WHERE user_id = ? ORDER BY created_at DESC")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?,
        )
    }

    /// Apply a partial update to the mutable fields. Returns the
    /// post-update row, or `None` if the id does not resolve. Last
    /// writer wins — no concurrency token.
    pub async fn update(&self, id: &str, changes: &TaskChanges) -> Result<Option<TaskRow>> {
        let Some(mut task) = self.get(id).await? else {
            return Ok(None);
        };

        if let Some(title) = &changes.title {
            task.title = title.clone();
        }
        if let Some(description) = &changes.description {
            task.description = Some(description.clone());
        }
        if let Some(status) = changes.status {
            task.status = status.as_str().to_string();
        }
        if let Some(priority) = changes.priority {
            task.priority = priority.as_str().to_string();
        }
        if let Some(due_date) = changes.due_date {
            task.due_date = due_date.to_rfc3339();
        }

        sqlx::query(
            "UPDATE tasks SET title = ?, description = ?, status = ?, priority = ?, due_date = ? \
             WHERE id = ?",
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.status)
        .bind(&task.priority)
        .bind(&task.due_date)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(Some(task))
    }

    /// Remove a task permanently. Returns `false` if the id did not
    /// resolve.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    async fn test_storage() -> TaskStorage {
        let pool = sqlx::SqlitePool::connect("sqlite::memory:").await.unwrap();
        let sql = include_str!("../storage/migrations/001_init.sql");
        for stmt in sql.split(';') {
            let stmt = stmt.trim();
            if !stmt.is_empty() {
                sqlx::query(stmt).execute(&pool).await.unwrap();
            }
        }
        TaskStorage::new(pool)
    }

    fn title_only(title: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: None,
            status: None,
            priority: None,
            due_date: None,
        }
    }

    #[tokio::test]
    async fn create_fills_defaults() {
        let s = test_storage().await;
        let before = Utc::now();
        let task = s.create("u1", &title_only("Write report")).await.unwrap();

        assert_eq!(task.status, "pending");
        assert_eq!(task.priority, "medium");
        assert_eq!(task.user_id, "u1");

        let due = DateTime::parse_from_rfc3339(&task.due_date).unwrap();
        let expected = before + chrono::Duration::days(7);
        let drift = (due.with_timezone(&Utc) - expected).num_seconds().abs();
        assert!(drift < 60, "due date {drift}s away from now + 7 days");
    }

    #[tokio::test]
    async fn list_is_owner_scoped_and_newest_first() {
        let s = test_storage().await;
        let a = s.create("u1", &title_only("first")).await.unwrap();
        let b = s.create("u1", &title_only("second")).await.unwrap();
        s.create("u2", &title_only("other user")).await.unwrap();

        let tasks = s.list_for_user("u1").await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, b.id);
        assert_eq!(tasks[1].id, a.id);
    }

    #[tokio::test]
    async fn update_changes_only_named_fields() {
        let s = test_storage().await;
        let task = s.create("u1", &title_only("stable")).await.unwrap();

        let changes = TaskChanges {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        let updated = s.update(&task.id, &changes).await.unwrap().unwrap();

        assert_eq!(updated.status, "completed");
        assert_eq!(updated.title, task.title);
        assert_eq!(updated.priority, task.priority);
        assert_eq!(updated.due_date, task.due_date);
        assert_eq!(updated.user_id, task.user_id);
        assert_eq!(updated.created_at, task.created_at);
    }

    #[tokio::test]
    async fn update_missing_id_leaves_collection_unchanged() {
        let s = test_storage().await;
        s.create("u1", &title_only("only")).await.unwrap();

        let changes = TaskChanges {
            title: Some("renamed".to_string()),
            ..Default::default()
        };
        assert!(s.update("no-such-id", &changes).await.unwrap().is_none());

        let tasks = s.list_for_user("u1").await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "only");
    }

    #[tokio::test]
    async fn delete_twice_reports_not_found() {
        let s = test_storage().await;
        let task = s.create("u1", &title_only("ephemeral")).await.unwrap();

        assert!(s.delete(&task.id).await.unwrap());
        assert!(s.list_for_user("u1").await.unwrap().is_empty());
        assert!(!s.delete(&task.id).await.unwrap());
    }
}
