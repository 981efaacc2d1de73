//! Task data model types.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One task row, as stored and as serialized on the wire (camelCase,
/// `user_id` → `"user"`). Timestamps are RFC 3339 TEXT, so `created_at`
/// ordering is lexicographic = chronological.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TaskRow {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub due_date: String,
    #[serde(rename = "user")]
    pub user_id: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

/// Create payload. The owner is never part of the payload — it comes
/// from the authenticated caller.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Typed partial update over the mutable fields only. Absent fields are
/// left unchanged; `user` and `created_at` cannot be written through
/// this contract. Unknown payload fields are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }
}

/// Default due date: creation time + 7 days.
pub fn default_due_date(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(7)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_names() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        let s: TaskStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(s, TaskStatus::Completed);
    }

    #[test]
    fn invalid_status_rejected() {
        assert!(serde_json::from_str::<TaskStatus>("\"done\"").is_err());
    }

    #[test]
    fn changes_ignore_unknown_fields() {
        let changes: TaskChanges =
            serde_json::from_str(r#"{"status":"completed","user":"other","createdAt":"x"}"#)
                .unwrap();
        assert_eq!(changes.status, Some(TaskStatus::Completed));
        assert!(changes.title.is_none());
    }

    #[test]
    fn empty_changes_detected() {
        let changes: TaskChanges = serde_json::from_str("{}").unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn due_date_default_is_a_week_out() {
        let now = Utc::now();
        assert_eq!(default_due_date(now) - now, Duration::days(7));
    }
}
