//! User table operations.

use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::model::UserRow;

pub struct UserStorage {
    pool: SqlitePool,
}

impl UserStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert an account. Returns `None` when the email is already
    /// registered (UNIQUE constraint, probed with INSERT OR IGNORE).
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<UserRow>> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            "INSERT OR IGNORE INTO users (id, name, email, password_hash, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(self.get(&id).await?)
    }

    pub async fn get(&self, id: &str) -> Result<Option<UserRow>> {
        Ok(sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        Ok(sqlx::query_as("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_storage() -> UserStorage {
        let pool = sqlx::SqlitePool::connect("sqlite::memory:").await.unwrap();
        let sql = include_str!("../storage/migrations/001_init.sql");
        for stmt in sql.split(';') {
            let stmt = stmt.trim();
            if !stmt.is_empty() {
                sqlx::query(stmt).execute(&pool).await.unwrap();
            }
        }
        UserStorage::new(pool)
    }

    #[tokio::test]
    async fn create_and_find_by_email() {
        let s = test_storage().await;
        let user = s
            .create("Ada", "ada@example.com", "salt$digest")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.email, "ada@example.com");

        let found = s.find_by_email("ada@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let s = test_storage().await;
        s.create("Ada", "ada@example.com", "h1").await.unwrap();
        let dup = s.create("Eve", "ada@example.com", "h2").await.unwrap();
        assert!(dup.is_none());
    }
}
