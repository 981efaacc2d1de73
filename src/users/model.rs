//! User account data model.

use sqlx::FromRow;

/// One account row. Never serialized directly — responses pick fields so
/// the password digest stays server-side.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: String,
}
