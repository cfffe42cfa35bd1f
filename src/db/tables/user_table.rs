//! User table operations

use sqlx::{FromRow, SqlitePool};

use crate::core::errors::LibraryResult;
use crate::models::{NewUser, User};

/// Database row for users table
#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    provider_id: String,
    email: String,
    display_name: String,
    created_at: i64,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: self.id,
            provider_id: self.provider_id,
            email: self.email,
            display_name: self.display_name,
            created_at: self.created_at,
        }
    }
}

/// User table operations
pub struct UserTable;

impl UserTable {
    /// Get user by ID
    pub async fn get_by_id(pool: &SqlitePool, id: i64) -> LibraryResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, provider_id, email, display_name, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(|r| r.into_user()))
    }

    /// Get user by provider id
    pub async fn get_by_provider_id(
        pool: &SqlitePool,
        provider_id: &str,
    ) -> LibraryResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, provider_id, email, display_name, created_at FROM users WHERE provider_id = ?",
        )
        .bind(provider_id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(|r| r.into_user()))
    }

    /// Insert a user unless the provider id is taken. Returns whether a row
    /// was inserted.
    pub async fn insert_if_absent(pool: &SqlitePool, profile: &NewUser) -> LibraryResult<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = sqlx::query(
            r#"
            INSERT INTO users (provider_id, email, display_name, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (provider_id) DO NOTHING
            "#,
        )
        .bind(&profile.provider_id)
        .bind(profile.email_or_default())
        .bind(profile.display_name_or_default())
        .bind(now)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
