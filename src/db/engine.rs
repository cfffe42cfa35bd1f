//! Database engine and connection management

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::debug;

use super::migrations::run_migrations;

/// Database engine wrapper
#[derive(Debug, Clone)]
pub struct DbEngine {
    pool: SqlitePool,
}

impl DbEngine {
    /// Connect to the SQLite database at `url`, creating it and its tables if
    /// needed, then bring the schema up to date.
    ///
    /// `sqlite::memory:` databases live per connection, so they get a single
    /// pooled connection.
    pub async fn connect(url: &str) -> Result<DbEngine> {
        let in_memory = url.contains(":memory:");

        // Create connection options with SQLite pragmas
        let mut options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid database url: {}", url))?
            .create_if_missing(true)
            .busy_timeout(std::time::Duration::from_secs(30))
            .foreign_keys(true);
        if !in_memory {
            options = options
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
                .pragma("cache_size", "10000");
        }

        // Create connection pool
        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { 5 })
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;

        let engine = DbEngine { pool };

        // Create tables
        engine.create_tables().await?;
        run_migrations(engine.pool()).await?;

        debug!("Database ready at {}", url);
        Ok(engine)
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create all database tables
    async fn create_tables(&self) -> Result<()> {
        let pool = self.pool();

        // User table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                provider_id TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL DEFAULT '',
                display_name TEXT NOT NULL DEFAULT 'User',
                created_at INTEGER NOT NULL DEFAULT (strftime('%s','now'))
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Song table; folded columns hold the case-folded search text
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS songs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                external_id TEXT NOT NULL,
                title TEXT NOT NULL,
                title_folded TEXT NOT NULL,
                artist TEXT NOT NULL,
                artist_folded TEXT NOT NULL,
                album TEXT NOT NULL,
                artwork_url TEXT,
                user_id INTEGER NOT NULL,
                created_at INTEGER NOT NULL DEFAULT (strftime('%s','now')),
                UNIQUE (external_id, user_id),
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_songs_user_title ON songs(user_id, title);
            CREATE INDEX IF NOT EXISTS idx_songs_user_album ON songs(user_id, album);
            CREATE INDEX IF NOT EXISTS idx_songs_user_artist ON songs(user_id, artist);
            "#,
        )
        .execute(pool)
        .await?;

        // Tag table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                name_folded TEXT NOT NULL,
                color TEXT NOT NULL DEFAULT '#3B82F6',
                order_index INTEGER NOT NULL DEFAULT 0,
                is_visible INTEGER NOT NULL DEFAULT 1,
                created_at INTEGER NOT NULL DEFAULT (strftime('%s','now')),
                UNIQUE (user_id, name_folded),
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_tags_user_order ON tags(user_id, order_index);
            "#,
        )
        .execute(pool)
        .await?;

        // Song <-> tag association
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS song_tags (
                song_id INTEGER NOT NULL,
                tag_id INTEGER NOT NULL,
                created_at INTEGER NOT NULL DEFAULT (strftime('%s','now')),
                PRIMARY KEY (song_id, tag_id),
                FOREIGN KEY (song_id) REFERENCES songs(id) ON DELETE CASCADE,
                FOREIGN KEY (tag_id) REFERENCES tags(id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Migration table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS dbmigration (
                id INTEGER PRIMARY KEY,
                version INTEGER NOT NULL DEFAULT 0
            );
            INSERT OR IGNORE INTO dbmigration (id, version) VALUES (1, 0);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}
