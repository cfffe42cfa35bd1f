//! Database migrations

use anyhow::Result;
use sqlx::SqlitePool;
use tracing::info;

/// Current migration version
const CURRENT_VERSION: i32 = 1;

/// Run database migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    let current_version = get_migration_version(pool).await?;

    if current_version >= CURRENT_VERSION {
        info!("Database is up to date (version {})", current_version);
        return Ok(());
    }

    info!(
        "Running migrations from version {} to {}",
        current_version, CURRENT_VERSION
    );

    // Run migrations in order
    for version in (current_version + 1)..=CURRENT_VERSION {
        run_migration(pool, version).await?;

        // Update version
        sqlx::query("UPDATE dbmigration SET version = ? WHERE id = 1")
            .bind(version)
            .execute(pool)
            .await?;

        info!("Applied migration {}", version);
    }

    Ok(())
}

async fn run_migration(pool: &SqlitePool, version: i32) -> Result<()> {
    match version {
        1 => {
            // tag song counts scan song_tags by tag
            sqlx::query("CREATE INDEX IF NOT EXISTS idx_song_tags_tag_id ON song_tags(tag_id)")
                .execute(pool)
                .await?;
        }
        _ => {
            tracing::warn!("Unknown migration version: {}", version);
        }
    }

    Ok(())
}

/// Get the current migration version
pub async fn get_migration_version(pool: &SqlitePool) -> Result<i32> {
    let row: (i32,) = sqlx::query_as("SELECT version FROM dbmigration WHERE id = 1")
        .fetch_one(pool)
        .await?;

    Ok(row.0)
}
