//! Tag table operations

use sqlx::{FromRow, SqlitePool};

use crate::core::errors::{LibraryError, LibraryResult};
use crate::models::{NewTag, Tag, TagWithCount};
use crate::utils::parsers::fold_case;

const TAG_COLUMNS: &str =
    "t.id, t.name, t.color, t.user_id, t.order_index, t.is_visible, t.created_at";

/// Database row for tags table
#[derive(Debug, FromRow)]
struct TagRow {
    id: i64,
    name: String,
    color: String,
    user_id: i64,
    order_index: i64,
    is_visible: bool,
    created_at: i64,
}

impl TagRow {
    fn into_tag(self) -> Tag {
        Tag {
            id: self.id,
            name: self.name,
            color: self.color,
            user_id: self.user_id,
            order_index: self.order_index,
            is_visible: self.is_visible,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct TagCountRow {
    #[sqlx(flatten)]
    tag: TagRow,
    song_count: i64,
}

/// Tag table operations
pub struct TagTable;

impl TagTable {
    /// Insert a tag after the owner's last one
    pub async fn insert(pool: &SqlitePool, owner: i64, tag: &NewTag) -> LibraryResult<Tag> {
        let now = chrono::Utc::now().timestamp();

        // the unique (user_id, name_folded) index arbitrates concurrent creates
        let result = sqlx::query(
            r#"
            INSERT INTO tags (user_id, name, name_folded, color, order_index, is_visible, created_at)
            SELECT ?, ?, ?, ?, COALESCE(MAX(order_index) + 1, 0), 1, ?
            FROM tags WHERE user_id = ?
            "#,
        )
        .bind(owner)
        .bind(&tag.name)
        .bind(fold_case(&tag.name))
        .bind(&tag.color)
        .bind(now)
        .bind(owner)
        .execute(pool)
        .await
        .map_err(|e| match LibraryError::from(e) {
            LibraryError::Conflict(_) => LibraryError::conflict("Tag name already exists"),
            other => other,
        })?;

        Self::get_owned(pool, owner, result.last_insert_rowid())
            .await?
            .ok_or_else(|| LibraryError::Internal("Inserted tag vanished".to_string()))
    }

    /// Get an owned tag by ID
    pub async fn get_owned(pool: &SqlitePool, owner: i64, id: i64) -> LibraryResult<Option<Tag>> {
        let query = format!(
            "SELECT {} FROM tags t WHERE t.id = ? AND t.user_id = ?",
            TAG_COLUMNS
        );
        let row: Option<TagRow> = sqlx::query_as(&query)
            .bind(id)
            .bind(owner)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(|r| r.into_tag()))
    }

    /// Get an owned tag by name, ignoring case
    pub async fn get_by_name(
        pool: &SqlitePool,
        owner: i64,
        name: &str,
    ) -> LibraryResult<Option<Tag>> {
        let query = format!(
            "SELECT {} FROM tags t WHERE t.user_id = ? AND t.name_folded = ?",
            TAG_COLUMNS
        );
        let row: Option<TagRow> = sqlx::query_as(&query)
            .bind(owner)
            .bind(fold_case(name))
            .fetch_optional(pool)
            .await?;

        Ok(row.map(|r| r.into_tag()))
    }

    /// Get all owned tags with song counts in display order
    pub async fn all_with_counts(
        pool: &SqlitePool,
        owner: i64,
    ) -> LibraryResult<Vec<TagWithCount>> {
        let query = format!(
            r#"
            SELECT {}, COUNT(st.song_id) AS song_count
            FROM tags t
            LEFT JOIN song_tags st ON st.tag_id = t.id
            WHERE t.user_id = ?
            GROUP BY t.id
            ORDER BY t.order_index, t.id
            "#,
            TAG_COLUMNS
        );
        let rows: Vec<TagCountRow> = sqlx::query_as(&query).bind(owner).fetch_all(pool).await?;

        Ok(rows
            .into_iter()
            .map(|r| TagWithCount {
                tag: r.tag.into_tag(),
                song_count: r.song_count,
            })
            .collect())
    }

    /// Rewrite order indexes from list positions in one transaction
    pub async fn set_order(pool: &SqlitePool, owner: i64, tag_ids: &[i64]) -> LibraryResult<()> {
        let mut tx = pool.begin().await?;

        for (position, id) in tag_ids.iter().enumerate() {
            sqlx::query("UPDATE tags SET order_index = ? WHERE id = ? AND user_id = ?")
                .bind(position as i64)
                .bind(id)
                .bind(owner)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Update visibility of an owned tag. Returns whether it exists.
    pub async fn set_visibility(
        pool: &SqlitePool,
        owner: i64,
        id: i64,
        visible: bool,
    ) -> LibraryResult<bool> {
        let result = sqlx::query("UPDATE tags SET is_visible = ? WHERE id = ? AND user_id = ?")
            .bind(visible)
            .bind(id)
            .bind(owner)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
