//! Song-tag association table operations

use std::collections::HashMap;

use sqlx::SqlitePool;

use crate::core::errors::LibraryResult;

/// Keeps `IN (...)` lists well under SQLite's bound-parameter limit
const LOOKUP_CHUNK: usize = 500;

/// Song-tag table operations
pub struct SongTagTable;

impl SongTagTable {
    /// Insert the pair unless present. Returns whether a row was inserted.
    pub async fn insert_if_absent(
        pool: &SqlitePool,
        song_id: i64,
        tag_id: i64,
    ) -> LibraryResult<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = sqlx::query(
            "INSERT INTO song_tags (song_id, tag_id, created_at) VALUES (?, ?, ?) ON CONFLICT DO NOTHING",
        )
        .bind(song_id)
        .bind(tag_id)
        .bind(now)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete the pair. Returns whether it existed.
    pub async fn delete(pool: &SqlitePool, song_id: i64, tag_id: i64) -> LibraryResult<bool> {
        let result = sqlx::query("DELETE FROM song_tags WHERE song_id = ? AND tag_id = ?")
            .bind(song_id)
            .bind(tag_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Tag names per song, each list in tag display order
    pub async fn tag_names_for_songs(
        pool: &SqlitePool,
        song_ids: &[i64],
    ) -> LibraryResult<HashMap<i64, Vec<String>>> {
        let mut names: HashMap<i64, Vec<String>> = HashMap::new();

        for chunk in song_ids.chunks(LOOKUP_CHUNK) {
            let placeholders: String = chunk.iter().map(|_| "?").collect::<Vec<_>>().join(",");
            let query = format!(
                r#"
                SELECT st.song_id, t.name
                FROM song_tags st
                JOIN tags t ON st.tag_id = t.id
                WHERE st.song_id IN ({})
                ORDER BY st.song_id, t.order_index, t.id
                "#,
                placeholders
            );

            let mut query_builder = sqlx::query_as::<_, (i64, String)>(&query);
            for id in chunk {
                query_builder = query_builder.bind(id);
            }

            for (song_id, name) in query_builder.fetch_all(pool).await? {
                names.entry(song_id).or_default().push(name);
            }
        }

        Ok(names)
    }
}
