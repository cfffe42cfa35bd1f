//! Song table operations

use sqlx::{FromRow, SqlitePool};

use crate::core::errors::LibraryResult;
use crate::models::{NewSong, Song};
use crate::stores::{CategoryFilter, SongQuery};
use crate::utils::parsers::fold_case;

const SONG_COLUMNS: &str =
    "s.id, s.external_id, s.title, s.artist, s.album, s.artwork_url, s.user_id, s.created_at";

/// Database row for songs table
#[derive(Debug, FromRow)]
struct SongRow {
    id: i64,
    external_id: String,
    title: String,
    artist: String,
    album: String,
    artwork_url: Option<String>,
    user_id: i64,
    created_at: i64,
}

impl SongRow {
    fn into_song(self) -> Song {
        Song {
            id: self.id,
            external_id: self.external_id,
            title: self.title,
            artist: self.artist,
            album: self.album,
            artwork_url: self.artwork_url,
            user_id: self.user_id,
            created_at: self.created_at,
        }
    }
}

/// Song table operations
pub struct SongTable;

impl SongTable {
    /// Insert a song unless the owner already has its external id. Returns
    /// whether a row was inserted.
    pub async fn insert_if_absent(
        pool: &SqlitePool,
        owner: i64,
        song: &NewSong,
    ) -> LibraryResult<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = sqlx::query(
            r#"
            INSERT INTO songs (external_id, title, title_folded, artist, artist_folded,
                               album, artwork_url, user_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (external_id, user_id) DO NOTHING
            "#,
        )
        .bind(&song.external_id)
        .bind(&song.title)
        .bind(fold_case(&song.title))
        .bind(&song.artist)
        .bind(fold_case(&song.artist))
        .bind(&song.album)
        .bind(&song.artwork_url)
        .bind(owner)
        .bind(now)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get an owned song by ID
    pub async fn get_owned(pool: &SqlitePool, owner: i64, id: i64) -> LibraryResult<Option<Song>> {
        let query = format!(
            "SELECT {} FROM songs s WHERE s.id = ? AND s.user_id = ?",
            SONG_COLUMNS
        );
        let row: Option<SongRow> = sqlx::query_as(&query)
            .bind(id)
            .bind(owner)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(|r| r.into_song()))
    }

    /// Get all owned songs ordered by id
    pub async fn all_for_owner(pool: &SqlitePool, owner: i64) -> LibraryResult<Vec<Song>> {
        let query = format!(
            "SELECT {} FROM songs s WHERE s.user_id = ? ORDER BY s.id",
            SONG_COLUMNS
        );
        let rows: Vec<SongRow> = sqlx::query_as(&query).bind(owner).fetch_all(pool).await?;

        Ok(rows.into_iter().map(|r| r.into_song()).collect())
    }

    /// Get one page of owned songs matching the query, ordered by title then id
    pub async fn query_page(
        pool: &SqlitePool,
        owner: i64,
        filter: &SongQuery,
    ) -> LibraryResult<Vec<Song>> {
        let mut query = format!("SELECT {} FROM songs s WHERE s.user_id = ?", SONG_COLUMNS);

        if filter.search.is_some() {
            query.push_str(" AND (instr(s.title_folded, ?) > 0 OR instr(s.artist_folded, ?) > 0)");
        }

        // a song must carry every requested tag
        if !filter.tags.is_empty() {
            let placeholders: String = filter.tags.iter().map(|_| "?").collect::<Vec<_>>().join(",");
            query.push_str(&format!(
                r#" AND s.id IN (
                    SELECT st.song_id
                    FROM song_tags st
                    JOIN tags t ON st.tag_id = t.id
                    WHERE t.user_id = ? AND t.name_folded IN ({})
                    GROUP BY st.song_id
                    HAVING COUNT(DISTINCT t.name_folded) = ?
                )"#,
                placeholders
            ));
        }

        query.push_str(" ORDER BY s.title, s.id LIMIT ? OFFSET ?");

        let mut query_builder = sqlx::query_as::<_, SongRow>(&query).bind(owner);
        if let Some(search) = &filter.search {
            query_builder = query_builder.bind(search).bind(search);
        }
        if !filter.tags.is_empty() {
            query_builder = query_builder.bind(owner);
            for name in &filter.tags {
                query_builder = query_builder.bind(name);
            }
            query_builder = query_builder.bind(filter.tags.len() as i64);
        }
        query_builder = query_builder.bind(filter.limit).bind(filter.offset);

        let rows = query_builder.fetch_all(pool).await?;
        Ok(rows.into_iter().map(|r| r.into_song()).collect())
    }

    /// Get owned songs of one artist or album, ordered by id
    pub async fn by_category(
        pool: &SqlitePool,
        owner: i64,
        filter: &CategoryFilter,
    ) -> LibraryResult<Vec<Song>> {
        let rows: Vec<SongRow> = match filter {
            CategoryFilter::Artist(name) => {
                let query = format!(
                    "SELECT {} FROM songs s WHERE s.user_id = ? AND s.artist = ? ORDER BY s.id",
                    SONG_COLUMNS
                );
                sqlx::query_as(&query)
                    .bind(owner)
                    .bind(name)
                    .fetch_all(pool)
                    .await?
            }
            CategoryFilter::Album { name, artist: None } => {
                let query = format!(
                    "SELECT {} FROM songs s WHERE s.user_id = ? AND s.album = ? ORDER BY s.id",
                    SONG_COLUMNS
                );
                sqlx::query_as(&query)
                    .bind(owner)
                    .bind(name)
                    .fetch_all(pool)
                    .await?
            }
            CategoryFilter::Album {
                name,
                artist: Some(artist),
            } => {
                let query = format!(
                    "SELECT {} FROM songs s WHERE s.user_id = ? AND s.album = ? AND s.artist = ? ORDER BY s.id",
                    SONG_COLUMNS
                );
                sqlx::query_as(&query)
                    .bind(owner)
                    .bind(name)
                    .bind(artist)
                    .fetch_all(pool)
                    .await?
            }
        };

        Ok(rows.into_iter().map(|r| r.into_song()).collect())
    }
}
