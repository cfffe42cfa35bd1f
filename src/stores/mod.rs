//! Entity stores
//!
//! The rest of the crate talks to persistence only through [`EntityStore`].
//! [`SqliteStore`] keeps the library in SQLite; [`MemoryStore`] keeps it in
//! process memory for development and tests. Both enforce the uniqueness rules
//! at the point of mutation and return identical results, including ordering:
//! songs by `(title, id)`, tags by `(order_index, id)`, tag names on a song by
//! the owner's tag order.

mod fixtures;
mod memory_store;
mod sqlite_store;

#[cfg(test)]
mod conformance;

use async_trait::async_trait;

use crate::core::errors::LibraryResult;
use crate::models::{NewSong, NewTag, NewUser, Song, Tag, TagWithCount, TaggedSong, User};

pub use fixtures::seed_demo_library;
pub use memory_store::MemoryStore;
pub use sqlite_store::SqliteStore;

/// Selection for the song listing, with text already case-folded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongQuery {
    /// Substring that the folded title or artist must contain
    pub search: Option<String>,
    /// Folded tag names that a song must all carry
    pub tags: Vec<String>,
    pub offset: i64,
    pub limit: i64,
}

/// Songs of one artist, or of one album optionally narrowed to one artist
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    Artist(String),
    Album {
        name: String,
        artist: Option<String>,
    },
}

impl CategoryFilter {
    pub fn matches(&self, song: &Song) -> bool {
        match self {
            CategoryFilter::Artist(name) => &song.artist == name,
            CategoryFilter::Album { name, artist } => {
                &song.album == name && artist.as_ref().map_or(true, |a| &song.artist == a)
            }
        }
    }
}

#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;

    /// Return the user with this provider id, creating it first if absent
    async fn find_or_create_user(&self, profile: &NewUser) -> LibraryResult<User>;

    async fn get_user(&self, id: i64) -> LibraryResult<Option<User>>;

    /// Insert the song unless `(external_id, owner)` exists. Returns whether a
    /// row was inserted.
    async fn insert_song_if_absent(&self, owner: i64, song: &NewSong) -> LibraryResult<bool>;

    async fn get_song(&self, owner: i64, id: i64) -> LibraryResult<Option<Song>>;

    /// All owned songs ordered by id
    async fn songs(&self, owner: i64) -> LibraryResult<Vec<Song>>;

    /// One page of owned songs matching the query, ordered by `(title, id)`
    async fn query_songs(&self, owner: i64, query: &SongQuery) -> LibraryResult<Vec<TaggedSong>>;

    /// Owned songs matching the filter, ordered by id
    async fn songs_by_category(
        &self,
        owner: i64,
        filter: &CategoryFilter,
    ) -> LibraryResult<Vec<TaggedSong>>;

    /// Insert a tag at the end of the owner's order. Fails with `Conflict`
    /// when the owner already has a tag with the same folded name.
    async fn insert_tag(&self, owner: i64, tag: &NewTag) -> LibraryResult<Tag>;

    async fn get_tag(&self, owner: i64, id: i64) -> LibraryResult<Option<Tag>>;

    async fn find_tag_by_name(&self, owner: i64, name: &str) -> LibraryResult<Option<Tag>>;

    /// Owned tags with song counts, ordered by `(order_index, id)`
    async fn tags_with_counts(&self, owner: i64) -> LibraryResult<Vec<TagWithCount>>;

    /// Returns whether the pair was inserted
    async fn insert_song_tag_if_absent(&self, song_id: i64, tag_id: i64) -> LibraryResult<bool>;

    /// Returns whether a pair was deleted
    async fn delete_song_tag(&self, song_id: i64, tag_id: i64) -> LibraryResult<bool>;

    /// Set each owned tag's order index to its position in `tag_ids`, all at
    /// once. Ids the owner does not have are skipped.
    async fn set_tag_order(&self, owner: i64, tag_ids: &[i64]) -> LibraryResult<()>;

    /// Returns whether an owned tag was updated
    async fn set_tag_visibility(&self, owner: i64, tag_id: i64, visible: bool)
        -> LibraryResult<bool>;
}
