//! SQLite store - the persistent entity store

use async_trait::async_trait;

use super::{CategoryFilter, EntityStore, SongQuery};
use crate::core::errors::{LibraryError, LibraryResult};
use crate::db::{DbEngine, SongTable, SongTagTable, TagTable, UserTable};
use crate::models::{NewSong, NewTag, NewUser, Song, Tag, TagWithCount, TaggedSong, User};

/// Entity store backed by the SQLite database
#[derive(Debug, Clone)]
pub struct SqliteStore {
    engine: DbEngine,
}

impl SqliteStore {
    pub fn new(engine: DbEngine) -> Self {
        Self { engine }
    }

    /// Connect to `url` and prepare the schema
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        Ok(Self::new(DbEngine::connect(url).await?))
    }

    async fn attach_tags(&self, songs: Vec<Song>) -> LibraryResult<Vec<TaggedSong>> {
        let ids: Vec<i64> = songs.iter().map(|s| s.id).collect();
        let mut names = SongTagTable::tag_names_for_songs(self.engine.pool(), &ids).await?;

        Ok(songs
            .into_iter()
            .map(|song| {
                let tags = names.remove(&song.id).unwrap_or_default();
                TaggedSong::new(song, tags)
            })
            .collect())
    }
}

#[async_trait]
impl EntityStore for SqliteStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn find_or_create_user(&self, profile: &NewUser) -> LibraryResult<User> {
        let pool = self.engine.pool();

        UserTable::insert_if_absent(pool, profile).await?;
        UserTable::get_by_provider_id(pool, &profile.provider_id)
            .await?
            .ok_or_else(|| LibraryError::Internal("User vanished after insert".to_string()))
    }

    async fn get_user(&self, id: i64) -> LibraryResult<Option<User>> {
        UserTable::get_by_id(self.engine.pool(), id).await
    }

    async fn insert_song_if_absent(&self, owner: i64, song: &NewSong) -> LibraryResult<bool> {
        SongTable::insert_if_absent(self.engine.pool(), owner, song).await
    }

    async fn get_song(&self, owner: i64, id: i64) -> LibraryResult<Option<Song>> {
        SongTable::get_owned(self.engine.pool(), owner, id).await
    }

    async fn songs(&self, owner: i64) -> LibraryResult<Vec<Song>> {
        SongTable::all_for_owner(self.engine.pool(), owner).await
    }

    async fn query_songs(&self, owner: i64, query: &SongQuery) -> LibraryResult<Vec<TaggedSong>> {
        let songs = SongTable::query_page(self.engine.pool(), owner, query).await?;
        self.attach_tags(songs).await
    }

    async fn songs_by_category(
        &self,
        owner: i64,
        filter: &CategoryFilter,
    ) -> LibraryResult<Vec<TaggedSong>> {
        let songs = SongTable::by_category(self.engine.pool(), owner, filter).await?;
        self.attach_tags(songs).await
    }

    async fn insert_tag(&self, owner: i64, tag: &NewTag) -> LibraryResult<Tag> {
        TagTable::insert(self.engine.pool(), owner, tag).await
    }

    async fn get_tag(&self, owner: i64, id: i64) -> LibraryResult<Option<Tag>> {
        TagTable::get_owned(self.engine.pool(), owner, id).await
    }

    async fn find_tag_by_name(&self, owner: i64, name: &str) -> LibraryResult<Option<Tag>> {
        TagTable::get_by_name(self.engine.pool(), owner, name).await
    }

    async fn tags_with_counts(&self, owner: i64) -> LibraryResult<Vec<TagWithCount>> {
        TagTable::all_with_counts(self.engine.pool(), owner).await
    }

    async fn insert_song_tag_if_absent(&self, song_id: i64, tag_id: i64) -> LibraryResult<bool> {
        SongTagTable::insert_if_absent(self.engine.pool(), song_id, tag_id).await
    }

    async fn delete_song_tag(&self, song_id: i64, tag_id: i64) -> LibraryResult<bool> {
        SongTagTable::delete(self.engine.pool(), song_id, tag_id).await
    }

    async fn set_tag_order(&self, owner: i64, tag_ids: &[i64]) -> LibraryResult<()> {
        TagTable::set_order(self.engine.pool(), owner, tag_ids).await
    }

    async fn set_tag_visibility(
        &self,
        owner: i64,
        tag_id: i64,
        visible: bool,
    ) -> LibraryResult<bool> {
        TagTable::set_visibility(self.engine.pool(), owner, tag_id, visible).await
    }
}
