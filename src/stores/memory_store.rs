//! Memory store - process-local library used for development and tests

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{CategoryFilter, EntityStore, SongQuery};
use crate::core::errors::{LibraryError, LibraryResult};
use crate::models::{NewSong, NewTag, NewUser, Song, Tag, TagWithCount, TaggedSong, User};
use crate::utils::parsers::fold_case;

/// All collections behind one lock, so every check-then-insert and the tag
/// reorder happen under a single write guard.
#[derive(Debug, Default)]
struct Library {
    users: BTreeMap<i64, User>,
    songs: BTreeMap<i64, Song>,
    tags: BTreeMap<i64, Tag>,
    /// `(song_id, tag_id)` pairs
    song_tags: BTreeSet<(i64, i64)>,
    last_user_id: i64,
    last_song_id: i64,
    last_tag_id: i64,
}

impl Library {
    fn owned_tag(&self, owner: i64, id: i64) -> Option<&Tag> {
        self.tags.get(&id).filter(|t| t.user_id == owner)
    }

    /// Tags on a song in the owner's tag order
    fn tags_of(&self, song_id: i64) -> Vec<&Tag> {
        let mut tags: Vec<&Tag> = self
            .song_tags
            .range((song_id, i64::MIN)..=(song_id, i64::MAX))
            .filter_map(|(_, tag_id)| self.tags.get(tag_id))
            .collect();
        tags.sort_by_key(|t| (t.order_index, t.id));
        tags
    }

    fn tagged(&self, song: &Song) -> TaggedSong {
        let names = self
            .tags_of(song.id)
            .into_iter()
            .map(|t| t.name.clone())
            .collect();
        TaggedSong::new(song.clone(), names)
    }

    fn carries_all(&self, song_id: i64, folded_names: &[String]) -> bool {
        let carried: Vec<String> = self
            .tags_of(song_id)
            .into_iter()
            .map(|t| fold_case(&t.name))
            .collect();
        folded_names.iter().all(|name| carried.contains(name))
    }
}

/// In-memory entity store
#[derive(Debug, Default)]
pub struct MemoryStore {
    library: RwLock<Library>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn find_or_create_user(&self, profile: &NewUser) -> LibraryResult<User> {
        let mut lib = self.library.write();

        if let Some(user) = lib
            .users
            .values()
            .find(|u| u.provider_id == profile.provider_id)
        {
            return Ok(user.clone());
        }

        lib.last_user_id += 1;
        let user = User {
            id: lib.last_user_id,
            provider_id: profile.provider_id.clone(),
            email: profile.email_or_default(),
            display_name: profile.display_name_or_default(),
            created_at: chrono::Utc::now().timestamp(),
        };
        lib.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn get_user(&self, id: i64) -> LibraryResult<Option<User>> {
        Ok(self.library.read().users.get(&id).cloned())
    }

    async fn insert_song_if_absent(&self, owner: i64, song: &NewSong) -> LibraryResult<bool> {
        let mut lib = self.library.write();

        let exists = lib
            .songs
            .values()
            .any(|s| s.user_id == owner && s.external_id == song.external_id);
        if exists {
            return Ok(false);
        }

        lib.last_song_id += 1;
        let id = lib.last_song_id;
        lib.songs.insert(
            id,
            Song {
                id,
                external_id: song.external_id.clone(),
                title: song.title.clone(),
                artist: song.artist.clone(),
                album: song.album.clone(),
                artwork_url: song.artwork_url.clone(),
                user_id: owner,
                created_at: chrono::Utc::now().timestamp(),
            },
        );

        Ok(true)
    }

    async fn get_song(&self, owner: i64, id: i64) -> LibraryResult<Option<Song>> {
        Ok(self
            .library
            .read()
            .songs
            .get(&id)
            .filter(|s| s.user_id == owner)
            .cloned())
    }

    async fn songs(&self, owner: i64) -> LibraryResult<Vec<Song>> {
        Ok(self
            .library
            .read()
            .songs
            .values()
            .filter(|s| s.user_id == owner)
            .cloned()
            .collect())
    }

    async fn query_songs(&self, owner: i64, query: &SongQuery) -> LibraryResult<Vec<TaggedSong>> {
        let lib = self.library.read();

        let mut matched: Vec<&Song> = lib
            .songs
            .values()
            .filter(|s| s.user_id == owner)
            .filter(|s| query.search.as_deref().map_or(true, |q| s.matches_search(q)))
            .filter(|s| query.tags.is_empty() || lib.carries_all(s.id, &query.tags))
            .collect();
        matched.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));

        let offset = usize::try_from(query.offset).unwrap_or(0);
        let limit = usize::try_from(query.limit).unwrap_or(0);

        Ok(matched
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|s| lib.tagged(s))
            .collect())
    }

    async fn songs_by_category(
        &self,
        owner: i64,
        filter: &CategoryFilter,
    ) -> LibraryResult<Vec<TaggedSong>> {
        let lib = self.library.read();

        Ok(lib
            .songs
            .values()
            .filter(|s| s.user_id == owner && filter.matches(s))
            .map(|s| lib.tagged(s))
            .collect())
    }

    async fn insert_tag(&self, owner: i64, tag: &NewTag) -> LibraryResult<Tag> {
        let mut lib = self.library.write();

        let folded = fold_case(&tag.name);
        let owned = lib.tags.values().filter(|t| t.user_id == owner);
        let mut next_index = 0;
        for existing in owned {
            if fold_case(&existing.name) == folded {
                return Err(LibraryError::conflict("Tag name already exists"));
            }
            next_index = next_index.max(existing.order_index + 1);
        }

        lib.last_tag_id += 1;
        let created = Tag {
            id: lib.last_tag_id,
            name: tag.name.clone(),
            color: tag.color.clone(),
            user_id: owner,
            order_index: next_index,
            is_visible: true,
            created_at: chrono::Utc::now().timestamp(),
        };
        lib.tags.insert(created.id, created.clone());

        Ok(created)
    }

    async fn get_tag(&self, owner: i64, id: i64) -> LibraryResult<Option<Tag>> {
        Ok(self.library.read().owned_tag(owner, id).cloned())
    }

    async fn find_tag_by_name(&self, owner: i64, name: &str) -> LibraryResult<Option<Tag>> {
        let folded = fold_case(name);
        Ok(self
            .library
            .read()
            .tags
            .values()
            .find(|t| t.user_id == owner && fold_case(&t.name) == folded)
            .cloned())
    }

    async fn tags_with_counts(&self, owner: i64) -> LibraryResult<Vec<TagWithCount>> {
        let lib = self.library.read();

        let mut tags: Vec<TagWithCount> = lib
            .tags
            .values()
            .filter(|t| t.user_id == owner)
            .map(|t| TagWithCount {
                tag: t.clone(),
                song_count: lib.song_tags.iter().filter(|(_, tag_id)| *tag_id == t.id).count()
                    as i64,
            })
            .collect();
        tags.sort_by_key(|t| (t.tag.order_index, t.tag.id));

        Ok(tags)
    }

    async fn insert_song_tag_if_absent(&self, song_id: i64, tag_id: i64) -> LibraryResult<bool> {
        let mut lib = self.library.write();

        // mirrors the foreign keys on song_tags
        if !lib.songs.contains_key(&song_id) || !lib.tags.contains_key(&tag_id) {
            return Err(LibraryError::Internal(
                "song_tags references a missing song or tag".to_string(),
            ));
        }

        Ok(lib.song_tags.insert((song_id, tag_id)))
    }

    async fn delete_song_tag(&self, song_id: i64, tag_id: i64) -> LibraryResult<bool> {
        Ok(self.library.write().song_tags.remove(&(song_id, tag_id)))
    }

    async fn set_tag_order(&self, owner: i64, tag_ids: &[i64]) -> LibraryResult<()> {
        let mut lib = self.library.write();

        for (position, id) in tag_ids.iter().enumerate() {
            if let Some(tag) = lib.tags.get_mut(id).filter(|t| t.user_id == owner) {
                tag.order_index = position as i64;
            }
        }

        Ok(())
    }

    async fn set_tag_visibility(
        &self,
        owner: i64,
        tag_id: i64,
        visible: bool,
    ) -> LibraryResult<bool> {
        let mut lib = self.library.write();

        match lib.tags.get_mut(&tag_id).filter(|t| t.user_id == owner) {
            Some(tag) => {
                tag.is_visible = visible;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
