//! Tag lifecycle: creation, assignment, ordering and visibility

use std::collections::HashSet;

use tracing::{debug, info};

use crate::core::errors::{LibraryError, LibraryResult};
use crate::models::{NewTag, Tag, TagWithCount, DEFAULT_TAG_COLOR};
use crate::stores::EntityStore;
use crate::utils::parsers::non_blank;

/// Tag library functions
pub struct TagLib;

impl TagLib {
    /// All of the owner's tags with song counts, in display order
    pub async fn list(store: &dyn EntityStore, owner: i64) -> LibraryResult<Vec<TagWithCount>> {
        store.tags_with_counts(owner).await
    }

    /// Create a tag at the end of the owner's list
    pub async fn create(
        store: &dyn EntityStore,
        owner: i64,
        name: &str,
        color: Option<&str>,
    ) -> LibraryResult<Tag> {
        let name = non_blank(Some(name)).ok_or_else(|| LibraryError::invalid("Tag name required"))?;
        let color = non_blank(color).unwrap_or(DEFAULT_TAG_COLOR);

        let tag = store
            .insert_tag(
                owner,
                &NewTag {
                    name: name.to_string(),
                    color: color.to_string(),
                },
            )
            .await?;

        info!("Created tag '{}' ({}) for user {}", tag.name, tag.id, owner);
        Ok(tag)
    }

    /// Attach a tag to a song. Assigning twice is a no-op.
    pub async fn assign(
        store: &dyn EntityStore,
        owner: i64,
        song_id: i64,
        tag_id: i64,
    ) -> LibraryResult<()> {
        Self::check_ownership(store, owner, song_id, tag_id).await?;

        if !store.insert_song_tag_if_absent(song_id, tag_id).await? {
            debug!("Tag {} already on song {}", tag_id, song_id);
        }
        Ok(())
    }

    /// Detach a tag from a song. Removing a pair that does not exist is a
    /// no-op, but both entities must still belong to the owner.
    pub async fn remove(
        store: &dyn EntityStore,
        owner: i64,
        song_id: i64,
        tag_id: i64,
    ) -> LibraryResult<()> {
        Self::check_ownership(store, owner, song_id, tag_id).await?;

        if !store.delete_song_tag(song_id, tag_id).await? {
            debug!("Tag {} was not on song {}", tag_id, song_id);
        }
        Ok(())
    }

    /// Give each listed tag its position as order index. Ids the owner does
    /// not have are ignored.
    pub async fn reorder(store: &dyn EntityStore, owner: i64, tag_ids: &[i64]) -> LibraryResult<()> {
        let mut seen = HashSet::with_capacity(tag_ids.len());
        if let Some(dup) = tag_ids.iter().find(|id| !seen.insert(**id)) {
            return Err(LibraryError::invalid(format!(
                "Tag {} appears more than once",
                dup
            )));
        }

        store.set_tag_order(owner, tag_ids).await
    }

    pub async fn set_visibility(
        store: &dyn EntityStore,
        owner: i64,
        tag_id: i64,
        visible: bool,
    ) -> LibraryResult<()> {
        if store.set_tag_visibility(owner, tag_id, visible).await? {
            Ok(())
        } else {
            Err(LibraryError::not_found("Tag not found"))
        }
    }

    async fn check_ownership(
        store: &dyn EntityStore,
        owner: i64,
        song_id: i64,
        tag_id: i64,
    ) -> LibraryResult<()> {
        if store.get_song(owner, song_id).await?.is_none() {
            return Err(LibraryError::not_found("Song not found"));
        }
        if store.get_tag(owner, tag_id).await?.is_none() {
            return Err(LibraryError::not_found("Tag not found"));
        }
        Ok(())
    }
}
