//! Demo library used when the server runs on the in-memory store

use std::collections::HashMap;

use tracing::info;

use super::EntityStore;
use crate::core::errors::{LibraryError, LibraryResult};
use crate::models::{NewSong, NewTag, NewUser, User};

const DEMO_PROVIDER_ID: &str = "demo_user_123";

/// external id, title, artist, album, artwork
const SONGS: &[(&str, &str, &str, &str, &str)] = &[
    ("song_1", "Blinding Lights", "The Weeknd", "After Hours", "https://i.scdn.co/image/ab67616d0000b273ef6f049cce6544d3f0c5c3c7"),
    ("song_2", "Shape of You", "Ed Sheeran", "÷ (Divide)", "https://i.scdn.co/image/ab67616d0000b273ba5db46f4b838ef6027e6f96"),
    ("song_3", "Watermelon Sugar", "Harry Styles", "Fine Line", "https://i.scdn.co/image/ab67616d0000b273277b3ff8e3114a8b3c1c5ac1"),
    ("song_4", "Good 4 U", "Olivia Rodrigo", "SOUR", "https://i.scdn.co/image/ab67616d0000b273a91c10fe9472d9bd89802e5a"),
    ("song_5", "Levitating", "Dua Lipa", "Future Nostalgia", "https://i.scdn.co/image/ab67616d0000b273ef5c39b3b0b84b4b8b8b8b8b"),
    ("song_6", "drivers license", "Olivia Rodrigo", "SOUR", "https://i.scdn.co/image/ab67616d0000b273a91c10fe9472d9bd89802e5a"),
    ("song_7", "Stay", "The Kid LAROI & Justin Bieber", "F*CK LOVE 3: OVER YOU", "https://i.scdn.co/image/ab67616d0000b273e2e352d89826aef6dbd5ff8f"),
    ("song_8", "Industry Baby", "Lil Nas X & Jack Harlow", "MONTERO", "https://i.scdn.co/image/ab67616d0000b273be82673b5f79d9658ec0a9fd"),
    ("song_9", "Heat Waves", "Glass Animals", "Dreamland", "https://i.scdn.co/image/ab67616d0000b2739e495fb707973f3390850eea"),
    ("song_10", "As It Was", "Harry Styles", "Harry's House", "https://i.scdn.co/image/ab67616d0000b273be82673b5f79d9658ec0a9fd"),
];

const TAGS: &[(&str, &str)] = &[
    ("Pop", "#FF6B6B"),
    ("Favorites", "#4ECDC4"),
    ("Workout", "#45B7D1"),
    ("Chill", "#96CEB4"),
    ("Road Trip", "#FECA57"),
];

/// song external id, tag name
const ASSIGNMENTS: &[(&str, &str)] = &[
    ("song_1", "Pop"),
    ("song_1", "Favorites"),
    ("song_2", "Pop"),
    ("song_2", "Workout"),
    ("song_3", "Pop"),
    ("song_3", "Chill"),
    ("song_4", "Pop"),
    ("song_4", "Favorites"),
    ("song_5", "Pop"),
    ("song_5", "Workout"),
    ("song_5", "Road Trip"),
    ("song_7", "Favorites"),
    ("song_8", "Workout"),
    ("song_9", "Chill"),
    ("song_10", "Favorites"),
    ("song_10", "Chill"),
];

/// Seed the demo user's library. Safe to call on a store that was already
/// seeded: songs and assignments are skipped and existing tags reused.
pub async fn seed_demo_library(store: &dyn EntityStore) -> LibraryResult<User> {
    let user = store
        .find_or_create_user(&NewUser {
            provider_id: DEMO_PROVIDER_ID.to_string(),
            email: Some("demo@example.com".to_string()),
            display_name: Some("Demo User".to_string()),
        })
        .await?;

    for (external_id, title, artist, album, artwork) in SONGS {
        let song = NewSong {
            external_id: external_id.to_string(),
            title: title.to_string(),
            artist: artist.to_string(),
            album: album.to_string(),
            artwork_url: Some(artwork.to_string()),
        };
        store.insert_song_if_absent(user.id, &song).await?;
    }

    let song_ids: HashMap<String, i64> = store
        .songs(user.id)
        .await?
        .into_iter()
        .map(|s| (s.external_id, s.id))
        .collect();

    let mut tag_ids: HashMap<&str, i64> = HashMap::new();
    for (name, color) in TAGS {
        let tag = match store.find_tag_by_name(user.id, name).await? {
            Some(tag) => tag,
            None => {
                let new_tag = NewTag {
                    name: name.to_string(),
                    color: color.to_string(),
                };
                store.insert_tag(user.id, &new_tag).await?
            }
        };
        tag_ids.insert(*name, tag.id);
    }

    for (external_id, tag_name) in ASSIGNMENTS {
        let song_id = song_ids.get(*external_id).copied();
        let tag_id = tag_ids.get(*tag_name).copied();
        let (Some(song_id), Some(tag_id)) = (song_id, tag_id) else {
            return Err(LibraryError::Internal(format!(
                "Demo assignment {} -> {} has no target",
                external_id, tag_name
            )));
        };
        store.insert_song_tag_if_absent(song_id, tag_id).await?;
    }

    info!(
        "Seeded demo library for user {} ({} songs, {} tags) on {} store",
        user.id,
        SONGS.len(),
        TAGS.len(),
        store.backend_name()
    );

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::MemoryStore;

    #[tokio::test]
    async fn test_seed_is_repeatable() {
        let store = MemoryStore::new();
        let first = seed_demo_library(&store).await.unwrap();
        let second = seed_demo_library(&store).await.unwrap();
        assert_eq!(first.id, second.id);

        assert_eq!(store.songs(first.id).await.unwrap().len(), 10);

        let tags = store.tags_with_counts(first.id).await.unwrap();
        let counts: Vec<(&str, i64)> = tags
            .iter()
            .map(|t| (t.tag.name.as_str(), t.song_count))
            .collect();
        assert_eq!(
            counts,
            vec![
                ("Pop", 5),
                ("Favorites", 4),
                ("Workout", 3),
                ("Chill", 3),
                ("Road Trip", 1)
            ]
        );
    }
}
