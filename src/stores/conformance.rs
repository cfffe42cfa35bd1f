//! Behaviour shared by every entity store, checked against each backend

use serde_json::json;

use super::{seed_demo_library, EntityStore, MemoryStore, SqliteStore};
use crate::core::errors::LibraryError;
use crate::core::organize::Organized;
use crate::core::{
    CategoryKind, ImportLib, ListSongs, OrganizeKind, OrganizeLib, QueryLib, TagLib,
};
use crate::models::{ExternalSongRecord, NewUser, User};

async fn backends() -> Vec<Box<dyn EntityStore>> {
    let sqlite = SqliteStore::connect("sqlite::memory:").await.unwrap();
    vec![Box::new(MemoryStore::new()), Box::new(sqlite)]
}

async fn user(store: &dyn EntityStore, provider_id: &str) -> User {
    store
        .find_or_create_user(&NewUser::new(provider_id))
        .await
        .unwrap()
}

fn records(value: serde_json::Value) -> Vec<ExternalSongRecord> {
    serde_json::from_value(value).unwrap()
}

async fn list(store: &dyn EntityStore, owner: i64, params: ListSongs) -> Vec<(String, Vec<String>)> {
    QueryLib::list_songs(store, owner, &params, 500)
        .await
        .unwrap()
        .songs
        .into_iter()
        .map(|s| (s.song.title, s.tags))
        .collect()
}

fn tagged(tags: &str) -> ListSongs {
    ListSongs {
        tags: tags.split(',').map(str::to_string).collect(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_users_are_found_by_provider_id() {
    for store in backends().await {
        let store = store.as_ref();
        let first = user(store, "apple-1").await;
        let again = store
            .find_or_create_user(&NewUser {
                provider_id: "apple-1".into(),
                email: Some("changed@example.com".into()),
                display_name: None,
            })
            .await
            .unwrap();

        assert_eq!(first.id, again.id, "{}", store.backend_name());
        assert_eq!(again.email, "", "{}", store.backend_name());
        assert_eq!(again.display_name, "User");
        assert_eq!(store.get_user(first.id).await.unwrap(), Some(first));
        assert_eq!(store.get_user(999).await.unwrap(), None);
    }
}

#[tokio::test]
async fn test_import_is_idempotent() {
    for store in backends().await {
        let store = store.as_ref();
        let owner = user(store, "u").await.id;
        let batch = records(json!([
            {"id": "x1", "attributes": {"name": "Song A", "artistName": "Artist 1"}},
            {"id": 42, "title": "Song B"}
        ]));

        ImportLib::import(store, owner, &batch).await.unwrap();
        let before = store.songs(owner).await.unwrap();
        let second = ImportLib::import(store, owner, &batch).await.unwrap();
        let after = store.songs(owner).await.unwrap();

        assert_eq!(second.inserted, 0, "{}", store.backend_name());
        assert_eq!(before, after, "{}", store.backend_name());
        assert_eq!(after[1].external_id, "42");
        assert_eq!(after[1].album, "Unknown Album");
    }
}

#[tokio::test]
async fn test_same_external_id_for_two_users() {
    for store in backends().await {
        let store = store.as_ref();
        let a = user(store, "a").await.id;
        let b = user(store, "b").await.id;
        let batch = records(json!([{"id": "shared", "title": "Song"}]));

        ImportLib::import(store, a, &batch).await.unwrap();
        let summary = ImportLib::import(store, b, &batch).await.unwrap();

        assert_eq!(summary.inserted, 1, "{}", store.backend_name());
        assert_eq!(store.songs(a).await.unwrap().len(), 1);
        assert_eq!(store.songs(b).await.unwrap().len(), 1);
    }
}

#[tokio::test]
async fn test_tag_names_unique_per_owner_ignoring_case() {
    for store in backends().await {
        let store = store.as_ref();
        let a = user(store, "a").await.id;
        let b = user(store, "b").await.id;

        TagLib::create(store, a, "Chill", None).await.unwrap();
        let err = TagLib::create(store, a, "CHILL", None).await.unwrap_err();
        assert!(
            matches!(err, LibraryError::Conflict(ref msg) if msg == "Tag name already exists"),
            "{}: {:?}",
            store.backend_name(),
            err
        );
        assert_eq!(TagLib::list(store, a).await.unwrap().len(), 1);

        TagLib::create(store, b, "chill", None).await.unwrap();
        assert_eq!(
            store.find_tag_by_name(a, "cHiLl").await.unwrap().map(|t| t.name),
            Some("Chill".to_string())
        );
    }
}

#[tokio::test]
async fn test_tag_filter_is_and() {
    for store in backends().await {
        let store = store.as_ref();
        let demo = seed_demo_library(store).await.unwrap();

        let titles: Vec<String> = list(store, demo.id, tagged("Pop,Favorites"))
            .await
            .into_iter()
            .map(|(title, _)| title)
            .collect();
        assert_eq!(titles, vec!["Blinding Lights", "Good 4 U"], "{}", store.backend_name());

        let folded = list(store, demo.id, tagged("pop,FAVORITES")).await;
        assert_eq!(folded.len(), 2, "{}", store.backend_name());

        assert!(list(store, demo.id, tagged("Pop,Nope")).await.is_empty());

        let three = list(store, demo.id, tagged("Pop,Workout,Road Trip")).await;
        assert_eq!(
            three,
            vec![(
                "Levitating".to_string(),
                vec!["Pop".to_string(), "Workout".to_string(), "Road Trip".to_string()]
            )]
        );
    }
}

#[tokio::test]
async fn test_search_matches_title_or_artist() {
    for store in backends().await {
        let store = store.as_ref();
        let demo = seed_demo_library(store).await.unwrap();

        let by_artist = list(
            store,
            demo.id,
            ListSongs {
                search: Some("HARRY".into()),
                ..Default::default()
            },
        )
        .await;
        let titles: Vec<&str> = by_artist.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(titles, vec!["As It Was", "Watermelon Sugar"], "{}", store.backend_name());

        let combined = list(
            store,
            demo.id,
            ListSongs {
                search: Some("sugar".into()),
                tags: vec!["Chill".into()],
                ..Default::default()
            },
        )
        .await;
        assert_eq!(combined.len(), 1);
    }
}

#[tokio::test]
async fn test_assign_is_idempotent_and_counted() {
    for store in backends().await {
        let store = store.as_ref();
        let owner = user(store, "u").await.id;
        ImportLib::import(store, owner, &records(json!([{"id": "1", "title": "T"}])))
            .await
            .unwrap();
        let song_id = store.songs(owner).await.unwrap()[0].id;
        let tag = TagLib::create(store, owner, "Fav", None).await.unwrap();

        TagLib::assign(store, owner, song_id, tag.id).await.unwrap();
        TagLib::assign(store, owner, song_id, tag.id).await.unwrap();

        let tags = TagLib::list(store, owner).await.unwrap();
        assert_eq!(tags[0].song_count, 1, "{}", store.backend_name());

        TagLib::remove(store, owner, song_id, tag.id).await.unwrap();
        TagLib::remove(store, owner, song_id, tag.id).await.unwrap();
        assert_eq!(TagLib::list(store, owner).await.unwrap()[0].song_count, 0);
    }
}

#[tokio::test]
async fn test_ownership_isolation() {
    for store in backends().await {
        let store = store.as_ref();
        let demo = seed_demo_library(store).await.unwrap();
        let other = user(store, "intruder").await.id;

        let page = QueryLib::list_songs(store, other, &ListSongs::default(), 500)
            .await
            .unwrap();
        assert!(page.songs.is_empty(), "{}", store.backend_name());
        assert!(TagLib::list(store, other).await.unwrap().is_empty());

        let song_id = store.songs(demo.id).await.unwrap()[0].id;
        let demo_tag = TagLib::list(store, demo.id).await.unwrap()[0].tag.id;
        let own_tag = TagLib::create(store, other, "Mine", None).await.unwrap();

        for result in [
            TagLib::assign(store, other, song_id, own_tag.id).await,
            TagLib::assign(store, other, song_id, demo_tag).await,
            TagLib::remove(store, other, song_id, demo_tag).await,
            TagLib::set_visibility(store, other, demo_tag, false).await,
        ] {
            assert!(
                matches!(result, Err(LibraryError::NotFound(_))),
                "{}",
                store.backend_name()
            );
        }

        let organized = OrganizeLib::organize(store, other, OrganizeKind::Artists)
            .await
            .unwrap();
        assert_eq!(organized, Organized::Artists(Vec::new()));
    }
}

#[tokio::test]
async fn test_pages_partition_the_listing() {
    for store in backends().await {
        let store = store.as_ref();
        let demo = seed_demo_library(store).await.unwrap();

        let everything = list(
            store,
            demo.id,
            ListSongs {
                page_size: 100,
                ..Default::default()
            },
        )
        .await;
        assert_eq!(everything.len(), 10);

        let mut paged = Vec::new();
        for page in 1..=4 {
            let result = QueryLib::list_songs(
                store,
                demo.id,
                &ListSongs {
                    page,
                    page_size: 3,
                    ..Default::default()
                },
                500,
            )
            .await
            .unwrap();
            assert_eq!(result.pagination.has_more, page < 4, "{}", store.backend_name());
            paged.extend(result.songs.into_iter().map(|s| (s.song.title, s.tags)));
        }

        assert_eq!(paged, everything, "{}", store.backend_name());
        // byte order puts lowercase titles last
        assert_eq!(everything[0].0, "As It Was");
        assert_eq!(everything[9].0, "drivers license");
    }
}

#[tokio::test]
async fn test_reorder_is_visible_immediately() {
    for store in backends().await {
        let store = store.as_ref();
        let demo = seed_demo_library(store).await.unwrap();

        let mut ids: Vec<i64> = TagLib::list(store, demo.id)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.tag.id)
            .collect();
        ids.reverse();
        TagLib::reorder(store, demo.id, &ids).await.unwrap();

        let names: Vec<String> = TagLib::list(store, demo.id)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.tag.name)
            .collect();
        assert_eq!(
            names,
            vec!["Road Trip", "Chill", "Workout", "Favorites", "Pop"],
            "{}",
            store.backend_name()
        );

        // tag names on a song follow the new order
        let levitating = list(store, demo.id, tagged("Road Trip")).await;
        assert_eq!(
            levitating[0].1,
            vec!["Road Trip".to_string(), "Workout".to_string(), "Pop".to_string()]
        );
    }
}

#[tokio::test]
async fn test_created_tags_append_to_order() {
    for store in backends().await {
        let store = store.as_ref();
        let owner = user(store, "u").await.id;

        let a = TagLib::create(store, owner, "A", None).await.unwrap();
        let b = TagLib::create(store, owner, "B", Some("#000000")).await.unwrap();
        TagLib::reorder(store, owner, &[b.id, a.id]).await.unwrap();
        let c = TagLib::create(store, owner, "C", None).await.unwrap();

        assert_eq!((a.order_index, b.order_index), (0, 1), "{}", store.backend_name());
        assert_eq!(c.order_index, 2, "{}", store.backend_name());
        assert_eq!(b.color, "#000000");
        assert_eq!(a.color, "#3B82F6");
        assert!(c.is_visible);

        TagLib::set_visibility(store, owner, c.id, false).await.unwrap();
        let listed = TagLib::list(store, owner).await.unwrap();
        assert!(!listed[2].tag.is_visible, "{}", store.backend_name());
    }
}

#[tokio::test]
async fn test_organize_matches_across_backends() {
    let mut results = Vec::new();
    for store in backends().await {
        let store = store.as_ref();
        let demo = seed_demo_library(store).await.unwrap();

        let albums = OrganizeLib::organize(store, demo.id, OrganizeKind::Albums)
            .await
            .unwrap();
        let artists = OrganizeLib::organize(store, demo.id, OrganizeKind::Artists)
            .await
            .unwrap();
        let sour = OrganizeLib::by_category(store, demo.id, CategoryKind::Album, "SOUR", None)
            .await
            .unwrap();
        results.push((albums, artists, sour.len()));
    }

    let (albums, artists, sour) = &results[0];
    assert_eq!(results[0], results[1]);
    assert_eq!(*sour, 2);

    let Organized::Albums(albums) = albums else {
        panic!("expected albums");
    };
    assert_eq!(albums.len(), 9);
    let sour = albums.iter().find(|a| a.name == "SOUR").unwrap();
    assert_eq!(sour.song_count, 2);
    assert_eq!(sour.artwork_urls.len(), 1);

    let Organized::Artists(artists) = artists else {
        panic!("expected artists");
    };
    assert_eq!(artists.len(), 8);
    let harry = artists.iter().find(|a| a.name == "Harry Styles").unwrap();
    assert_eq!(harry.song_count, 2);
    assert_eq!(harry.artwork_urls.len(), 2);
}

#[tokio::test]
async fn test_end_to_end() {
    for store in backends().await {
        let store = store.as_ref();
        let owner = user(store, "apple-user").await.id;

        let batch = records(json!([
            {"id": "x1", "attributes": {"name": "Song A", "artistName": "Artist 1"}}
        ]));
        ImportLib::import(store, owner, &batch).await.unwrap();

        let page = QueryLib::list_songs(store, owner, &ListSongs::default(), 500)
            .await
            .unwrap();
        assert_eq!(page.songs.len(), 1, "{}", store.backend_name());
        assert_eq!(page.songs[0].song.title, "Song A");
        assert_eq!(page.songs[0].song.artist, "Artist 1");
        assert!(page.songs[0].tags.is_empty());
        let song_id = page.songs[0].song.id;

        let tag = TagLib::create(store, owner, "Fav", None).await.unwrap();
        TagLib::assign(store, owner, song_id, tag.id).await.unwrap();

        let page = QueryLib::list_songs(store, owner, &ListSongs::default(), 500)
            .await
            .unwrap();
        assert_eq!(page.songs[0].tags, vec!["Fav".to_string()], "{}", store.backend_name());

        let tags = TagLib::list(store, owner).await.unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].tag.name, "Fav");
        assert_eq!(tags[0].song_count, 1);
    }
}
