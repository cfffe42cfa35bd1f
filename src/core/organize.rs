//! Aggregator: album and artist summaries built from a user's songs

use std::collections::HashMap;
use std::str::FromStr;

use serde::Serialize;

use crate::core::errors::{LibraryError, LibraryResult};
use crate::core::sorting::SortLib;
use crate::models::{Album, Artist, TaggedSong};
use crate::stores::{CategoryFilter, EntityStore};
use crate::utils::parsers::non_blank;

/// How to group a library for browsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganizeKind {
    Albums,
    Artists,
}

impl FromStr for OrganizeKind {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "albums" => Ok(OrganizeKind::Albums),
            "artists" => Ok(OrganizeKind::Artists),
            _ => Err(LibraryError::invalid(
                "Invalid organization type. Use \"albums\" or \"artists\"",
            )),
        }
    }
}

/// Category of a drill-down listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    Album,
    Artist,
}

impl FromStr for CategoryKind {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "album" => Ok(CategoryKind::Album),
            "artist" => Ok(CategoryKind::Artist),
            _ => Err(LibraryError::invalid(
                "Invalid type. Use \"album\" or \"artist\"",
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Organized {
    Albums(Vec<Album>),
    Artists(Vec<Artist>),
}

/// Organize library functions
pub struct OrganizeLib;

impl OrganizeLib {
    pub async fn organize(
        store: &dyn EntityStore,
        owner: i64,
        kind: OrganizeKind,
    ) -> LibraryResult<Organized> {
        let songs = store.songs(owner).await?;

        let organized = match kind {
            OrganizeKind::Albums => {
                let mut index: HashMap<(String, String), usize> = HashMap::new();
                let mut albums: Vec<Album> = Vec::new();

                for song in songs.iter().filter(|s| non_blank(Some(&s.album)).is_some()) {
                    let key = (song.album.clone(), song.artist.clone());
                    let slot = *index.entry(key).or_insert_with(|| {
                        albums.push(Album::new(song.album.clone(), song.artist.clone()));
                        albums.len() - 1
                    });
                    albums[slot].add_song(song.artwork_url.as_deref());
                }

                SortLib::sort_albums(&mut albums);
                Organized::Albums(albums)
            }
            OrganizeKind::Artists => {
                let mut index: HashMap<String, usize> = HashMap::new();
                let mut artists: Vec<Artist> = Vec::new();

                for song in songs.iter().filter(|s| non_blank(Some(&s.artist)).is_some()) {
                    let slot = *index.entry(song.artist.clone()).or_insert_with(|| {
                        artists.push(Artist::new(song.artist.clone()));
                        artists.len() - 1
                    });
                    artists[slot].add_song(song.artwork_url.as_deref());
                }

                SortLib::sort_artists(&mut artists);
                Organized::Artists(artists)
            }
        };

        Ok(organized)
    }

    /// Songs of one artist or album, with their tag names.
    ///
    /// `artist` narrows an album listing to a single artist and is ignored
    /// for artist listings.
    pub async fn by_category(
        store: &dyn EntityStore,
        owner: i64,
        kind: CategoryKind,
        name: &str,
        artist: Option<&str>,
    ) -> LibraryResult<Vec<TaggedSong>> {
        let filter = match kind {
            CategoryKind::Artist => CategoryFilter::Artist(name.to_string()),
            CategoryKind::Album => CategoryFilter::Album {
                name: name.to_string(),
                artist: non_blank(artist).map(str::to_string),
            },
        };

        let mut songs = store.songs_by_category(owner, &filter).await?;
        match kind {
            CategoryKind::Artist => SortLib::sort_songs_artist_order(&mut songs),
            CategoryKind::Album => SortLib::sort_songs_album_order(&mut songs),
        }

        Ok(songs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewSong;
    use crate::stores::MemoryStore;

    async fn add(store: &MemoryStore, id: &str, title: &str, artist: &str, album: &str, art: Option<&str>) {
        let song = NewSong {
            external_id: id.into(),
            title: title.into(),
            artist: artist.into(),
            album: album.into(),
            artwork_url: art.map(str::to_string),
        };
        store.insert_song_if_absent(1, &song).await.unwrap();
    }

    async fn sample() -> MemoryStore {
        let store = MemoryStore::new();
        add(&store, "1", "Intro", "Alpha", "Hits", Some("a.jpg")).await;
        add(&store, "2", "Outro", "Alpha", "Hits", Some("b.jpg")).await;
        add(&store, "3", "Middle", "Alpha", "Hits", Some("a.jpg")).await;
        add(&store, "4", "Song", "Beta", "Hits", None).await;
        add(&store, "5", "Other", "Beta", "Échos", Some("")).await;
        add(&store, "6", "Loose", "Beta", "  ", None).await;
        store
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("albums".parse::<OrganizeKind>().unwrap(), OrganizeKind::Albums);
        assert_eq!("artist".parse::<CategoryKind>().unwrap(), CategoryKind::Artist);
        assert!(matches!(
            "genres".parse::<OrganizeKind>(),
            Err(LibraryError::InvalidArgument(_))
        ));
        assert!(matches!(
            "Albums".parse::<OrganizeKind>(),
            Err(LibraryError::InvalidArgument(_))
        ));
        assert!("song".parse::<CategoryKind>().is_err());
    }

    #[tokio::test]
    async fn test_albums_split_by_artist() {
        let store = sample().await;
        let Organized::Albums(albums) = OrganizeLib::organize(&store, 1, OrganizeKind::Albums)
            .await
            .unwrap()
        else {
            panic!("expected albums");
        };

        let summary: Vec<(&str, &str, i64)> = albums
            .iter()
            .map(|a| (a.name.as_str(), a.artist.as_str(), a.song_count))
            .collect();
        // blank album names are left out; "Échos" collates as "echos"
        assert_eq!(
            summary,
            vec![("Échos", "Beta", 1), ("Hits", "Alpha", 3), ("Hits", "Beta", 1)]
        );
        assert_eq!(albums[1].artwork_urls, vec!["a.jpg", "b.jpg"]);
        assert!(albums[0].artwork_urls.is_empty());
    }

    #[tokio::test]
    async fn test_artists() {
        let store = sample().await;
        let Organized::Artists(artists) = OrganizeLib::organize(&store, 1, OrganizeKind::Artists)
            .await
            .unwrap()
        else {
            panic!("expected artists");
        };

        assert_eq!(artists.len(), 2);
        assert_eq!(artists[0].name, "Alpha");
        assert_eq!(artists[0].song_count, 3);
        assert_eq!(artists[1].name, "Beta");
        assert_eq!(artists[1].song_count, 3);
    }

    #[tokio::test]
    async fn test_empty_library() {
        let store = MemoryStore::new();
        let organized = OrganizeLib::organize(&store, 1, OrganizeKind::Albums)
            .await
            .unwrap();
        assert_eq!(organized, Organized::Albums(Vec::new()));
    }

    #[tokio::test]
    async fn test_by_category_ordering() {
        let store = sample().await;

        let songs = OrganizeLib::by_category(&store, 1, CategoryKind::Artist, "Beta", None)
            .await
            .unwrap();
        let titles: Vec<&str> = songs.iter().map(|s| s.song.title.as_str()).collect();
        // ordered by album, then title
        assert_eq!(titles, vec!["Loose", "Song", "Other"]);

        let songs = OrganizeLib::by_category(&store, 1, CategoryKind::Album, "Hits", Some("Alpha"))
            .await
            .unwrap();
        let titles: Vec<&str> = songs.iter().map(|s| s.song.title.as_str()).collect();
        assert_eq!(titles, vec!["Intro", "Middle", "Outro"]);

        let songs = OrganizeLib::by_category(&store, 1, CategoryKind::Album, "Hits", None)
            .await
            .unwrap();
        assert_eq!(songs.len(), 4);
    }

    #[tokio::test]
    async fn test_by_category_is_owner_scoped() {
        let store = sample().await;
        let songs = OrganizeLib::by_category(&store, 2, CategoryKind::Artist, "Alpha", None)
            .await
            .unwrap();
        assert!(songs.is_empty());
    }
}
