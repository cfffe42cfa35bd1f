//! Sorting utilities for songs, albums and artists

use std::cmp::Ordering;

use deunicode::deunicode;

use crate::models::{Album, Artist, TaggedSong};

/// Sorting library
pub struct SortLib;

impl SortLib {
    /// Key for human-facing name order: transliterated to ASCII and folded,
    /// so "Émile" sorts next to "emile" rather than after "zed".
    pub fn collation_key(name: &str) -> String {
        deunicode(name).to_lowercase()
    }

    /// Compare names by collation key, then by raw text so that the order is
    /// total
    pub fn compare_names(a: &str, b: &str) -> Ordering {
        Self::collation_key(a)
            .cmp(&Self::collation_key(b))
            .then_with(|| a.cmp(b))
    }

    /// Sort albums by name, then artist
    pub fn sort_albums(albums: &mut [Album]) {
        albums.sort_by(|a, b| {
            Self::compare_names(&a.name, &b.name)
                .then_with(|| Self::compare_names(&a.artist, &b.artist))
        });
    }

    /// Sort artists by name
    pub fn sort_artists(artists: &mut [Artist]) {
        artists.sort_by(|a, b| Self::compare_names(&a.name, &b.name));
    }

    /// Artist page order: album, then title
    pub fn sort_songs_artist_order(songs: &mut [TaggedSong]) {
        songs.sort_by(|a, b| {
            a.song
                .album
                .cmp(&b.song.album)
                .then_with(|| a.song.title.cmp(&b.song.title))
                .then(a.song.id.cmp(&b.song.id))
        });
    }

    /// Album page order: title only, as songs carry no track numbers
    pub fn sort_songs_album_order(songs: &mut [TaggedSong]) {
        songs.sort_by(|a, b| {
            a.song
                .title
                .cmp(&b.song.title)
                .then(a.song.id.cmp(&b.song.id))
        });
    }
}
