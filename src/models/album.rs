//! Album model

use serde::{Deserialize, Serialize};

use super::artist::push_distinct_artwork;

/// An album as seen in a user's library, built from their songs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    /// Album title
    pub name: String,
    /// Artist the album is grouped under
    pub artist: String,
    /// Number of owned songs on the album
    pub song_count: i64,
    /// Distinct artwork URLs in the order they were first seen
    #[serde(default)]
    pub artwork_urls: Vec<String>,
}

impl Album {
    pub fn new(name: String, artist: String) -> Self {
        Self {
            name,
            artist,
            song_count: 0,
            artwork_urls: Vec::new(),
        }
    }

    /// Count one more song, remembering its artwork
    pub fn add_song(&mut self, artwork_url: Option<&str>) {
        self.song_count += 1;
        push_distinct_artwork(&mut self.artwork_urls, artwork_url);
    }
}
