//! Artist model

use serde::{Deserialize, Serialize};

/// An artist as seen in a user's library, built from their songs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    /// Artist name
    pub name: String,
    /// Number of owned songs by the artist
    pub song_count: i64,
    /// Distinct artwork URLs in the order they were first seen
    #[serde(default)]
    pub artwork_urls: Vec<String>,
}

impl Artist {
    pub fn new(name: String) -> Self {
        Self {
            name,
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

/// Append a non-empty artwork URL unless it is already listed
pub(crate) fn push_distinct_artwork(urls: &mut Vec<String>, artwork_url: Option<&str>) {
    if let Some(url) = artwork_url.filter(|u| !u.is_empty()) {
        if !urls.iter().any(|u| u == url) {
            urls.push(url.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artwork_order_is_first_seen() {
        let mut artist = Artist::new("Harry Styles".into());
        artist.add_song(Some("b"));
        artist.add_song(Some("a"));
        artist.add_song(Some("b"));

        assert_eq!(artist.song_count, 3);
        assert_eq!(artist.artwork_urls, vec!["b".to_string(), "a".to_string()]);
    }
}
