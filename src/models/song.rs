//! Song model

use serde::{Deserialize, Serialize};

use crate::utils::parsers::fold_case;

/// A song in a user's library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Database ID
    pub id: i64,
    /// Id of the song in the external catalog it was imported from
    pub external_id: String,
    /// Song title
    pub title: String,
    /// Artist name
    pub artist: String,
    /// Album name
    pub album: String,
    /// Artwork URL
    #[serde(default)]
    pub artwork_url: Option<String>,
    /// Owning user
    pub user_id: i64,
    /// Creation timestamp (unix seconds)
    pub created_at: i64,
}

impl Song {
    /// Whether the title or artist contains an already folded needle
    pub fn matches_search(&self, folded_needle: &str) -> bool {
        fold_case(&self.title).contains(folded_needle)
            || fold_case(&self.artist).contains(folded_needle)
    }
}

/// A normalized song ready to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSong {
    pub external_id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub artwork_url: Option<String>,
}

/// A song together with the names of the tags assigned to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaggedSong {
    #[serde(flatten)]
    pub song: Song,
    /// Tag names ordered by the owner's tag order
    pub tags: Vec<String>,
}

impl TaggedSong {
    pub fn new(song: Song, tags: Vec<String>) -> Self {
        Self { song, tags }
    }
}
