//! Tag model

use serde::{Deserialize, Serialize};

/// Color given to tags created without one
pub const DEFAULT_TAG_COLOR: &str = "#3B82F6";

/// A user-defined label attached to songs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Database ID
    pub id: i64,
    /// Tag name, unique per owner ignoring case
    pub name: String,
    /// Display color hint
    pub color: String,
    /// Owning user
    pub user_id: i64,
    /// Position in the owner's tag list
    pub order_index: i64,
    /// Whether clients should show the tag
    pub is_visible: bool,
    /// Creation timestamp (unix seconds)
    pub created_at: i64,
}

/// A validated tag ready to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    pub name: String,
    pub color: String,
}

/// A tag with the number of songs it is assigned to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagWithCount {
    #[serde(flatten)]
    pub tag: Tag,
    pub song_count: i64,
}
