//! Data models for tagtunes
//!
//! This module contains the entities kept by the entity stores and the
//! summaries built from them.

mod album;
mod artist;
mod external;
mod song;
mod tag;
mod user;

pub use album::Album;
pub use artist::Artist;
pub use external::ExternalSongRecord;
pub use song::{NewSong, Song, TaggedSong};
pub use tag::{NewTag, Tag, TagWithCount, DEFAULT_TAG_COLOR};
pub use user::{NewUser, PublicUser, User};
