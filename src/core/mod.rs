//! Core library functions for tagtunes

pub mod errors;
pub mod importer;
pub mod organize;
pub mod query;
pub mod sorting;
pub mod tags;

pub use importer::ImportLib;
pub use organize::{CategoryKind, OrganizeKind, OrganizeLib};
pub use query::{ListSongs, QueryLib};
pub use tags::TagLib;
