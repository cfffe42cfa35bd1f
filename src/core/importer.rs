//! Import reconciler
//!
//! Merges an external song list into a user's library. Songs are keyed by
//! `(external_id, owner)`; a song that is already present is left untouched,
//! so re-running an import is always safe.

use tracing::{debug, info};

use crate::core::errors::{LibraryError, LibraryResult};
use crate::models::{ExternalSongRecord, NewSong};
use crate::stores::EntityStore;

/// Outcome of an import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Records in the request
    pub submitted: usize,
    /// Songs that were new to the library
    pub inserted: usize,
}

/// Import library functions
pub struct ImportLib;

impl ImportLib {
    /// Normalize every record up front so a malformed batch is rejected
    /// before anything is written
    pub fn normalize(records: &[ExternalSongRecord]) -> LibraryResult<Vec<NewSong>> {
        records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                record.normalize().ok_or_else(|| {
                    LibraryError::invalid(format!("Song at index {} has no id", index))
                })
            })
            .collect()
    }

    /// Import records for `owner` in input order.
    ///
    /// There is no batch-wide transaction: if the store fails midway, the
    /// songs before the failure stay imported and a retry skips them.
    pub async fn import(
        store: &dyn EntityStore,
        owner: i64,
        records: &[ExternalSongRecord],
    ) -> LibraryResult<ImportSummary> {
        let songs = Self::normalize(records)?;

        let mut inserted = 0;
        for song in &songs {
            if store.insert_song_if_absent(owner, song).await? {
                inserted += 1;
            } else {
                debug!("Skipping known song {} for user {}", song.external_id, owner);
            }
        }

        info!(
            "Imported {} new of {} submitted songs for user {}",
            inserted,
            songs.len(),
            owner
        );

        Ok(ImportSummary {
            submitted: records.len(),
            inserted,
        })
    }
}
