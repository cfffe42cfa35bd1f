//! Song query engine: search, AND tag filter and pagination

use serde::Serialize;

use crate::core::errors::{LibraryError, LibraryResult};
use crate::models::TaggedSong;
use crate::stores::{EntityStore, SongQuery};
use crate::utils::parsers::{fold_case, non_blank};

/// Parameters of a song listing, as requested by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSongs {
    pub search: Option<String>,
    /// Tag names a song must all carry
    pub tags: Vec<String>,
    /// 1-based page number; values below 1 mean the first page
    pub page: i64,
    pub page_size: i64,
}

impl Default for ListSongs {
    fn default() -> Self {
        Self {
            search: None,
            tags: Vec::new(),
            page: 1,
            page_size: 50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    /// Whether at least one more song exists after this page
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SongPage {
    pub songs: Vec<TaggedSong>,
    pub pagination: Pagination,
}

/// Query library functions
pub struct QueryLib;

impl QueryLib {
    /// List one page of an owner's songs.
    ///
    /// Songs are ordered by title then id, so identical queries over the same
    /// data always return the same page. `page_size` is clamped to
    /// `max_page_size`.
    pub async fn list_songs(
        store: &dyn EntityStore,
        owner: i64,
        params: &ListSongs,
        max_page_size: i64,
    ) -> LibraryResult<SongPage> {
        if params.page_size <= 0 {
            return Err(LibraryError::invalid("limit must be a positive number"));
        }

        let page = params.page.max(1);
        let limit = params.page_size.min(max_page_size.max(1));
        let offset = (page - 1).saturating_mul(limit);

        let mut tags: Vec<String> = Vec::new();
        for name in params.tags.iter().filter_map(|t| non_blank(Some(t))) {
            let folded = fold_case(name);
            if !tags.contains(&folded) {
                tags.push(folded);
            }
        }

        // one extra row tells whether another page exists
        let query = SongQuery {
            search: non_blank(params.search.as_deref()).map(fold_case),
            tags,
            offset,
            limit: limit + 1,
        };

        let mut songs = store.query_songs(owner, &query).await?;
        let has_more = songs.len() as i64 > limit;
        songs.truncate(limit as usize);

        Ok(SongPage {
            songs,
            pagination: Pagination {
                page,
                limit,
                has_more,
            },
        })
    }
}
