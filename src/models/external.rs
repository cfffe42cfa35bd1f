//! Song records as delivered by external catalogs
//!
//! Import feeds are not uniform: catalog payloads nest metadata under
//! `attributes` (`name`, `artistName`, `albumName`, `artwork.url`), while
//! hand-written or legacy payloads use flat `title`/`artist`/`album` fields.
//! Everything is optional here; [`ExternalSongRecord::normalize`] maps a record
//! onto a [`NewSong`] with fixed fallbacks.

use serde::Deserialize;

use super::NewSong;

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// External id, which catalogs send either as a string or a number
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ExternalId {
    Text(String),
    Number(i64),
}

impl ExternalId {
    fn as_id(&self) -> Option<String> {
        match self {
            ExternalId::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            ExternalId::Number(n) => Some(n.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExternalArtwork {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalAttributes {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub artist_name: Option<String>,
    #[serde(default)]
    pub album_name: Option<String>,
    #[serde(default)]
    pub artwork: Option<ExternalArtwork>,
}

/// One song from an import payload
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSongRecord {
    #[serde(default)]
    pub id: Option<ExternalId>,
    #[serde(default)]
    pub attributes: Option<ExternalAttributes>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default, alias = "artwork_url")]
    pub artwork_url: Option<String>,
}

impl ExternalSongRecord {
    /// Map the record onto the canonical shape.
    ///
    /// Returns `None` when the record carries no usable external id.
    pub fn normalize(&self) -> Option<NewSong> {
        let external_id = self.id.as_ref().and_then(ExternalId::as_id)?;
        let attrs = self.attributes.as_ref();

        let title = first_present(&[
            attrs.and_then(|a| a.name.as_deref()),
            self.title.as_deref(),
        ])
        .unwrap_or(UNKNOWN_TITLE);
        let artist = first_present(&[
            attrs.and_then(|a| a.artist_name.as_deref()),
            self.artist.as_deref(),
        ])
        .unwrap_or(UNKNOWN_ARTIST);
        let album = first_present(&[
            attrs.and_then(|a| a.album_name.as_deref()),
            self.album.as_deref(),
        ])
        .unwrap_or(UNKNOWN_ALBUM);
        let artwork_url = first_present(&[
            attrs
                .and_then(|a| a.artwork.as_ref())
                .and_then(|art| art.url.as_deref()),
            self.artwork_url.as_deref(),
        ]);

        Some(NewSong {
            external_id,
            title: title.to_string(),
            artist: artist.to_string(),
            album: album.to_string(),
            artwork_url: artwork_url.map(str::to_string),
        })
    }
}

/// First candidate that is present and not blank
fn first_present<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .copied()
        .find(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> ExternalSongRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_catalog_shape() {
        let song = record(json!({
            "id": "x1",
            "attributes": {
                "name": "Anti-Hero",
                "artistName": "Taylor Swift",
                "albumName": "Midnights",
                "artwork": {"url": "https://img/{w}x{h}.jpg"}
            }
        }))
        .normalize()
        .unwrap();

        assert_eq!(song.external_id, "x1");
        assert_eq!(song.title, "Anti-Hero");
        assert_eq!(song.artist, "Taylor Swift");
        assert_eq!(song.album, "Midnights");
        assert_eq!(song.artwork_url.as_deref(), Some("https://img/{w}x{h}.jpg"));
    }

    #[test]
    fn test_flat_shape_and_numeric_id() {
        let song = record(json!({
            "id": 42,
            "title": "Levitating",
            "artist": "Dua Lipa",
            "artwork_url": "https://img/l.jpg"
        }))
        .normalize()
        .unwrap();

        assert_eq!(song.external_id, "42");
        assert_eq!(song.title, "Levitating");
        assert_eq!(song.album, UNKNOWN_ALBUM);
        assert_eq!(song.artwork_url.as_deref(), Some("https://img/l.jpg"));
    }

    #[test]
    fn test_missing_fields_fall_back() {
        let song = record(json!({"id": "x2", "attributes": {"name": ""}}))
            .normalize()
            .unwrap();

        assert_eq!(song.title, UNKNOWN_TITLE);
        assert_eq!(song.artist, UNKNOWN_ARTIST);
        assert_eq!(song.album, UNKNOWN_ALBUM);
        assert_eq!(song.artwork_url, None);
    }

    #[test]
    fn test_missing_id_is_rejected() {
        assert!(record(json!({"title": "No id"})).normalize().is_none());
        assert!(record(json!({"id": "  "})).normalize().is_none());
    }
}
