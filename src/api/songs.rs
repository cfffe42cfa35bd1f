//! Songs API routes

use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use super::auth::require_user;
use super::AppState;
use crate::core::errors::{LibraryError, LibraryResult};
use crate::core::{CategoryKind, ImportLib, ListSongs, OrganizeKind, OrganizeLib, QueryLib};
use crate::models::ExternalSongRecord;
use crate::utils::parsers::parse_tag_list;

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    #[serde(default)]
    pub songs: Option<Vec<ExternalSongRecord>>,
}

/// Query parameters of the song listing
#[derive(Debug, Deserialize)]
pub struct SongsQuery {
    pub search: Option<String>,
    /// comma-separated tag names
    pub tags: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub artist: Option<String>,
}

/// POST /songs/import
#[post("/import")]
pub async fn import_songs(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<ImportRequest>,
) -> LibraryResult<HttpResponse> {
    let user = require_user(&req, &state).await?;
    let songs = body
        .into_inner()
        .songs
        .ok_or_else(|| LibraryError::invalid("Songs array required"))?;

    let summary = ImportLib::import(state.store.as_ref(), user.id, &songs).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Songs imported successfully",
        "count": summary.submitted,
    })))
}

/// GET /songs
#[get("")]
pub async fn list_songs(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<SongsQuery>,
) -> LibraryResult<HttpResponse> {
    let user = require_user(&req, &state).await?;
    let query = query.into_inner();

    let params = ListSongs {
        search: query.search,
        tags: query.tags.as_deref().map(parse_tag_list).unwrap_or_default(),
        page: query.page.unwrap_or(1),
        page_size: query.limit.unwrap_or(state.default_page_size),
    };
    let page =
        QueryLib::list_songs(state.store.as_ref(), user.id, &params, state.max_page_size).await?;

    Ok(HttpResponse::Ok().json(page))
}

/// GET /songs/organize/{kind}
#[get("/organize/{kind}")]
pub async fn organize(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> LibraryResult<HttpResponse> {
    let user = require_user(&req, &state).await?;
    let kind: OrganizeKind = path.parse()?;

    let organized = OrganizeLib::organize(state.store.as_ref(), user.id, kind).await?;
    Ok(HttpResponse::Ok().json(organized))
}

/// GET /songs/by/{kind}/{name}
#[get("/by/{kind}/{name}")]
pub async fn by_category(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    query: web::Query<CategoryQuery>,
) -> LibraryResult<HttpResponse> {
    let user = require_user(&req, &state).await?;
    let (kind, name) = path.into_inner();
    let kind: CategoryKind = kind.parse()?;

    let songs = OrganizeLib::by_category(
        state.store.as_ref(),
        user.id,
        kind,
        &name,
        query.artist.as_deref(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "songs": songs })))
}

/// Configure song routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(import_songs)
        .service(list_songs)
        .service(organize)
        .service(by_category);
}
