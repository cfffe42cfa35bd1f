//! Tags API routes

use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use super::auth::require_user;
use super::AppState;
use crate::core::errors::LibraryResult;
use crate::core::TagLib;

#[derive(Debug, Deserialize)]
pub struct CreateTagRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRequest {
    pub song_id: i64,
    pub tag_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub tag_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityRequest {
    pub is_visible: bool,
}

fn message(text: &str) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": text }))
}

/// GET /tags
#[get("")]
pub async fn list_tags(req: HttpRequest, state: web::Data<AppState>) -> LibraryResult<HttpResponse> {
    let user = require_user(&req, &state).await?;
    let tags = TagLib::list(state.store.as_ref(), user.id).await?;
    Ok(HttpResponse::Ok().json(tags))
}

/// POST /tags
#[post("")]
pub async fn create_tag(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<CreateTagRequest>,
) -> LibraryResult<HttpResponse> {
    let user = require_user(&req, &state).await?;
    let tag = TagLib::create(
        state.store.as_ref(),
        user.id,
        body.name.as_deref().unwrap_or(""),
        body.color.as_deref(),
    )
    .await?;

    Ok(HttpResponse::Created().json(tag))
}

/// POST /tags/assign
#[post("/assign")]
pub async fn assign_tag(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<AssignmentRequest>,
) -> LibraryResult<HttpResponse> {
    let user = require_user(&req, &state).await?;
    TagLib::assign(state.store.as_ref(), user.id, body.song_id, body.tag_id).await?;
    Ok(message("Tag assigned successfully"))
}

/// DELETE /tags/assign
#[delete("/assign")]
pub async fn remove_tag(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<AssignmentRequest>,
) -> LibraryResult<HttpResponse> {
    let user = require_user(&req, &state).await?;
    TagLib::remove(state.store.as_ref(), user.id, body.song_id, body.tag_id).await?;
    Ok(message("Tag removed successfully"))
}

/// PUT /tags/order
#[put("/order")]
pub async fn reorder_tags(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<ReorderRequest>,
) -> LibraryResult<HttpResponse> {
    let user = require_user(&req, &state).await?;
    TagLib::reorder(state.store.as_ref(), user.id, &body.tag_ids).await?;
    Ok(message("Tag order updated successfully"))
}

/// PUT /tags/{id}/visibility
#[put("/{id}/visibility")]
pub async fn set_visibility(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<VisibilityRequest>,
) -> LibraryResult<HttpResponse> {
    let user = require_user(&req, &state).await?;
    TagLib::set_visibility(state.store.as_ref(), user.id, path.into_inner(), body.is_visible)
        .await?;
    Ok(message("Tag visibility updated successfully"))
}

/// Configure tag routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_tags)
        .service(create_tag)
        .service(assign_tag)
        .service(remove_tag)
        .service(reorder_tags)
        .service(set_visibility);
}
