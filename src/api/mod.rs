//! REST API routes for tagtunes

pub mod auth;
pub mod error;
pub mod songs;
pub mod tags;

use std::sync::Arc;

use actix_web::{get, web, HttpResponse, Responder};
use serde_json::json;

use crate::stores::EntityStore;
use crate::utils::auth::TokenIssuer;

/// Largest accepted JSON body; imports can carry whole libraries
const JSON_LIMIT: usize = 10 * 1024 * 1024;

/// Shared state handed to every handler
pub struct AppState {
    pub store: Arc<dyn EntityStore>,
    pub tokens: TokenIssuer,
    pub default_page_size: i64,
    pub max_page_size: i64,
}

/// GET /health
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Configure all API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_LIMIT)
            .error_handler(error::json_error_handler),
    )
    .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
    .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
    .service(health)
    .service(
        web::scope("/api")
            // Auth routes
            .service(web::scope("/auth").configure(auth::configure))
            // Song routes
            .service(web::scope("/songs").configure(songs::configure))
            // Tag routes
            .service(web::scope("/tags").configure(tags::configure)),
    );
}
