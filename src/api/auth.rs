//! Authentication api routes, bearer token based

use actix_web::{post, web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::AppState;
use crate::core::errors::{LibraryError, LibraryResult};
use crate::models::{NewUser, PublicUser, User};
use crate::utils::parsers::non_blank;

/// login request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default, alias = "appleMusicId")]
    pub provider_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: PublicUser,
}

/// login endpoint, provisions the user on first sight
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> LibraryResult<HttpResponse> {
    provision(&state, body.into_inner()).await
}

/// same as login, under the path older clients use
#[post("/apple-music-login")]
pub async fn apple_music_login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> LibraryResult<HttpResponse> {
    provision(&state, body.into_inner()).await
}

async fn provision(state: &AppState, body: LoginRequest) -> LibraryResult<HttpResponse> {
    let provider_id = non_blank(body.provider_id.as_deref())
        .ok_or_else(|| LibraryError::invalid("Provider id required"))?;

    let profile = NewUser {
        provider_id: provider_id.to_string(),
        email: body.email,
        display_name: body.display_name,
    };
    let user = state.store.find_or_create_user(&profile).await?;
    let token = state.tokens.issue(&user)?;

    info!("User {} logged in", user.id);
    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        user: user.to_public(),
    }))
}

/// Resolve the bearer token on `req` to a user that still exists
pub async fn require_user(req: &HttpRequest, state: &AppState) -> LibraryResult<User> {
    let token = bearer_token(req)?
        .ok_or_else(|| LibraryError::unauthenticated("Access token required"))?;

    let claims = state
        .tokens
        .verify(&token)
        .map_err(|_| LibraryError::unauthenticated("Invalid or expired token"))?;

    state
        .store
        .get_user(claims.user_id)
        .await?
        .ok_or_else(|| LibraryError::unauthenticated("User not found"))
}

fn bearer_token(req: &HttpRequest) -> LibraryResult<Option<String>> {
    match req.headers().get("Authorization") {
        Some(header_value) => {
            let header_str = header_value.to_str().unwrap_or("").trim();
            let token = header_str.strip_prefix("Bearer ").unwrap_or(header_str).trim();

            if token.is_empty() {
                return Err(LibraryError::unauthenticated("Invalid token format"));
            }

            Ok(Some(token.to_string()))
        }
        None => Ok(None),
    }
}

/// Configure auth routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(login).service(apple_music_login);
}
