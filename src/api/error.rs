//! HTTP mapping of library errors
//!
//! Every failure leaves the server as `{"error": <message>}`.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use serde_json::json;
use tracing::error;

use crate::core::errors::LibraryError;

impl ResponseError for LibraryError {
    fn status_code(&self) -> StatusCode {
        match self {
            LibraryError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            LibraryError::Conflict(_) => StatusCode::CONFLICT,
            LibraryError::NotFound(_) => StatusCode::NOT_FOUND,
            LibraryError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            LibraryError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            LibraryError::Internal(detail) => {
                error!("Request failed: {}", detail);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    LibraryError::invalid(format!("Invalid request body: {}", err)).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    LibraryError::invalid(format!("Invalid query string: {}", err)).into()
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    LibraryError::invalid(format!("Invalid path: {}", err)).into()
}
