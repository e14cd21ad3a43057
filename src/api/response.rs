//! Response envelope shared by every endpoint.
//!
//! Success bodies are `{"success": true, "message"?: ..., ...payload}`. Errors are
//! `{"success": false, "kind": ..., "message": ...}` with one status code per kind.

use crate::errors::{Error, ErrorKind};
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// Successful response body. `data` must serialize as a map.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Always `true`
    pub success: bool,
    /// Informational note, e.g. for empty results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Payload fields, flattened into the body
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wraps a payload with no message.
    pub const fn new(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    /// Attaches an informational message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Always `false`
    pub success: bool,
    /// Error category
    pub kind: ErrorKind,
    /// Human-readable reason
    pub message: String,
}

/// `200 OK` with `data` in the envelope.
pub fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::new(data))
}

/// `201 Created` with `data` in the envelope.
pub fn created<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Created().json(ApiResponse::new(data))
}

/// `200 OK` for a list, adding `empty_message` when there is nothing to return.
pub fn listing<T: Serialize>(data: T, is_empty: bool, empty_message: &str) -> HttpResponse {
    let body = ApiResponse::new(data);
    let body = if is_empty {
        body.with_message(empty_message)
    } else {
        body
    };
    HttpResponse::Ok().json(body)
}

const fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.kind())
    }

    fn error_response(&self) -> HttpResponse {
        let kind = self.kind();
        let message = if kind == ErrorKind::Internal {
            error!("Request failed: {self}");
            "Something went wrong, please try again later".to_string()
        } else {
            warn!(kind = ?kind, "Request rejected: {self}");
            self.to_string()
        };

        HttpResponse::build(status_for(kind)).json(ErrorBody {
            success: false,
            kind,
            message,
        })
    }
}
