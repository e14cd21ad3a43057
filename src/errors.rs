//! Unified error types for the exchange desk.
//!
//! Every fallible operation returns [`Result`]. Each variant maps onto exactly one
//! [`ErrorKind`], and the HTTP layer maps each kind onto one fixed status code, so
//! message text stays presentation only.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application error type
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid credential, or no active employee behind it
    #[error("Please log in to continue")]
    Unauthorized,

    /// Authenticated, but lacking the capability or ownership required
    #[error("Forbidden: {reason}")]
    Forbidden {
        /// What the caller was not allowed to do
        reason: String,
    },

    /// Missing required fields, invalid enum values, bad date ranges
    #[error("{message}")]
    BadRequest {
        /// Human-readable description of the problem
        message: String,
    },

    /// A referenced record does not exist
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Record type, e.g. `"process"`
        entity: &'static str,
        /// The identifier that was looked up
        id: String,
    },

    /// A uniqueness or singleton rule would be broken
    #[error("{message}")]
    Conflict {
        /// Which rule was violated
        message: String,
    },

    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// Database failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Machine-readable classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`Error::Unauthorized`]
    Unauthorized,
    /// See [`Error::Forbidden`]
    Forbidden,
    /// See [`Error::BadRequest`]
    BadRequest,
    /// See [`Error::NotFound`]
    NotFound,
    /// See [`Error::Conflict`]
    Conflict,
    /// Anything unexpected: configuration, database, I/O
    Internal,
}

impl Error {
    /// Shorthand for a [`Error::BadRequest`] with the given message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Shorthand for a [`Error::Forbidden`] with the given reason.
    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`Error::NotFound`].
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Returns the kind this error belongs to.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::BadRequest { .. } => ErrorKind::BadRequest,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Config { .. } | Self::Database(_) | Self::Io(_) => ErrorKind::Internal,
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
