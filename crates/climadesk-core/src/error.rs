// ── Core error types ──
//
// Backend failures keep the taxonomy of `climadesk_api::Error`; route
// and schedule problems get their own variants so callers can tell a
// bad schedule file from a refusing backend.

use climadesk_api::ErrorKind;
use thiserror::Error;

use crate::routes::RouteError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Backend errors ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    Unauthorized { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Rejected by backend: {message}")]
    Conflict { message: String },

    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Backend unavailable: {message}")]
    Unavailable { message: String },

    // ── Local errors ─────────────────────────────────────────────────
    #[error(transparent)]
    Route(#[from] RouteError),

    #[error("Invalid AC command '{input}': {reason}")]
    InvalidCommand { input: String, reason: String },

    #[error("Invalid schedule: {message}")]
    Schedule { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Backend error kind, when this error came from the backend.
    pub fn api_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Unauthorized { .. } => Some(ErrorKind::Unauthorized),
            Self::NotFound { .. } => Some(ErrorKind::NotFound),
            Self::Conflict { .. } => Some(ErrorKind::Conflict),
            Self::Validation { .. } => Some(ErrorKind::Validation),
            Self::Unavailable { .. } => Some(ErrorKind::Unavailable),
            _ => None,
        }
    }
}

// ── Conversion from client errors ────────────────────────────────────

impl From<climadesk_api::Error> for CoreError {
    fn from(err: climadesk_api::Error) -> Self {
        match err {
            climadesk_api::Error::Unauthorized { message } => Self::Unauthorized { message },
            climadesk_api::Error::NotFound { message } => Self::NotFound { message },
            climadesk_api::Error::Conflict { message } => Self::Conflict { message },
            climadesk_api::Error::Validation { message } => Self::Validation { message },
            climadesk_api::Error::Unavailable { message } => Self::Unavailable { message },
            climadesk_api::Error::Setup(message) => Self::Config { message },
        }
    }
}
