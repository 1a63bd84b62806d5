use serde::Serialize;
use strum::{Display, EnumString};
use thiserror::Error;

/// Failure taxonomy shared by every backend operation.
///
/// The message carried by each variant is the backend's own wording,
/// passed through unmodified. The client never retries and never
/// substitutes a fallback value; recovery belongs to the caller.
#[derive(Debug, Error)]
pub enum Error {
    /// Credentials rejected, session missing, or role not permitted (HTTP 401/403).
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Unknown room or stay (HTTP 404).
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// The request contradicts current backend state, e.g. check-in on an
    /// occupied room or an AC command on an out-of-service room (HTTP 409).
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Out-of-range or malformed parameters. Raised locally before any
    /// request is sent, or by the backend (HTTP 400/422 and other 4xx).
    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// Backend unreachable, timed out, failing (5xx), or answering with a
    /// body that does not decode into the expected shape.
    #[error("Backend unavailable: {message}")]
    Unavailable { message: String },

    /// The client itself could not be built (TLS material, header values,
    /// base URL). Never returned by an operation.
    #[error("Client setup failed: {0}")]
    Setup(String),
}

/// Discriminant of [`Error`], convenient for matching and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ErrorKind {
    Unauthorized,
    NotFound,
    Conflict,
    Validation,
    Unavailable,
    Setup,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Unavailable { .. } => ErrorKind::Unavailable,
            Self::Setup(_) => ErrorKind::Setup,
        }
    }

    /// The message as reported by the backend (or the local validator).
    pub fn message(&self) -> &str {
        match self {
            Self::Unauthorized { message }
            | Self::NotFound { message }
            | Self::Conflict { message }
            | Self::Validation { message }
            | Self::Unavailable { message }
            | Self::Setup(message) => message,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Classify a non-success HTTP status, keeping the backend's message.
    pub(crate) fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => Self::Unauthorized { message },
            404 => Self::NotFound { message },
            409 => Self::Conflict { message },
            400..=499 => Self::Validation { message },
            _ => Self::Unavailable { message },
        }
    }

    /// Classify a transport failure. Timeouts and connection errors both
    /// surface as [`Error::Unavailable`].
    pub(crate) fn from_transport(err: &reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("request timed out: {err}")
        } else if err.is_connect() {
            format!("cannot reach backend: {err}")
        } else {
            err.to_string()
        };
        Self::Unavailable { message }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::from_transport(&err)
    }
}
