//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use climadesk_config::ConfigError;
use climadesk_core::{CoreError, RouteError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const UNAVAILABLE: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Backend ──────────────────────────────────────────────────────

    #[error("Backend unavailable: {message}")]
    #[diagnostic(
        code(climadesk::unavailable),
        help(
            "Check that the backend is running and reachable.\n\
             Set the URL with --server or `climadesk config set server <url>`,\n\
             or raise --timeout if it is slow to answer."
        )
    )]
    Unavailable { message: String },

    #[error("Not authorized: {message}")]
    #[diagnostic(
        code(climadesk::unauthorized),
        help(
            "Verify the account and password for profile '{profile}'.\n\
             Run: climadesk config set-password"
        )
    )]
    Unauthorized { message: String, profile: String },

    #[error("Not found: {message}")]
    #[diagnostic(
        code(climadesk::not_found),
        help("Run: climadesk rooms list to see known rooms")
    )]
    NotFound { message: String },

    #[error("Rejected by backend: {message}")]
    #[diagnostic(
        code(climadesk::conflict),
        help("The room's current state does not allow this; check `climadesk rooms status <room>`.")
    )]
    Conflict { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(climadesk::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(climadesk::route))]
    Route(#[from] RouteError),

    // ── Schedule ─────────────────────────────────────────────────────

    #[error("Schedule finished with {failed} failed command(s) out of {total}")]
    #[diagnostic(
        code(climadesk::schedule_failed),
        help("Rerun with -o json to see every outcome.")
    )]
    ScheduleFailed { failed: usize, total: usize },

    #[error("Schedule cancelled")]
    #[diagnostic(code(climadesk::cancelled))]
    Cancelled,

    // ── Configuration ────────────────────────────────────────────────

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(climadesk::no_credentials),
        help(
            "Configure credentials with: climadesk config init\n\
             Or set password_env on the profile."
        )
    )]
    NoCredentials { profile: String },

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(climadesk::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: climadesk config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(climadesk::config))]
    Config { message: String },

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Unavailable { .. } => exit_code::UNAVAILABLE,
            Self::Unauthorized { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::Route(RouteError::NotFound { .. }) => {
                exit_code::NOT_FOUND
            }
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Validation { .. } | Self::Route(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the profile a backend call was made under.
    #[must_use]
    pub fn for_profile(self, name: &str) -> Self {
        match self {
            Self::Unauthorized { message, .. } => Self::Unauthorized {
                message,
                profile: name.to_owned(),
            },
            other => other,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Unauthorized { message } => Self::Unauthorized {
                message,
                profile: String::new(),
            },
            CoreError::NotFound { message } => Self::NotFound { message },
            CoreError::Conflict { message } => Self::Conflict { message },
            CoreError::Validation { message } => Self::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::Unavailable { message } => Self::Unavailable { message },
            CoreError::Route(e) => Self::Route(e),
            CoreError::InvalidCommand { input, reason } => Self::Validation {
                field: format!("command '{input}'"),
                reason,
            },
            CoreError::Schedule { message } => Self::Validation {
                field: "schedule".into(),
                reason: message,
            },
            CoreError::Config { message } => Self::Config { message },
        }
    }
}

impl From<climadesk_api::Error> for CliError {
    fn from(err: climadesk_api::Error) -> Self {
        CoreError::from(err).into()
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NoAccount { profile } | ConfigError::NoPassword { profile } => {
                Self::NoCredentials { profile }
            }
            ConfigError::UnknownProfile(name) => Self::ProfileNotFound {
                name,
                available: "(none)".into(),
            },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_taxonomy() {
        let cases = [
            (CoreError::Unauthorized { message: String::new() }, exit_code::AUTH),
            (CoreError::NotFound { message: String::new() }, exit_code::NOT_FOUND),
            (CoreError::Conflict { message: String::new() }, exit_code::CONFLICT),
            (CoreError::Validation { message: String::new() }, exit_code::USAGE),
            (CoreError::Unavailable { message: String::new() }, exit_code::UNAVAILABLE),
        ];
        for (err, code) in cases {
            assert_eq!(CliError::from(err).exit_code(), code);
        }
    }

    #[test]
    fn unauthorized_names_the_active_profile() {
        let err = CliError::from(CoreError::Unauthorized {
            message: "session expired".into(),
        })
        .for_profile("spa");
        match &err {
            CliError::Unauthorized { profile, .. } => assert_eq!(profile, "spa"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.exit_code(), exit_code::AUTH);

        let err = CliError::from(CoreError::NotFound {
            message: "room 999".into(),
        })
        .for_profile("spa");
        assert!(matches!(err, CliError::NotFound { .. }));
    }

    #[test]
    fn unknown_route_is_not_found() {
        let err = CliError::from(RouteError::NotFound { path: "/x".into() });
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        let err = CliError::from(RouteError::Duplicate { path: "/x".into() });
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }
}
