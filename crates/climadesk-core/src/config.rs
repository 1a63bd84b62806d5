// ── Runtime connection configuration ──
//
// Describes how to reach the backend. Carries an optional bearer token
// but never touches disk; the CLI builds a `ClientConfig` from a profile
// and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use climadesk_api::{ApiClient, TemperatureBounds, TlsMode, TransportConfig};
use secrecy::SecretString;
use url::Url;

use crate::error::CoreError;

/// Base URL used when no server is configured.
pub const DEFAULT_SERVER: &str = "http://localhost:8080/api";

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed front-desk servers).
    DangerAcceptInvalid,
}

/// Everything needed to construct an [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (e.g., `http://localhost:8080/api`).
    pub server: Url,
    pub tls: TlsVerification,
    pub timeout: Duration,
    /// Sent as a bearer header when the backend requires one.
    pub bearer_token: Option<SecretString>,
    pub temperature_bounds: TemperatureBounds,
}

impl ClientConfig {
    pub fn new(server: Url) -> Self {
        Self {
            server,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            bearer_token: None,
            temperature_bounds: TemperatureBounds::default(),
        }
    }

    /// Parse `server` and start from the defaults.
    pub fn for_server(server: &str) -> Result<Self, CoreError> {
        let url = Url::parse(server).map_err(|e| CoreError::Config {
            message: format!("invalid server URL '{server}': {e}"),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CoreError::Config {
                message: format!("server URL '{server}' must use http or https"),
            });
        }
        Ok(Self::new(url))
    }

    fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
            bearer_token: self.bearer_token.clone(),
        }
    }

    /// Construct the client described by this config.
    pub fn build_client(&self) -> Result<ApiClient, CoreError> {
        let client = ApiClient::new(self.server.clone(), &self.transport())?;
        Ok(client.with_temperature_bounds(self.temperature_bounds))
    }
}
