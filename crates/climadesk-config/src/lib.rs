//! Configuration for the climadesk CLI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext), and
//! translation to `climadesk_core::ClientConfig`. The CLI layers its
//! flag overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use climadesk_core::{ClientConfig, DEFAULT_SERVER, TemperatureBounds, TlsVerification};

const KEYRING_SERVICE: &str = "climadesk";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no account configured for profile '{profile}'")]
    NoAccount { profile: String },

    #[error("no password configured for profile '{profile}'")]
    NoPassword { profile: String },

    #[error("profile '{0}' not found")]
    UnknownProfile(String),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use when none is given explicitly.
    pub fn active_profile_name(&self) -> &str {
        self.default_profile.as_deref().unwrap_or("default")
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile(name.into()))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_server() -> String {
    DEFAULT_SERVER.into()
}

/// A named backend profile.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Backend base URL (e.g., "http://localhost:8080/api").
    #[serde(default = "default_server")]
    pub server: String,

    /// Front-desk or manager account used by `login`.
    pub account: Option<String>,

    /// Password (plaintext; prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Lowest accepted target temperature (°C).
    pub min_temperature: Option<f64>,

    /// Highest accepted target temperature (°C).
    pub max_temperature: Option<f64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            server: default_server(),
            account: None,
            password: None,
            password_env: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
            min_temperature: None,
            max_temperature: None,
        }
    }
}

impl Profile {
    pub fn temperature_bounds(&self) -> Result<TemperatureBounds, ConfigError> {
        let defaults = TemperatureBounds::default();
        TemperatureBounds::new(
            self.min_temperature.unwrap_or(defaults.min),
            self.max_temperature.unwrap_or(defaults.max),
        )
        .map_err(|e| ConfigError::Validation {
            field: "min_temperature/max_temperature".into(),
            reason: e.message().to_owned(),
        })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "climadesk", "climadesk").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("climadesk");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` + `CLIMADESK_` environment variables.
///
/// Nested keys use a double underscore:
/// `CLIMADESK_PROFILES__DEFAULT__SERVER=http://desk:8080/api`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("CLIMADESK_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it cannot be read.
///
/// For read-only display only; anything that saves or connects must use
/// [`load_config`] so a malformed file is reported instead of replaced.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/password"),
    )?)
}

/// Resolve the profile's password: `password_env` → keyring → plaintext.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoPassword {
        profile: profile_name.into(),
    })
}

/// Resolve account + password for `login`.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<(String, SecretString), ConfigError> {
    let account = profile
        .account
        .clone()
        .ok_or_else(|| ConfigError::NoAccount {
            profile: profile_name.into(),
        })?;
    let password = resolve_password(profile, profile_name)?;
    Ok((account, password))
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &SecretString) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(password.expose_secret())?;
    Ok(())
}

// ── Profile translation ─────────────────────────────────────────────

/// Build a `ClientConfig` from a profile, with `defaults` filling gaps.
pub fn profile_to_client_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    let mut config =
        ClientConfig::for_server(&profile.server).map_err(|e| ConfigError::Validation {
            field: "server".into(),
            reason: e.to_string(),
        })?;

    config.tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.temperature_bounds = profile.temperature_bounds()?;

    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.active_profile_name(), "default");
        assert_eq!(cfg.defaults.timeout, 30);
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[profiles.spa]\ntimeout = \"ten\"\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Figment(_)), "got {err:?}");
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "desk".into(),
            Profile {
                account: Some("front_desk".into()),
                password_env: Some("DESK_PASSWORD".into()),
                min_temperature: Some(18.0),
                ..Profile::default()
            },
        );
        cfg.default_profile = Some("desk".into());
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded, cfg);
        assert_eq!(loaded.profile("desk").unwrap().server, DEFAULT_SERVER);
    }

    #[test]
    fn profile_server_defaults_when_omitted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[profiles.default]\naccount = \"manager\"\ntimeout = 5\n",
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        let profile = cfg.profile("default").unwrap();
        assert_eq!(profile.server, DEFAULT_SERVER);
        assert_eq!(profile.timeout, Some(5));
        assert!(matches!(
            cfg.profile("other"),
            Err(ConfigError::UnknownProfile(_))
        ));
    }

    #[test]
    fn profile_translates_to_client_config() {
        let profile = Profile {
            server: "https://desk.example:8443/api".into(),
            ca_cert: Some(PathBuf::from("/etc/climadesk/ca.pem")),
            timeout: Some(5),
            max_temperature: Some(26.0),
            ..Profile::default()
        };
        let config = profile_to_client_config(&profile, &Defaults::default()).unwrap();

        assert_eq!(config.server.as_str(), "https://desk.example:8443/api");
        assert_eq!(
            config.tls,
            TlsVerification::CustomCa(PathBuf::from("/etc/climadesk/ca.pem"))
        );
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.temperature_bounds, TemperatureBounds::new(16.0, 26.0).unwrap());
    }

    #[test]
    fn insecure_overrides_ca() {
        let profile = Profile {
            insecure: Some(true),
            ca_cert: Some(PathBuf::from("ca.pem")),
            ..Profile::default()
        };
        let config = profile_to_client_config(&profile, &Defaults::default()).unwrap();
        assert_eq!(config.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let profile = Profile {
            min_temperature: Some(28.0),
            max_temperature: Some(20.0),
            ..Profile::default()
        };
        assert!(matches!(
            profile_to_client_config(&profile, &Defaults::default()),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn bad_server_is_rejected() {
        let profile = Profile {
            server: "desk:8080".into(),
            ..Profile::default()
        };
        let err = profile_to_client_config(&profile, &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "server"));
    }

    #[test]
    fn plaintext_password_is_last_resort() {
        let profile = Profile {
            account: Some("front_desk".into()),
            password: Some("pw".into()),
            ..Profile::default()
        };
        let (account, password) =
            resolve_credentials(&profile, "climadesk-test-no-keyring").unwrap();
        assert_eq!(account, "front_desk");
        assert_eq!(password.expose_secret(), "pw");
    }

    #[test]
    fn missing_account_is_reported() {
        let profile = Profile::default();
        assert!(matches!(
            resolve_credentials(&profile, "default"),
            Err(ConfigError::NoAccount { .. })
        ));
    }
}
