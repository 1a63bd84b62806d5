//! CLI configuration: thin wrapper around `climadesk_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--server, --token, --timeout, ...).

use std::time::Duration;

use secrecy::SecretString;

use climadesk_core::{ClientConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use climadesk_config::{
    Config, Profile, config_path, load_config, load_config_or_default,
    profile_to_client_config, resolve_password, save_config, store_password,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.active_profile_name().to_owned())
}

/// Look up the active profile.
///
/// An explicitly requested profile must exist; the implicit default falls
/// back to an empty profile pointing at the default server.
pub fn active_profile(global: &GlobalOpts, config: &Config) -> Result<(String, Profile), CliError> {
    let name = active_profile_name(global, config);
    match config.profiles.get(&name) {
        Some(profile) => Ok((name, profile.clone())),
        None if global.profile.is_none() => Ok((name, Profile::default())),
        None => Err(CliError::ProfileNotFound {
            name,
            available: available_profiles(config),
        }),
    }
}

pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort_unstable();
    names.join(", ")
}

/// Translate the active profile plus global flags into a `ClientConfig`.
///
/// Flag values take priority over profile values.
pub fn resolve_client_config(
    global: &GlobalOpts,
    config: &Config,
) -> Result<ClientConfig, CliError> {
    let (_, mut profile) = active_profile(global, config)?;

    if let Some(ref server) = global.server {
        profile.server.clone_from(server);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    let mut client = profile_to_client_config(&profile, &config.defaults)?;
    if global.insecure {
        client.tls = TlsVerification::DangerAcceptInvalid;
    }
    if client.timeout.is_zero() {
        client.timeout = Duration::from_secs(30);
    }
    client.bearer_token = global.token.clone().map(SecretString::from);

    Ok(client)
}
