//! Login handler.

use secrecy::SecretString;
use serde::Serialize;

use climadesk_config::ConfigError;
use climadesk_core::ApiClient;

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct LoginResult<'a> {
    account: &'a str,
    role: Option<&'a str>,
    token_issued: bool,
}

pub async fn handle(
    client: &ApiClient,
    args: LoginArgs,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (profile_name, profile) = config::active_profile(global, cfg)?;

    let account = args
        .account
        .or_else(|| profile.account.clone())
        .ok_or_else(|| CliError::NoCredentials {
            profile: profile_name.clone(),
        })?;

    let password = match config::resolve_password(&profile, &profile_name) {
        Ok(secret) => secret,
        Err(ConfigError::NoPassword { .. }) => {
            let entered = rpassword::prompt_password(format!("Password for {account}: "))?;
            SecretString::from(entered)
        }
        Err(e) => return Err(e.into()),
    };

    let session = client.login(&account, &password).await?;

    let result = LoginResult {
        account: &session.account,
        role: session.role.as_deref(),
        token_issued: session.token().is_some(),
    };
    let out = output::render_single(
        &global.output,
        &result,
        |r| {
            output::detail_block(&[
                ("Account", r.account.to_owned()),
                ("Role", output::cell(r.role)),
                ("Token", if r.token_issued { "issued" } else { "none" }.into()),
            ])
        },
        |r| r.account.to_owned(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
