// Authentication endpoint.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{LoginRequest, Session, SessionResponse};

impl ApiClient {
    /// Authenticate a front-desk or manager account.
    ///
    /// `POST /login` with `{account, password}`. Rejected credentials
    /// surface as [`Error::Unauthorized`]. The returned [`Session`] is not
    /// retained by the client; pass its token into a new
    /// [`TransportConfig`](crate::TransportConfig) if the backend requires it.
    pub async fn login(&self, account: &str, password: &SecretString) -> Result<Session, Error> {
        if account.trim().is_empty() {
            return Err(Error::validation("account must not be empty"));
        }

        debug!(account, "logging in");
        let body = LoginRequest {
            account,
            password: password.expose_secret(),
        };
        let resp: SessionResponse = self.post(&["login"], &body).await?;

        debug!("login successful");
        Ok(Session::from_response(account, resp))
    }
}
