//! Account endpoints: register, login, token verification.

use reqwest::Method;
use tracing::info;

use savevault_protocol::lenient::decode_or_default;
use savevault_protocol::{Credentials, LoginResponse, VerifyResponse};

use crate::client::Client;
use crate::error::ApiError;

impl Client {
    /// `POST /api/auth/register`. Sent without a token.
    pub async fn register(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let body = serde_json::to_value(credentials)?;
        self.send(Method::POST, "/api/auth/register", Some(&body), false)
            .await?;
        info!(username = %credentials.username, "registered account");
        Ok(())
    }

    /// `POST /api/auth/login`. Sent without a token.
    ///
    /// Does not touch the session; storing the returned token is the
    /// caller's decision.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let body = serde_json::to_value(credentials)?;
        let bytes = self
            .send(Method::POST, "/api/auth/login", Some(&body), false)
            .await?;
        let resp: LoginResponse = serde_json::from_slice(&bytes)?;
        info!(username = %credentials.username, "logged in");
        Ok(resp)
    }

    /// `GET /verify` with the session token.
    ///
    /// A 2xx body that does not parse reads as `valid: false`.
    pub async fn verify(&self) -> Result<VerifyResponse, ApiError> {
        let bytes = self.send(Method::GET, "/verify", None, true).await?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(decode_or_default(&text, "verify response"))
    }
}
