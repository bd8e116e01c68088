//! Account flow: register, login, session restore, logout.

use tracing::{info, warn};

use savevault_protocol::Credentials;
use savevault_storage::token::{clear_token, save_token};

use crate::dashboard::{Dashboard, lock};
use crate::error::DashboardError;

const PASSWORD_MISMATCH: &str = "Passwords do not match";
const INVALID_TOKEN: &str = "Invalid token";

impl Dashboard {
    pub fn is_authenticated(&self) -> bool {
        self.client.session().is_authenticated()
    }

    /// User record returned by the last successful verification.
    pub fn user(&self) -> Option<serde_json::Value> {
        lock(&self.user).clone()
    }

    /// Creates an account. Does not log in.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<(), DashboardError> {
        if password != confirm_password {
            self.toasts().error(PASSWORD_MISMATCH);
            return Err(DashboardError::Validation(PASSWORD_MISMATCH.into()));
        }

        let credentials = Credentials {
            username: username.into(),
            password: password.into(),
        };
        match self.client.register(&credentials).await {
            Ok(()) => {
                self.toasts().success("Registration successful! Please login.");
                Ok(())
            }
            Err(e) => {
                warn!(username, error = %e, "registration failed");
                let text = e
                    .server_message()
                    .unwrap_or_else(|| "Registration failed".into());
                self.toasts().error(text.clone());
                Err(DashboardError::Auth(text))
            }
        }
    }

    /// Logs in, persists the token and verifies it.
    ///
    /// A token that does not verify is discarded again.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), DashboardError> {
        let credentials = Credentials {
            username: username.into(),
            password: password.into(),
        };
        let token = match self.client.login(&credentials).await {
            Ok(resp) => resp.token,
            Err(e) => {
                warn!(username, error = %e, "login failed");
                let text = e.server_message().unwrap_or_else(|| "Login failed".into());
                self.toasts().error(text.clone());
                return Err(DashboardError::Auth(text));
            }
        };

        self.client.session().set_token(token.as_str());
        if let Err(e) = save_token(self.kv.as_ref(), &token) {
            warn!(error = %e, "could not persist session token");
        }

        match self.client.verify().await {
            Ok(resp) if resp.valid => {
                *lock(&self.user) = resp.user;
                info!(username, "login verified");
                self.toasts().success("Login successful!");
                Ok(())
            }
            outcome => {
                if let Err(e) = outcome {
                    warn!(error = %e, "token verification failed");
                }
                self.forget_session();
                self.toasts().error(INVALID_TOKEN);
                Err(DashboardError::Auth(INVALID_TOKEN.into()))
            }
        }
    }

    /// Verifies the current token. An invalid token, or a failed check,
    /// clears it. Returns whether a verified session is active.
    pub async fn restore_session(&self) -> bool {
        if !self.is_authenticated() {
            return false;
        }
        match self.client.verify().await {
            Ok(resp) if resp.valid => {
                *lock(&self.user) = resp.user;
                info!("session restored");
                true
            }
            Ok(_) => {
                warn!("stored token is no longer valid");
                self.forget_session();
                false
            }
            Err(e) => {
                warn!(error = %e, "could not verify stored token");
                self.forget_session();
                false
            }
        }
    }

    /// Ends the session and removes the persisted token.
    pub fn logout(&self) -> Result<(), DashboardError> {
        self.close_saves();
        self.client.session().clear();
        *lock(&self.user) = None;
        clear_token(self.kv.as_ref())?;
        info!("logged out");
        Ok(())
    }

    fn forget_session(&self) {
        self.client.session().clear();
        *lock(&self.user) = None;
        if let Err(e) = clear_token(self.kv.as_ref()) {
            warn!(error = %e, "could not clear persisted token");
        }
    }
}
