//! SaveVault API client.
//!
//! Async HTTP client using `reqwest` with Bearer token authentication.

use std::path::{Path, PathBuf};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Method, RequestBuilder};
use serde_json::Value;
use tracing::{debug, info, warn};

use savevault_protocol::lenient::{decode_or_default, from_value_or_default};
use savevault_protocol::{Ack, GameRequest, NewSave, SaveUpdate};

use crate::error::ApiError;
use crate::session::Session;

/// Characters left as-is in a path segment.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// SaveVault API client.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl Client {
    /// Creates a client for the service at `base_url`.
    ///
    /// `session` is read on every request, so token changes take effect
    /// without rebuilding the client.
    pub fn new(base_url: impl Into<String>, session: Session) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    /// The session this client authenticates with.
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attaches the session's bearer token, if there is one.
    ///
    /// Without a token the request goes out unauthenticated and the server
    /// decides.
    fn authorize(&self, req: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        match self.session.token() {
            Some(token) => {
                let value = HeaderValue::from_str(&format!("Bearer {token}"))
                    .map_err(|_| ApiError::InvalidToken)?;
                Ok(req.header(AUTHORIZATION, value))
            }
            None => Ok(req),
        }
    }

    /// Sends one request and returns the raw response body.
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        authenticated: bool,
    ) -> Result<Vec<u8>, ApiError> {
        let url = self.url(path);
        let mut req = self.http.request(method.clone(), &url);
        if authenticated {
            req = self.authorize(req)?;
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        debug!(%method, path, "sending request");
        let resp = req.send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(%method, path, status = status.as_u16(), "request failed");
            return Err(ApiError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.bytes().await.map_err(ApiError::Body)?;
        Ok(body.to_vec())
    }

    /// Performs an authenticated JSON request.
    ///
    /// A 2xx body that is empty or not JSON comes back as `Value::Null`.
    pub async fn request(
        &self,
        path: &str,
        method: Method,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let bytes = self.send(method, path, body, true).await?;
        Ok(parse_body(&bytes, path))
    }

    /// Mutating call that answers with `{success: bool}`.
    async fn ack(&self, path: &str, method: Method, body: Option<&Value>) -> Result<Ack, ApiError> {
        let value = self.request(path, method, body).await?;
        Ok(from_value_or_default(value, "ack"))
    }

    /// `GET /api/games`, unnormalized.
    pub async fn list_games(&self) -> Result<Value, ApiError> {
        self.request("/api/games", Method::GET, None).await
    }

    /// `POST /api/games`.
    pub async fn create_game(&self, req: &GameRequest) -> Result<Ack, ApiError> {
        let body = serde_json::to_value(req)?;
        self.ack("/api/games", Method::POST, Some(&body)).await
    }

    /// `PUT /api/games/{id}`.
    pub async fn update_game(&self, id: &str, req: &GameRequest) -> Result<Ack, ApiError> {
        let body = serde_json::to_value(req)?;
        let path = format!("/api/games/{}", segment(id));
        self.ack(&path, Method::PUT, Some(&body)).await
    }

    /// `DELETE /api/games/{id}`.
    pub async fn delete_game(&self, id: &str) -> Result<Ack, ApiError> {
        let path = format!("/api/games/{}", segment(id));
        self.ack(&path, Method::DELETE, None).await
    }

    /// `POST /api/games/{id}/saves`.
    pub async fn create_save(&self, game_id: &str, save: &NewSave) -> Result<Ack, ApiError> {
        let body = serde_json::to_value(save)?;
        let path = format!("/api/games/{}/saves", segment(game_id));
        self.ack(&path, Method::POST, Some(&body)).await
    }

    /// `PUT /api/saves/{id}` with only the fields set in `update`.
    pub async fn update_save(&self, save_id: &str, update: &SaveUpdate) -> Result<Ack, ApiError> {
        let body = serde_json::to_value(update)?;
        let path = format!("/api/saves/{}", segment(save_id));
        self.ack(&path, Method::PUT, Some(&body)).await
    }

    /// `DELETE /api/saves/{id}`.
    pub async fn delete_save(&self, save_id: &str) -> Result<Ack, ApiError> {
        let path = format!("/api/saves/{}", segment(save_id));
        self.ack(&path, Method::DELETE, None).await
    }

    /// Downloads a save archive into `dest_dir`.
    ///
    /// The file is named after `file_name` with any directory components
    /// stripped; an unusable name falls back to `save-<id>`. Returns the
    /// path written.
    pub async fn download_save(
        &self,
        save_id: &str,
        file_name: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf, ApiError> {
        let path = format!("/api/saves/{}/download", segment(save_id));
        let data = self.send(Method::GET, &path, None, true).await?;

        tokio::fs::create_dir_all(dest_dir).await?;
        let target = download_target(dest_dir, save_id, file_name);
        tokio::fs::write(&target, &data).await?;

        info!(save_id, path = %target.display(), bytes = data.len(), "downloaded save");
        Ok(target)
    }
}

/// Percent-encodes an id for use as one path segment.
fn segment(id: &str) -> String {
    utf8_percent_encode(id, SEGMENT).to_string()
}

fn parse_body(bytes: &[u8], path: &str) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    let text = String::from_utf8_lossy(bytes);
    decode_or_default(&text, path)
}

fn download_target(dest_dir: &Path, save_id: &str, file_name: &str) -> PathBuf {
    let name = Path::new(file_name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty() && n != "." && n != "..")
        .unwrap_or_else(|| format!("save-{save_id}"));
    dest_dir.join(name)
}
