//! Request and response bodies for the remote API endpoints.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/auth/register` and `POST /api/auth/login`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Successful `POST /api/auth/login` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// `GET /verify` response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VerifyResponse {
    #[serde(default)]
    pub valid: bool,
    /// User record; its shape is owned by the server.
    #[serde(default)]
    pub user: Option<serde_json::Value>,
}

/// Error body the auth endpoints send with a non-2xx status.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// `{success: bool}` acknowledgement returned by every mutating endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: bool,
}

/// Body of `POST /api/games` and `PUT /api/games/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRequest {
    pub name: String,
    pub cover_image: String,
}

/// Body of `POST /api/games/{id}/saves`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSave {
    pub name: String,
    pub file_name: String,
    pub file_data: String,
    pub description: String,
}

/// Partial body of `PUT /api/saves/{id}`. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SaveUpdate {
    /// True when no field would be sent.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.file_name.is_none()
            && self.file_data.is_none()
            && self.description.is_none()
    }
}
