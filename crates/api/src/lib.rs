//! HTTP client for the SaveVault remote API.
//!
//! Every call is a single attempt: no retries, no timeouts beyond the
//! transport's own. The bearer token comes from an explicit [`Session`]
//! handed to the [`Client`] at construction and refreshed on login/logout.

mod auth;
pub mod client;
pub mod error;
pub mod session;

#[cfg(test)]
mod test_support;

pub use client::Client;
pub use error::ApiError;
pub use reqwest::Method;
pub use session::Session;
