//! Headless SaveVault dashboard.
//!
//! Wires the API client, the game store and local storage together and
//! holds the state a dashboard front-end renders: notifications, sort
//! order, language, the open saves panel and the game/save forms.

mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod forms;
pub mod language;
pub mod sort;
pub mod toast;

#[cfg(test)]
mod test_support;

pub use config::AppConfig;
pub use dashboard::Dashboard;
pub use error::DashboardError;
pub use forms::{GameForm, SaveForm};
pub use language::Language;
pub use sort::{SortField, SortOrder};
pub use toast::{Toast, ToastKind, ToastQueue};
