//! Application configuration.
//!
//! Read from `<config dir>/savevault/config.json`; `SAVEVAULT_API_BASE` and
//! `SAVEVAULT_DATA_DIR` override the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Remote service used when nothing else is configured.
pub const DEFAULT_API_BASE: &str = "https://save-vault.zepedrofernandessampaio.workers.dev";

const API_BASE_ENV: &str = "SAVEVAULT_API_BASE";
const DATA_DIR_ENV: &str = "SAVEVAULT_DATA_DIR";

/// On-disk shape; every field optional.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    api_base: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    data_dir: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Base URL for every endpoint, auth and download included.
    pub api_base: String,

    /// Directory of the persistent key-value store.
    pub data_dir: PathBuf,
}

impl AppConfig {
    /// Built-in defaults rooted at `base_dir`.
    pub fn defaults_in(base_dir: &Path) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.into(),
            data_dir: base_dir.join("savevault").join("data"),
        }
    }

    /// Loads from the user config directory and the process environment.
    pub fn load() -> anyhow::Result<Self> {
        let base = config_base_dir()?;
        Self::load_from(&base, |key| std::env::var(key).ok())
    }

    /// Loads `<base_dir>/savevault/config.json`, then applies overrides
    /// from `env`.
    pub fn load_from(
        base_dir: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let mut config = Self::defaults_in(base_dir);

        let path = config_path(base_dir);
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            match serde_json::from_str::<ConfigFile>(&content) {
                Ok(file) => {
                    if !file.api_base.is_empty() {
                        config.api_base = file.api_base;
                    }
                    if !file.data_dir.is_empty() {
                        config.data_dir = PathBuf::from(file.data_dir);
                    }
                }
                Err(e) => tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config, using defaults"
                ),
            }
        }

        if let Some(api_base) = env(API_BASE_ENV).filter(|v| !v.is_empty()) {
            config.api_base = api_base;
        }
        if let Some(data_dir) = env(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            config.data_dir = PathBuf::from(data_dir);
        }

        tracing::debug!(
            api_base = %config.api_base,
            data_dir = %config.data_dir.display(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Writes the configuration to the user config directory.
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&config_base_dir()?)
    }

    pub fn save_to(&self, base_dir: &Path) -> anyhow::Result<()> {
        let path = config_path(base_dir);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = ConfigFile {
            api_base: self.api_base.clone(),
            data_dir: self.data_dir.to_string_lossy().into_owned(),
        };
        std::fs::write(&path, serde_json::to_string_pretty(&file)?)?;
        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }
}

fn config_path(base_dir: &Path) -> PathBuf {
    base_dir.join("savevault").join("config.json")
}

/// Per-user configuration root.
pub fn config_base_dir() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        let appdata = std::env::var("APPDATA")
            .map_err(|_| anyhow::anyhow!("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata))
    }

    #[cfg(not(target_os = "windows"))]
    {
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            if !xdg.is_empty() {
                return Ok(PathBuf::from(xdg));
            }
        }
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME is not set"))?;
        Ok(PathBuf::from(home).join(".config"))
    }
}
