//! Where the prediction service lives.
//!
//! On the web the page is served by the prediction service itself, so the
//! endpoint stays origin-relative. Desktop builds talk to an absolute origin:
//! the service's dev address by default, then `settings.toml` in the platform
//! config dir, then `BUGSIFT_ENDPOINT`.

use serde::Deserialize;
use thiserror::Error;

/// Origin the desktop build targets when nothing else is configured.
pub const DEFAULT_DESKTOP_ENDPOINT: &str = "http://127.0.0.1:8000";

/// Environment override for the service origin (desktop only).
pub const ENDPOINT_ENV: &str = "BUGSIFT_ENDPOINT";

/// File name looked up in the platform config dir (desktop only).
pub const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid settings file: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Service origin, e.g. `http://127.0.0.1:8000`. Empty means same origin.
    pub endpoint: String,
}

impl Default for Settings {
    fn default() -> Self {
        if cfg!(target_arch = "wasm32") {
            Self {
                endpoint: String::new(),
            }
        } else {
            Self {
                endpoint: DEFAULT_DESKTOP_ENDPOINT.to_string(),
            }
        }
    }
}

impl Settings {
    /// Full URL of the predict endpoint.
    pub fn predict_url(&self) -> String {
        format!("{}{}", self.endpoint.trim_end_matches('/'), api::PREDICT_PATH)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, SettingsError> {
        #[cfg(not(target_arch = "wasm32"))]
        {
            toml::from_str(raw).map_err(|err| SettingsError::Parse(err.to_string()))
        }
        #[cfg(target_arch = "wasm32")]
        {
            let _ = raw;
            Err(SettingsError::Parse(
                "settings files are not supported on the web".to_string(),
            ))
        }
    }

    /// Resolve settings for the running platform. Never fails; problems with
    /// the settings file are logged and the defaults kept.
    pub fn load() -> Self {
        let mut settings = Self::default();

        #[cfg(not(target_arch = "wasm32"))]
        {
            match native::read_file() {
                Ok(Some(from_file)) => settings = from_file,
                Ok(None) => {}
                Err(err) => tracing::warn!(%err, "ignoring settings file"),
            }
            if let Some(endpoint) = native::env_override() {
                settings.endpoint = endpoint;
            }
        }

        tracing::debug!(endpoint = %settings.endpoint, "settings resolved");
        settings
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use directories::ProjectDirs;

    use super::{Settings, SettingsError, ENDPOINT_ENV, SETTINGS_FILE};

    pub(super) fn settings_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "Bugsift", "bugsift")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
    }

    pub(super) fn read_file() -> Result<Option<Settings>, SettingsError> {
        let Some(path) = settings_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&path).map_err(|source| SettingsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Settings::from_toml_str(&raw).map(Some)
    }

    pub(super) fn env_override() -> Option<String> {
        std::env::var(ENDPOINT_ENV)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}
