//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/chatctl/chatctl.toml`
//! 3. Environment variables: `CHATCTL_*` prefix
//!
//! The API key is not a setting; it lives in the credential store.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// File name of the per-directory project link.
pub const LINK_FILE_NAME: &str = ".chatctl.json";

/// File name of the credential config inside the config directory.
pub const CREDENTIALS_FILE_NAME: &str = "config.json";

const DEFAULT_API_URL: &str = "https://api.v0.dev/v1";
const DEFAULT_WEB_URL: &str = "https://v0.dev";

/// Unified configuration for chatctl.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the remote API
    pub api_url: String,
    /// Base URL chats are viewed at (`<web_url>/chat/<id>`)
    pub web_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            web_url: DEFAULT_WEB_URL.to_string(),
        }
    }
}

/// Raw settings for intermediate parsing (None = not specified).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    api_url: Option<String>,
    web_url: Option<String>,
}

/// Get the XDG config directory for chatctl.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "chatctl").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global settings file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("chatctl.toml"))
}

/// Get the path to the credential config file.
pub fn credentials_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join(CREDENTIALS_FILE_NAME))
}

/// Get the path to the project link file in a directory.
pub fn link_path(dir: &Path) -> PathBuf {
    dir.join(LINK_FILE_NAME)
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

/// Load a TOML file into RawSettings.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Load settings from defaults, the global file and the environment.
    pub fn load() -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref())
    }

    /// Load settings with an explicit settings file (skipped when absent).
    pub fn load_from(settings_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(path) = settings_file {
            if path.exists() {
                let raw = load_raw_settings(path)?;
                current = current.apply(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.validate()?;
        Ok(current)
    }

    fn apply(&self, raw: &RawSettings) -> Self {
        Self {
            api_url: raw.api_url.clone().unwrap_or_else(|| self.api_url.clone()),
            web_url: raw.web_url.clone().unwrap_or_else(|| self.web_url.clone()),
        }
    }

    /// Apply CHATCTL_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("CHATCTL").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("api_url") {
            settings.api_url = val;
        }
        if let Ok(val) = config.get_string("web_url") {
            settings.web_url = val;
        }
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        for (name, value) in [("api_url", &self.api_url), ("web_url", &self.web_url)] {
            if !(value.starts_with("https://") || value.starts_with("http://")) {
                return Err(ApplicationError::Config {
                    message: format!("{name} must be an http(s) URL, got '{value}'"),
                });
            }
        }
        Ok(())
    }
}
