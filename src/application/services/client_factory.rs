//! API client factory
//!
//! Resolves the API key and builds an authenticated client handle.

use std::sync::Arc;

use tracing::debug;

use crate::application::services::CredentialStore;
use crate::application::{ApplicationError, ApplicationResult};
use crate::infrastructure::traits::{ApiConnector, ChatApi};

/// Environment variable supplying the API key. Wins over the stored config.
pub const API_KEY_ENV: &str = "CHATCTL_API_KEY";

/// Where the API key of this invocation comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Environment,
    Config,
}

impl std::fmt::Display for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeySource::Environment => write!(f, "environment ({})", API_KEY_ENV),
            KeySource::Config => write!(f, "config file"),
        }
    }
}

/// Builds clients; never caches them across calls.
pub struct ClientFactory {
    credentials: Arc<CredentialStore>,
    connector: Arc<dyn ApiConnector>,
    env_api_key: Option<String>,
}

impl ClientFactory {
    /// `env_api_key` is the value of `API_KEY_ENV` captured at startup.
    pub fn new(
        credentials: Arc<CredentialStore>,
        connector: Arc<dyn ApiConnector>,
        env_api_key: Option<String>,
    ) -> Self {
        let env_api_key = env_api_key.filter(|k| !k.trim().is_empty());
        Self {
            credentials,
            connector,
            env_api_key,
        }
    }

    /// Environment first, then stored config.
    pub fn resolve_api_key(&self) -> ApplicationResult<String> {
        self.resolve()?
            .map(|(key, _)| key)
            .ok_or_else(|| ApplicationError::NotAuthenticated("no API key found".to_string()))
    }

    pub fn key_source(&self) -> ApplicationResult<Option<KeySource>> {
        Ok(self.resolve()?.map(|(_, source)| source))
    }

    /// Authenticated client for the resolved key.
    pub fn client(&self) -> ApplicationResult<Box<dyn ChatApi>> {
        let key = self.resolve_api_key()?;
        self.connect(&key)
    }

    /// Client for an explicit key, bypassing resolution.
    pub fn connect(&self, api_key: &str) -> ApplicationResult<Box<dyn ChatApi>> {
        Ok(self.connector.connect(api_key)?)
    }

    fn resolve(&self) -> ApplicationResult<Option<(String, KeySource)>> {
        if let Some(key) = &self.env_api_key {
            debug!("resolve: using {}", API_KEY_ENV);
            return Ok(Some((key.clone(), KeySource::Environment)));
        }
        let stored = self
            .credentials
            .read_config()?
            .api_key
            .filter(|k| !k.trim().is_empty());
        debug!("resolve: stored key present={}", stored.is_some());
        Ok(stored.map(|key| (key, KeySource::Config)))
    }
}
