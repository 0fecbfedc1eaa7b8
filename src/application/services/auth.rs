//! Login, logout and identity

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::services::{ClientFactory, CredentialStore};
use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{CredentialConfig, DomainError, User};
use crate::infrastructure::traits::Prompt;

/// Manages the stored API key.
pub struct AuthService {
    credentials: Arc<CredentialStore>,
    factory: Arc<ClientFactory>,
    prompt: Arc<dyn Prompt>,
}

impl AuthService {
    pub fn new(
        credentials: Arc<CredentialStore>,
        factory: Arc<ClientFactory>,
        prompt: Arc<dyn Prompt>,
    ) -> Self {
        Self {
            credentials,
            factory,
            prompt,
        }
    }

    /// Prompt for a key, validate it remotely, persist it only on success.
    pub fn login(&self) -> ApplicationResult<User> {
        let key = self
            .prompt
            .read_line("Enter your API key:")
            .with_context("read API key")?;
        let key = key.trim();
        if key.is_empty() {
            return Err(DomainError::EmptyInput("API key").into());
        }

        let user = self.factory.connect(key)?.current_user()?;
        debug!("login: key validated for user {}", user.id);

        let mut config = self.credentials.read_config().unwrap_or_else(|e| {
            warn!("login: replacing unreadable config: {}", e);
            CredentialConfig::default()
        });
        config.api_key = Some(key.to_string());
        self.credentials.write_config(&config)?;
        info!("login: stored API key");
        Ok(user)
    }

    /// Remove the stored key. Returns whether one was present.
    pub fn logout(&self) -> ApplicationResult<bool> {
        let mut config = self.credentials.read_config()?;
        if config.api_key.is_none() {
            debug!("logout: no stored key");
            return Ok(false);
        }
        config.api_key = None;
        self.credentials.write_config(&config)?;
        Ok(true)
    }

    pub fn whoami(&self) -> ApplicationResult<User> {
        Ok(self.factory.client()?.current_user()?)
    }
}
