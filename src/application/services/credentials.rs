//! Credential & link store
//!
//! Typed access to the persisted credential config and the per-directory
//! project link, serialized as JSON through a `KeyValueStore`.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{CredentialConfig, ProjectLink};
use crate::infrastructure::traits::{KeyValueStore, StoreKey};

/// Reads and writes the credential config and project link documents.
///
/// No locking: concurrent invocations racing on the same file are not
/// guaranteed a consistent result.
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored config, or an empty default when nothing is stored.
    pub fn read_config(&self) -> ApplicationResult<CredentialConfig> {
        Ok(self.read_json(StoreKey::Config)?.unwrap_or_default())
    }

    /// Overwrite the stored config, creating its directory on first write.
    pub fn write_config(&self, config: &CredentialConfig) -> ApplicationResult<()> {
        self.write_json(StoreKey::Config, config)
    }

    pub fn read_project_link(&self) -> ApplicationResult<Option<ProjectLink>> {
        self.read_json(StoreKey::ProjectLink)
    }

    pub fn write_project_link(&self, project_id: &str) -> ApplicationResult<()> {
        let link = ProjectLink {
            project_id: project_id.to_string(),
        };
        self.write_json(StoreKey::ProjectLink, &link)
    }

    /// Delete the link marker. No-op when absent.
    pub fn remove_project_link(&self) -> ApplicationResult<()> {
        debug!("remove_project_link");
        self.store
            .delete(StoreKey::ProjectLink)
            .with_context(format!("remove {}", self.location(StoreKey::ProjectLink)))
    }

    pub fn location(&self, key: StoreKey) -> String {
        self.store.location(key)
    }

    fn read_json<T: DeserializeOwned>(&self, key: StoreKey) -> ApplicationResult<Option<T>> {
        let location = self.location(key);
        let Some(content) = self
            .store
            .get(key)
            .with_context(format!("read {}", location))?
        else {
            debug!("read_json: nothing stored at {}", location);
            return Ok(None);
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| ApplicationError::Parse {
                location,
                message: e.to_string(),
            })
    }

    fn write_json<T: Serialize>(&self, key: StoreKey, value: &T) -> ApplicationResult<()> {
        let location = self.location(key);
        debug!("write_json: {}", location);
        let content =
            serde_json::to_string_pretty(value).map_err(|e| ApplicationError::OperationFailed {
                context: format!("serialize {}", location),
                source: Box::new(e),
            })?;
        self.store
            .set(key, &format!("{content}\n"))
            .with_context(format!("write {}", location))
    }
}
