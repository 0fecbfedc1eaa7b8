//! Project linking for the current directory

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::services::{ClientFactory, CredentialStore};
use crate::application::ApplicationResult;
use crate::domain::{resource_id, Project, ProjectLink};

/// Links the working directory to a remote project.
pub struct ProjectService {
    factory: Arc<ClientFactory>,
    credentials: Arc<CredentialStore>,
}

impl ProjectService {
    pub fn new(factory: Arc<ClientFactory>, credentials: Arc<CredentialStore>) -> Self {
        Self {
            factory,
            credentials,
        }
    }

    /// Verify the project exists remotely, then write the link marker.
    #[instrument(skip(self))]
    pub fn link(&self, project_id: &str) -> ApplicationResult<Project> {
        let project_id = resource_id("project id", project_id)?;
        let project = self.factory.client()?.get_project(project_id)?;
        self.credentials.write_project_link(project_id)?;
        debug!("link: linked {} (service id {})", project_id, project.id);
        Ok(project)
    }

    /// Remove the link marker. Returns the link that was removed, if any.
    pub fn unlink(&self) -> ApplicationResult<Option<ProjectLink>> {
        let existing = self.credentials.read_project_link().ok().flatten();
        self.credentials.remove_project_link()?;
        Ok(existing)
    }

    pub fn linked(&self) -> ApplicationResult<Option<ProjectLink>> {
        self.credentials.read_project_link()
    }
}
