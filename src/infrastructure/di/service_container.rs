//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::services::{
    AuthService, ChatService, ClientFactory, CredentialStore, FileCollector, ProjectService,
    API_KEY_ENV,
};
use crate::config::{self, Settings};
use crate::infrastructure::api::HttpConnector;
use crate::infrastructure::traits::{
    ApiConnector, Browser, FileStore, FileSystem, KeyValueStore, Prompt, RealFileSystem,
    SystemBrowser, TerminalPrompt,
};
use crate::infrastructure::{InfraError, InfraResult};

/// I/O dependencies the services are built from.
pub struct ServiceDeps {
    pub fs: Arc<dyn FileSystem>,
    pub store: Arc<dyn KeyValueStore>,
    pub connector: Arc<dyn ApiConnector>,
    pub prompt: Arc<dyn Prompt>,
    pub browser: Arc<dyn Browser>,
    /// Root for file collection (the working directory)
    pub work_dir: PathBuf,
    /// Value of `CHATCTL_API_KEY` at startup
    pub env_api_key: Option<String>,
}

impl ServiceDeps {
    /// Real implementations bound to the process environment.
    pub fn real(settings: &Settings) -> InfraResult<Self> {
        let work_dir = std::env::current_dir()
            .map_err(|e| InfraError::io("determine current directory", e))?;
        let credentials_path = config::credentials_path().ok_or_else(|| {
            InfraError::io(
                "locate config directory",
                std::io::Error::new(std::io::ErrorKind::NotFound, "no home directory"),
            )
        })?;

        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let store = Arc::new(FileStore::new(
            fs.clone(),
            credentials_path,
            config::link_path(&work_dir),
        ));

        Ok(Self {
            fs,
            store,
            connector: Arc::new(HttpConnector::new(settings.api_url.clone())),
            prompt: Arc::new(TerminalPrompt),
            browser: Arc::new(SystemBrowser),
            work_dir,
            env_api_key: std::env::var(API_KEY_ENV).ok(),
        })
    }
}

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    pub credentials: Arc<CredentialStore>,
    pub clients: Arc<ClientFactory>,
    pub auth: AuthService,
    pub chats: ChatService,
    pub projects: ProjectService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        let deps = ServiceDeps::real(&settings)?;
        Ok(Self::with_deps(settings, deps))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, deps: ServiceDeps) -> Self {
        let settings = Arc::new(settings);

        let credentials = Arc::new(CredentialStore::new(deps.store));
        let clients = Arc::new(ClientFactory::new(
            credentials.clone(),
            deps.connector,
            deps.env_api_key,
        ));
        let collector = Arc::new(FileCollector::new(deps.fs, deps.work_dir));

        let auth = AuthService::new(credentials.clone(), clients.clone(), deps.prompt);
        let chats = ChatService::new(
            clients.clone(),
            credentials.clone(),
            collector,
            deps.browser,
            settings.web_url.clone(),
        );
        let projects = ProjectService::new(clients.clone(), credentials.clone());

        Self {
            settings,
            credentials,
            clients,
            auth,
            chats,
            projects,
        }
    }
}
