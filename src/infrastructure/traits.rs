//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with mock implementations.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use dialoguer::theme::ColorfulTheme;
use dialoguer::Password;

use crate::domain::{Chat, ChatInit, ChatQuery, ChatResponse, NewChat, Project, User};
use crate::infrastructure::api::ApiResult;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a file.
    fn is_file(&self, path: &Path) -> bool;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Remove a file.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()>;
}

/// Keys of the small JSON documents the CLI persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    /// Per-user credential config
    Config,
    /// Per-directory project link marker
    ProjectLink,
}

/// Key-value store for persisted documents.
///
/// `get` returns `None` when nothing is stored; `delete` of a missing key is a no-op.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: StoreKey) -> io::Result<Option<String>>;

    fn set(&self, key: StoreKey, content: &str) -> io::Result<()>;

    fn delete(&self, key: StoreKey) -> io::Result<()>;

    /// Where the document lives, for diagnostics.
    fn location(&self, key: StoreKey) -> String;
}

/// Reads one line of interactive input.
pub trait Prompt: Send + Sync {
    /// Show `message` and return the entered line without its trailing newline.
    fn read_line(&self, message: &str) -> io::Result<String>;
}

/// Opens URLs in the user's browser.
pub trait Browser: Send + Sync {
    fn open(&self, url: &str) -> io::Result<()>;
}

/// Operations consumed from the remote chat service.
pub trait ChatApi: Send + Sync {
    fn current_user(&self) -> ApiResult<User>;

    fn create_chat(&self, request: &NewChat) -> ApiResult<ChatResponse>;

    fn list_chats(&self, query: &ChatQuery) -> ApiResult<Vec<Chat>>;

    fn delete_chat(&self, id: &str) -> ApiResult<()>;

    fn init_chat(&self, request: &ChatInit) -> ApiResult<Chat>;

    fn send_message(&self, chat_id: &str, message: &str) -> ApiResult<Chat>;

    fn get_project(&self, id: &str) -> ApiResult<Project>;
}

/// Constructs authenticated `ChatApi` handles.
pub trait ApiConnector: Send + Sync {
    fn connect(&self, api_key: &str) -> ApiResult<Box<dyn ChatApi>>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                self.create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

/// File-backed store: one JSON file per key.
pub struct FileStore {
    fs: Arc<dyn FileSystem>,
    config_path: PathBuf,
    link_path: PathBuf,
}

impl FileStore {
    pub fn new(fs: Arc<dyn FileSystem>, config_path: PathBuf, link_path: PathBuf) -> Self {
        Self {
            fs,
            config_path,
            link_path,
        }
    }

    fn path(&self, key: StoreKey) -> &Path {
        match key {
            StoreKey::Config => &self.config_path,
            StoreKey::ProjectLink => &self.link_path,
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: StoreKey) -> io::Result<Option<String>> {
        let path = self.path(key);
        if !self.fs.is_file(path) {
            return Ok(None);
        }
        self.fs.read_to_string(path).map(Some)
    }

    fn set(&self, key: StoreKey, content: &str) -> io::Result<()> {
        let path = self.path(key);
        self.fs.ensure_parent(path)?;
        self.fs.write(path, content)
    }

    fn delete(&self, key: StoreKey) -> io::Result<()> {
        let path = self.path(key);
        if self.fs.exists(path) {
            self.fs.remove_file(path)?;
        }
        Ok(())
    }

    fn location(&self, key: StoreKey) -> String {
        self.path(key).display().to_string()
    }
}

/// In-memory store, used in place of the file store in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<StoreKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> io::Result<std::sync::MutexGuard<'_, HashMap<StoreKey, String>>> {
        self.entries
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "memory store poisoned"))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: StoreKey) -> io::Result<Option<String>> {
        Ok(self.entries()?.get(&key).cloned())
    }

    fn set(&self, key: StoreKey, content: &str) -> io::Result<()> {
        self.entries()?.insert(key, content.to_string());
        Ok(())
    }

    fn delete(&self, key: StoreKey) -> io::Result<()> {
        self.entries()?.remove(&key);
        Ok(())
    }

    fn location(&self, key: StoreKey) -> String {
        format!("memory:{key:?}")
    }
}

/// Hidden-input prompt on the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn read_line(&self, message: &str) -> io::Result<String> {
        Password::with_theme(&ColorfulTheme::default())
            .with_prompt(message)
            .allow_empty_password(true)
            .interact()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}

/// Real browser implementation using the platform's URL opener.
#[derive(Debug, Default)]
pub struct SystemBrowser;

impl Browser for SystemBrowser {
    fn open(&self, url: &str) -> io::Result<()> {
        use std::process::{Command, Stdio};

        let mut command = if cfg!(target_os = "macos") {
            let mut c = Command::new("open");
            c.arg(url);
            c
        } else if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.args(["/C", "start", "", url]);
            c
        } else {
            let mut c = Command::new("xdg-open");
            c.arg(url);
            c
        };

        let status = command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;

        if status.success() {
            Ok(())
        } else {
            Err(io::Error::new(
                io::ErrorKind::Other,
                format!("browser opener exited with status: {}", status),
            ))
        }
    }
}
