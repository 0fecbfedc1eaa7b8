//! File collector for seeding chats
//!
//! Expands glob patterns below a root directory and reads the matches as text.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use glob::{MatchOptions, Pattern};
use tracing::{debug, warn};

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{is_excluded, DomainError, SourceFile};
use crate::infrastructure::traits::FileSystem;

/// Collects files matching glob patterns, relative to `root`.
pub struct FileCollector {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
}

impl FileCollector {
    pub fn new(fs: Arc<dyn FileSystem>, root: PathBuf) -> Self {
        Self { fs, root }
    }

    /// Expand `patterns` and read every surviving file.
    ///
    /// Paths are deduplicated across patterns (first occurrence wins) and
    /// anything below `node_modules/` or `.git/` is dropped. A pattern that
    /// matches nothing is not an error here.
    pub fn collect(&self, patterns: &[String]) -> ApplicationResult<Vec<SourceFile>> {
        let mut seen: HashSet<PathBuf> = HashSet::new();
        let mut files = Vec::new();

        for pattern in patterns {
            for path in self.expand(pattern)? {
                let name = self.display_name(&path);
                if is_excluded(&name) || !self.fs.is_file(&path) {
                    continue;
                }
                if !seen.insert(path.clone()) {
                    continue;
                }
                let content = self
                    .fs
                    .read_to_string(&path)
                    .with_path_context("read file", &path)?;
                files.push(SourceFile { name, content });
            }
        }

        debug!("collect: {} files from {} patterns", files.len(), patterns.len());
        Ok(files)
    }

    fn expand(&self, pattern: &str) -> ApplicationResult<Vec<PathBuf>> {
        let full = if Path::new(pattern).is_absolute() {
            pattern.to_string()
        } else {
            let root = Pattern::escape(&self.root.to_string_lossy());
            format!("{}/{}", root.trim_end_matches('/'), pattern.trim_start_matches("./"))
        };

        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };
        let entries = glob::glob_with(&full, options).map_err(|e| DomainError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.msg.to_string(),
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) => paths.push(path),
                Err(e) => warn!("skipping unreadable path {}: {}", e.path().display(), e),
            }
        }
        Ok(paths)
    }

    /// Root-relative, `/`-separated name; absolute paths outside root stay as given.
    fn display_name(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                Component::RootDir => Some(String::new()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}
