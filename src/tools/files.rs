//! Workspace file operations
//!
//! Folder and file names come from speech, so every name is resolved inside
//! the configured workspace and names that would escape it are rejected.

use std::collections::VecDeque;
use std::path::{Component, Path, PathBuf};

use crate::{Error, Result};

/// Maximum matches returned by [`FileManager::search`]
pub const MAX_SEARCH_RESULTS: usize = 10;

/// Maximum directory depth searched
const MAX_SEARCH_DEPTH: usize = 8;

/// File operations confined to a workspace directory
#[derive(Debug, Clone)]
pub struct FileManager {
    root: PathBuf,
}

impl FileManager {
    /// Operate inside `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Workspace root
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a spoken name inside the workspace
    ///
    /// # Errors
    ///
    /// Returns error if the name is empty, absolute or climbs out of the workspace
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("empty name".to_string()));
        }

        let relative = Path::new(name);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(Error::InvalidInput(format!(
                "name must stay inside the workspace: {name}"
            )));
        }

        Ok(self.root.join(relative))
    }

    /// Create a folder (and missing parents)
    ///
    /// # Errors
    ///
    /// Returns error if the name is rejected or the folder cannot be created
    pub fn create_folder(&self, name: &str) -> Result<PathBuf> {
        let path = self.resolve(name)?;
        std::fs::create_dir_all(&path)?;
        tracing::info!(path = %path.display(), "folder created");
        Ok(path)
    }

    /// Create an empty file, truncating an existing one
    ///
    /// # Errors
    ///
    /// Returns error if the name is rejected or the file cannot be written
    pub fn create_file(&self, name: &str) -> Result<PathBuf> {
        let path = self.resolve(name)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, "")?;
        tracing::info!(path = %path.display(), "file created");
        Ok(path)
    }

    /// Files whose name contains `pattern` (case-insensitive)
    ///
    /// Breadth-first, hidden entries skipped, at most [`MAX_SEARCH_RESULTS`].
    ///
    /// # Errors
    ///
    /// Returns error if the pattern is empty or the workspace cannot be read
    pub fn search(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let pattern = pattern.trim().to_lowercase();
        if pattern.is_empty() {
            return Err(Error::InvalidInput("empty search pattern".to_string()));
        }

        let mut matches = Vec::new();
        let mut queue = VecDeque::from([(self.root.clone(), 0_usize)]);

        while let Some((dir, depth)) = queue.pop_front() {
            let entries = match std::fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) if depth == 0 => return Err(e.into()),
                Err(e) => {
                    tracing::trace!(dir = %dir.display(), error = %e, "skipping unreadable dir");
                    continue;
                }
            };

            let mut entries: Vec<_> = entries.filter_map(std::result::Result::ok).collect();
            entries.sort_by_key(std::fs::DirEntry::file_name);

            for entry in entries {
                let name = entry.file_name().to_string_lossy().to_lowercase();
                if name.starts_with('.') {
                    continue;
                }

                let path = entry.path();
                if entry.file_type().is_ok_and(|t| t.is_dir()) {
                    if depth + 1 < MAX_SEARCH_DEPTH {
                        queue.push_back((path, depth + 1));
                    }
                } else if name.contains(&pattern) {
                    matches.push(path);
                    if matches.len() == MAX_SEARCH_RESULTS {
                        return Ok(matches);
                    }
                }
            }
        }

        Ok(matches)
    }
}
