//! Notes file and to-do list
//!
//! Both are plain UTF-8 text files: notes are append-only lines of
//! `[YYYY-MM-DD HH:MM:SS] text`, the to-do list holds one task per line.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::Result;

/// Timestamp format for note lines
const NOTE_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

/// Append-only notes file
#[derive(Debug, Clone)]
pub struct NotesFile {
    path: PathBuf,
}

impl NotesFile {
    /// Notes stored at `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the notes file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a timestamped note
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written
    pub fn append(&self, content: &str) -> Result<()> {
        let timestamp = chrono::Local::now().format(NOTE_TIMESTAMP);
        append_line(&self.path, &format!("[{timestamp}] {content}"))?;
        tracing::debug!(path = %self.path.display(), "note saved");
        Ok(())
    }

    /// The last `count` notes, oldest first
    ///
    /// Returns `None` if no notes file exists yet.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read
    pub fn recent(&self, count: usize) -> Result<Option<Vec<String>>> {
        let Some(lines) = read_lines(&self.path)? else {
            return Ok(None);
        };
        let skip = lines.len().saturating_sub(count);
        Ok(Some(lines.into_iter().skip(skip).collect()))
    }
}

/// Line-per-task to-do list
#[derive(Debug, Clone)]
pub struct TodoList {
    path: PathBuf,
}

impl TodoList {
    /// To-do list stored at `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append a task
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written
    pub fn add(&self, task: &str) -> Result<()> {
        append_line(&self.path, task)
    }

    /// All tasks, or `None` if there is no list yet
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read
    pub fn tasks(&self) -> Result<Option<Vec<String>>> {
        read_lines(&self.path)
    }
}

fn append_line(path: &Path, line: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")?;
    Ok(())
}

fn read_lines(path: &Path) -> Result<Option<Vec<String>>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(
            content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(ToString::to_string)
                .collect(),
        )),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
