//! Recently used URLs, persisted as a small text file.
//!
//! The file holds one URL per line, most recent first, each line
//! newline-terminated. Saving a URL moves it to the front (no duplicates) and
//! truncates the list to the store's capacity; entries pushed off the end are
//! discarded. History is a convenience, never a reason to fail a request:
//! read errors yield an empty list and write errors are logged and dropped.
//! Concurrent writers are last-writer-wins.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File-backed, size-capped, move-to-front URL history.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    capacity: usize,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity: capacity.max(1),
        }
    }

    /// `<data dir>/ocr2md/history.txt`, falling back to the home directory
    /// and then the temp directory when no data directory is known.
    pub fn default_path() -> PathBuf {
        let base = dirs::data_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .unwrap_or_else(std::env::temp_dir);
        base.join("ocr2md").join("history.txt")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Load the stored URLs, most recent first.
    ///
    /// A missing or unreadable file is an empty history.
    pub async fn load(&self) -> Vec<String> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => parse(&content, self.capacity),
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!("Could not read history file {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    /// Record `url` as the most recent entry and return the updated list.
    ///
    /// The list is returned even when persisting it failed.
    pub async fn save(&self, url: &str) -> Vec<String> {
        let entries = push_front(self.load().await, url, self.capacity);
        if let Err(e) = self.persist(&entries).await {
            warn!("Could not write history file {}: {}", self.path.display(), e);
        }
        entries
    }

    /// Write via a sibling temp file and rename, so readers never see a
    /// half-written file.
    async fn persist(&self, entries: &[String]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut content = String::new();
        for entry in entries {
            content.push_str(entry);
            content.push('\n');
        }

        let tmp_path = self.path.with_extension("tmp");
        tokio::fs::write(&tmp_path, content).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        debug!("History saved ({} entries)", entries.len());
        Ok(())
    }
}

/// Move-to-front insert followed by truncation.
///
/// A blank `url` leaves the list unchanged.
pub fn push_front(mut entries: Vec<String>, url: &str, capacity: usize) -> Vec<String> {
    let url = url.trim();
    if url.is_empty() {
        return entries;
    }
    entries.retain(|e| e != url);
    entries.insert(0, url.to_string());
    entries.truncate(capacity);
    entries
}

fn parse(content: &str, capacity: usize) -> Vec<String> {
    let mut entries: Vec<String> = Vec::new();
    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if !entries.iter().any(|e| e == line) {
            entries.push(line.to_string());
        }
    }
    entries.truncate(capacity);
    entries
}
