//! IP reputation lists.
//!
//! Each list is read from a newline-delimited file the first time it is
//! queried and kept for the lifetime of the process. A missing or unreadable
//! file logs a warning and yields an empty list, so lookups answer
//! "not listed" instead of failing.

pub mod datacenter;
pub mod tor;
pub mod vpn;

pub use datacenter::{DatacenterFormat, DatacenterList};
pub use tor::{TorFormat, TorList};
pub use vpn::{VpnFormat, VpnList};

use crate::cidr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, warn};

/// How a list file is parsed and queried.
pub trait ListFormat: Send + Sync + 'static {
    /// Parsed, immutable lookup structure
    type Entries: Send + Sync + 'static;

    /// List name for logging.
    const NAME: &'static str;

    /// Parse the file content. Comment and blank lines are already removed.
    fn parse<'a>(lines: impl Iterator<Item = &'a str>) -> Self::Entries;

    /// Check an IPv4 address against the entries.
    fn contains(entries: &Self::Entries, ip: &str) -> bool;

    /// Number of loaded entries.
    fn len(entries: &Self::Entries) -> usize;
}

/// Yield trimmed lines that are neither blank nor `#` comments.
pub fn content_lines(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

/// A reputation list that is loaded on first use.
pub struct ReputationList<F: ListFormat> {
    /// Backing file
    source: Option<PathBuf>,
    /// Loaded entries, `None` until the first lookup
    entries: RwLock<Option<Arc<F::Entries>>>,
}

impl<F: ListFormat> ReputationList<F> {
    /// Create a list backed by a file. Nothing is read until the first lookup.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: Some(source.into()),
            entries: RwLock::new(None),
        }
    }

    /// Create a list with no backing source. It loads as empty.
    pub fn empty() -> Self {
        Self {
            source: None,
            entries: RwLock::new(None),
        }
    }

    /// Create a list from a source path that may be absent.
    pub fn from_optional_path(source: Option<&Path>) -> Self {
        match source {
            Some(path) => Self::new(path),
            None => Self::empty(),
        }
    }

    /// Create a list that is already loaded from in-memory content.
    pub fn from_content(content: &str) -> Self {
        let list = Self::empty();
        list.store(content);
        list
    }

    /// Returns true if the address is listed. IPv6 is never listed.
    pub fn contains(&self, ip: &str) -> bool {
        if cidr::is_ipv6(ip) {
            return false;
        }
        F::contains(&self.entries(), ip)
    }

    /// Number of loaded entries, loading the list if needed.
    pub fn len(&self) -> usize {
        F::len(&self.entries())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the list has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Replace the entries with parsed in-memory content.
    #[cfg(any(test, feature = "test-util"))]
    pub fn load_from_content(&self, content: &str) {
        self.store(content);
    }

    /// Discard the loaded entries so the next lookup reloads the source.
    #[cfg(any(test, feature = "test-util"))]
    pub fn reset(&self) {
        *self.entries.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn store(&self, content: &str) {
        let parsed = Arc::new(F::parse(content_lines(content)));
        *self.entries.write().unwrap_or_else(PoisonError::into_inner) = Some(parsed);
    }

    /// Loaded entries, loading exactly once under concurrent first access.
    pub(crate) fn entries(&self) -> Arc<F::Entries> {
        if let Some(entries) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return Arc::clone(entries);
        }

        let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        // Another thread may have loaded while we waited for the write lock
        if let Some(entries) = guard.as_ref() {
            return Arc::clone(entries);
        }

        let content = self.read_source();
        let entries = Arc::new(F::parse(content_lines(&content)));
        info!(
            list = F::NAME,
            entries = F::len(&entries),
            source = ?self.source,
            "Reputation list loaded"
        );
        *guard = Some(Arc::clone(&entries));
        entries
    }

    fn read_source(&self) -> String {
        let Some(path) = &self.source else {
            return String::new();
        };

        // Undecodable bytes only spoil their own line
        match std::fs::read(path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                warn!(
                    list = F::NAME,
                    path = %path.display(),
                    error = %e,
                    "Reputation list unavailable, treating as empty"
                );
                String::new()
            }
        }
    }
}

impl<F: ListFormat> std::fmt::Debug for ReputationList<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReputationList")
            .field("name", &F::NAME)
            .field("source", &self.source)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
