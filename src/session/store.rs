//! Persisted session record
//!
//! One JSON record per installation holding the cached bearer token. The
//! record is external, cross-process shared state: concurrent invocations
//! racing to read-then-write may overwrite each other, and last write wins.
//! Loading is defensive: corruption or I/O failure degrades to "no cached
//! token", never to an error.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// On-disk record shape: `{"value": <token or null>}`
#[derive(Debug, Default, Serialize, Deserialize)]
struct TokenRecord {
    value: Option<String>,
}

/// File-backed persistence surface for the bearer credential.
///
/// The store has no mutation rights of its own; the token manager owns the
/// credential and the store only reads and writes it on request.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Create a store backed by the given record path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the persisted record
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached token, if any.
    ///
    /// A missing file, unreadable file, or malformed record all degrade to
    /// `None`.
    pub fn load(&self) -> Option<String> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                debug!("No session record at {:?}: {}", self.path, e);
                return None;
            }
        };

        match serde_json::from_str::<TokenRecord>(&content) {
            Ok(record) => record.value,
            Err(e) => {
                warn!("Malformed session record at {:?}, ignoring: {}", self.path, e);
                None
            }
        }
    }

    /// Persist the token.
    ///
    /// Writes to a sibling temp file and renames it into place so a reader
    /// never observes a half-written record.
    pub fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let record = TokenRecord {
            value: Some(token.to_string()),
        };
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, serde_json::to_string(&record)?)?;
        std::fs::rename(&tmp_path, &self.path)?;
        debug!("Session record persisted to {:?}", self.path);
        Ok(())
    }

    /// Delete the persisted record if present. Idempotent.
    pub fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Session record deleted: {:?}", self.path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to delete session record {:?}: {}", self.path, e),
        }
    }
}
