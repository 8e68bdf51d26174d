//! Directory-backed ticket store.
//!
//! Each ticket is a JSON document in its own file inside a project
//! directory that is itself a git checkout. The store reads and rewrites
//! existing files; it never creates or deletes tickets.

use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{PagOffError, Result};
use crate::model::Ticket;
use crate::util::to_tracker_json;

/// A ticket together with the file it was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketFile {
    pub path: PathBuf,
    pub ticket: Ticket,
}

impl TicketFile {
    /// File name used in commit messages and as the `git commit` pathspec.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Ticket store rooted at one project directory.
#[derive(Debug, Clone)]
pub struct TicketStore {
    dir: PathBuf,
}

impl TicketStore {
    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Open the store for a project directory.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the directory does not exist or is
    /// not a directory.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let meta = fs::metadata(dir).map_err(|e| PagOffError::store_unavailable(dir, e))?;
        if !meta.is_dir() {
            return Err(PagOffError::store_unavailable(dir, "not a directory"));
        }
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Candidate ticket files: regular files whose name has no `.`.
    fn ticket_paths(&self) -> Result<Vec<PathBuf>> {
        tracing::debug!(dir = %self.dir.display(), "Loading tickets");
        let entries =
            fs::read_dir(&self.dir).map_err(|e| PagOffError::store_unavailable(&self.dir, e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| PagOffError::store_unavailable(&self.dir, e))?;
            let path = entry.path();
            if !path.is_file() {
                tracing::debug!(path = %path.display(), "Not a regular file, skipping");
                continue;
            }
            if entry.file_name().to_string_lossy().contains('.') {
                tracing::debug!(path = %path.display(), "File name contains a '.', skipping");
                continue;
            }
            paths.push(path);
        }
        paths.sort();
        Ok(paths)
    }

    /// Parse a single ticket file.
    ///
    /// # Errors
    ///
    /// Returns `MalformedRecord` if the file cannot be read or is not a
    /// ticket document.
    pub fn read_ticket(path: &Path) -> Result<Ticket> {
        let malformed = |reason: String| PagOffError::MalformedRecord {
            path: path.to_path_buf(),
            reason,
        };
        let contents = fs::read_to_string(path).map_err(|e| malformed(e.to_string()))?;
        serde_json::from_str(&contents).map_err(|e| malformed(e.to_string()))
    }

    /// All parseable tickets with their paths, in file name order.
    ///
    /// Files that fail to parse are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the directory cannot be listed.
    pub fn entries(&self) -> Result<Vec<TicketFile>> {
        let mut tickets = Vec::new();
        for path in self.ticket_paths()? {
            if let Some(ticket) = Self::load_or_skip(&path) {
                tickets.push(TicketFile { path, ticket });
            }
        }
        Ok(tickets)
    }

    /// All parseable tickets in the directory.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the directory cannot be listed.
    pub fn enumerate(&self) -> Result<Vec<Ticket>> {
        Ok(self.entries()?.into_iter().map(|entry| entry.ticket).collect())
    }

    /// First ticket whose id reads the same as `id`.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the directory cannot be listed.
    pub fn find_by_id(&self, id: &str) -> Result<Option<TicketFile>> {
        for path in self.ticket_paths()? {
            if let Some(ticket) = Self::load_or_skip(&path) {
                if ticket.id_matches(id) {
                    tracing::debug!(id, path = %path.display(), "Found ticket");
                    return Ok(Some(TicketFile { path, ticket }));
                }
            }
        }
        Ok(None)
    }

    /// Like [`find_by_id`](Self::find_by_id) but a missing ticket is an error.
    ///
    /// # Errors
    ///
    /// Returns `TicketNotFound` if no ticket has the id.
    pub fn get(&self, id: &str) -> Result<TicketFile> {
        self.find_by_id(id)?
            .ok_or_else(|| PagOffError::TicketNotFound {
                id: id.trim().to_string(),
            })
    }

    /// Every distinct truthy scalar value found under the top-level key
    /// `field` across the directory.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the directory cannot be listed.
    pub fn collect_field_values(&self, field: &str) -> Result<BTreeSet<String>> {
        let mut values = BTreeSet::new();
        for ticket in self.enumerate()? {
            let doc = serde_json::to_value(&ticket)?;
            let Some(value) = doc.get(field) else {
                continue;
            };
            match value {
                Value::String(s) if !s.is_empty() => {
                    values.insert(s.clone());
                }
                Value::Number(n) if n.as_f64().is_some_and(|f| f.abs() > f64::EPSILON) => {
                    values.insert(n.to_string());
                }
                Value::Bool(true) => {
                    values.insert("true".to_string());
                }
                Value::Array(_) | Value::Object(_) => {
                    tracing::debug!(field, id = ticket.id, "Skipping non-scalar field value");
                }
                _ => {}
            }
        }
        Ok(values)
    }

    /// Close statuses already used in this project.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the directory cannot be listed.
    pub fn close_status_vocabulary(&self) -> Result<BTreeSet<String>> {
        self.collect_field_values("close_status")
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Overwrite `path` with `ticket` in the tracker's JSON layout.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if `path` has no file name, or `Io` on write
    /// failure.
    pub fn persist(path: &Path, ticket: &Ticket) -> Result<()> {
        let json = to_tracker_json(ticket)?;
        write_atomic(path, json.as_bytes())?;
        tracing::debug!(path = %path.display(), id = ticket.id, "Persisted ticket");
        Ok(())
    }

    fn load_or_skip(path: &Path) -> Option<Ticket> {
        tracing::debug!(path = %path.display(), "Loading file");
        match Self::read_ticket(path) {
            Ok(ticket) => Some(ticket),
            Err(e) => {
                tracing::warn!("{e}, continuing without");
                None
            }
        }
    }
}

/// Replace the contents of `path` through a hidden temporary file in the
/// same directory, so readers see either the old or the new bytes.
///
/// # Errors
///
/// Returns `Validation` if `path` has no file name, or `Io` on write
/// failure. The temporary file is removed on failure.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let name = path
        .file_name()
        .ok_or_else(|| PagOffError::validation("path", "has no file name"))?;
    let tmp_path = path.with_file_name(format!(".{}.tmp", name.to_string_lossy()));

    // Keep the mode of the file being replaced.
    let permissions = fs::metadata(path).ok().map(|meta| meta.permissions());
    let written = fs::File::create(&tmp_path).and_then(|mut file| {
        file.write_all(contents)?;
        if let Some(permissions) = permissions {
            file.set_permissions(permissions)?;
        }
        file.sync_all()
    });
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}
