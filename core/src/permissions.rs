//! Persisted permission registry.
//!
//! Grants taken through the picker must survive process restarts, so the
//! registry is written to disk on every grant before the caller's reply is
//! completed. The file is loaded tolerantly: a missing or corrupt file
//! yields an empty registry rather than an error.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::StorageError;
use crate::resource::{AccessKind, ResourceId};

/// A single persisted grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionGrant {
    pub uri: ResourceId,
    pub kind: AccessKind,
    /// RFC 3339 timestamp of when the user approved the grant.
    pub granted_at: String,
}

/// The set of currently persisted grants.
///
/// Enumerable and durable; `hasPermission` is an exact-match scan over the
/// persisted identifiers, regardless of kind.
pub trait PermissionRegistry: Send + Sync {
    /// Whether any grant exists for this exact identifier.
    fn has(&self, id: &ResourceId) -> bool;

    /// Whether a grant of the given kind exists for this identifier.
    fn has_kind(&self, id: &ResourceId, kind: AccessKind) -> bool;

    /// Durably record a grant. Must not return until the grant is persisted.
    fn grant(&self, id: &ResourceId, kind: AccessKind) -> Result<(), StorageError>;

    /// Snapshot of all persisted grants.
    fn grants(&self) -> Vec<PermissionGrant>;
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct GrantState {
    grants: Vec<PermissionGrant>,
}

/// A [`PermissionRegistry`] backed by a JSON state file.
pub struct FileRegistry {
    path: PathBuf,
    state: Mutex<GrantState>,
}

impl FileRegistry {
    /// Open the registry at `path`, loading any existing grants.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = Self::load_from(&path);
        Self {
            path,
            state: Mutex::new(state),
        }
    }

    fn load_from(path: &Path) -> GrantState {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<GrantState>(&contents) {
                Ok(state) => {
                    debug!(
                        "Loaded {} grants from {}",
                        state.grants.len(),
                        path.display()
                    );
                    state
                }
                Err(e) => {
                    warn!("Failed to parse grant state from {}: {}", path.display(), e);
                    GrantState::default()
                }
            },
            Err(_) => {
                debug!("No grant state file at {}", path.display());
                GrantState::default()
            }
        }
    }

    fn save(&self, state: &GrantState) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(state)
            .map_err(|e| StorageError::Io(std::io::Error::other(e)))?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl PermissionRegistry for FileRegistry {
    fn has(&self, id: &ResourceId) -> bool {
        let state = self.state.lock().unwrap();
        state.grants.iter().any(|g| &g.uri == id)
    }

    fn has_kind(&self, id: &ResourceId, kind: AccessKind) -> bool {
        let state = self.state.lock().unwrap();
        state.grants.iter().any(|g| &g.uri == id && g.kind == kind)
    }

    fn grant(&self, id: &ResourceId, kind: AccessKind) -> Result<(), StorageError> {
        let mut state = self.state.lock().unwrap();
        if !state.grants.iter().any(|g| &g.uri == id && g.kind == kind) {
            state.grants.push(PermissionGrant {
                uri: id.clone(),
                kind,
                granted_at: chrono::Utc::now().to_rfc3339(),
            });
        }
        self.save(&state)
    }

    fn grants(&self) -> Vec<PermissionGrant> {
        self.state.lock().unwrap().grants.clone()
    }
}
