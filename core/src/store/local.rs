//! Local filesystem [`DocumentStore`].
//!
//! Resource identifiers are `doc://<name>` tokens resolved against a root
//! directory. A token that does not carry the scheme, is empty, or escapes
//! the root behaves like a resource that does not exist; resolution itself
//! never fails.

use std::io::{Read, Seek, SeekFrom};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use super::DocumentStore;
use crate::errors::StorageError;
use crate::permissions::PermissionRegistry;
use crate::resource::{AccessKind, ResourceId};

/// Scheme prefix for local resource tokens.
pub const DOC_SCHEME: &str = "doc://";

pub struct LocalStore {
    root: PathBuf,
    registry: Arc<dyn PermissionRegistry>,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>, registry: Arc<dyn PermissionRegistry>) -> Self {
        Self {
            root: root.into(),
            registry,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Build the token for a file name under the root.
    pub fn token_for(name: &str) -> ResourceId {
        ResourceId::new(format!("{DOC_SCHEME}{name}"))
    }

    /// Resolve a token to a path under the root.
    ///
    /// Returns `None` for tokens without the scheme, empty names, absolute
    /// names, or names containing parent components.
    fn resolve(&self, id: &ResourceId) -> Option<PathBuf> {
        let name = id.as_str().strip_prefix(DOC_SCHEME)?;
        if name.is_empty() {
            return None;
        }
        let rel = Path::new(name);
        let safe = rel.components().all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            debug!("Rejecting unsafe resource token: {}", id);
            return None;
        }
        Some(self.root.join(rel))
    }
}

impl DocumentStore for LocalStore {
    fn exists(&self, id: &ResourceId) -> Result<bool, StorageError> {
        Ok(self.resolve(id).is_some_and(|p| p.is_file()))
    }

    fn delete(&self, id: &ResourceId) -> Result<(), StorageError> {
        if let Some(path) = self.resolve(id) {
            if path.is_file() {
                std::fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    fn length(&self, id: &ResourceId) -> Result<u64, StorageError> {
        let path = self
            .resolve(id)
            .filter(|p| p.is_file())
            .ok_or_else(|| inaccessible(id))?;
        let meta = std::fs::metadata(&path)?;
        Ok(meta.len())
    }

    fn can_write(&self, id: &ResourceId) -> bool {
        self.resolve(id).is_some() && self.registry.has_kind(id, AccessKind::Write)
    }

    fn write(&self, id: &ResourceId, data: &[u8]) -> Result<(), StorageError> {
        let path = self
            .resolve(id)
            .ok_or_else(|| StorageError::FileNotFound(id.to_string()))?;
        // The picker created the file at grant time; a missing file here
        // means it was removed since.
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| StorageError::from_open(e, id.as_str()))?;
        std::io::Write::write_all(&mut file, data)?;
        Ok(())
    }

    fn read_range(
        &self,
        id: &ResourceId,
        offset: u64,
        length: usize,
    ) -> Result<Vec<u8>, StorageError> {
        let path = self
            .resolve(id)
            .filter(|p| p.is_file())
            .ok_or_else(|| inaccessible(id))?;

        let mut file =
            std::fs::File::open(&path).map_err(|e| StorageError::from_open(e, id.as_str()))?;
        file.seek(SeekFrom::Start(offset))?;

        let mut buf = Vec::with_capacity(length.min(64 * 1024));
        file.take(length as u64).read_to_end(&mut buf)?;
        Ok(buf)
    }
}

fn inaccessible(id: &ResourceId) -> StorageError {
    StorageError::FileAccess(format!(
        "Map file cannot be accessed. It does not exist, or no permission is available: {id}"
    ))
}
