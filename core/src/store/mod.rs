pub mod local;

pub use local::LocalStore;

use crate::errors::StorageError;
use crate::resource::ResourceId;

/// Resolution of opaque resource identifiers to byte-level operations.
///
/// Each method is a single host call; the bridge performs no caching,
/// batching, or locking on top of it. Implementations must be `Send + Sync`
/// and are object-safe (`dyn DocumentStore`). Host I/O is synchronous, so a
/// long read or write blocks its invocation.
pub trait DocumentStore: Send + Sync {
    /// Whether the identifier resolves to an existing resource.
    fn exists(&self, id: &ResourceId) -> Result<bool, StorageError>;

    /// Delete the resource if it exists. Deleting a resource that never
    /// existed is not an error.
    fn delete(&self, id: &ResourceId) -> Result<(), StorageError>;

    /// Byte length of the resource.
    ///
    /// # Errors
    ///
    /// [`StorageError::FileAccess`] if the resource does not exist or cannot
    /// be accessed.
    fn length(&self, id: &ResourceId) -> Result<u64, StorageError>;

    /// Whether the resolved handle may be written.
    fn can_write(&self, id: &ResourceId) -> bool;

    /// Replace the resource's contents with `data`.
    ///
    /// Callers are expected to check [`can_write`](Self::can_write) first;
    /// this method does not re-check permissions.
    ///
    /// # Errors
    ///
    /// [`StorageError::FileNotFound`] if the resource vanished since it was
    /// granted, [`StorageError::Io`] on any other host failure.
    fn write(&self, id: &ResourceId, data: &[u8]) -> Result<(), StorageError>;

    /// Skip `offset` bytes and read up to `length` bytes.
    ///
    /// A short read (fewer than `length` bytes available) returns the bytes
    /// that were read; it is not an error.
    ///
    /// # Errors
    ///
    /// [`StorageError::FileAccess`] if the resource does not exist,
    /// [`StorageError::FileNotFound`] / [`StorageError::Io`] on host
    /// failures during the read itself.
    fn read_range(
        &self,
        id: &ResourceId,
        offset: u64,
        length: usize,
    ) -> Result<Vec<u8>, StorageError>;
}
