//! Store trait definitions

use crate::StoreResult;

/// Scoped key-value storage holding serialized documents.
///
/// Writes replace the whole value; there are no partial updates.
pub trait PersistenceBackend: Send + Sync {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Replace the value stored under `key`
    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()>;

    /// Check if the backend is usable
    fn is_healthy(&self) -> bool;
}
