//! In-memory backend for testing

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use crate::{PersistenceBackend, StoreError, StoreResult};

/// Mock backend for unit/integration testing
#[derive(Default)]
pub struct MemoryBackend {
    values: Mutex<HashMap<String, Vec<u8>>>,

    /// Configure writes to fail
    pub fail_writes: Arc<Mutex<bool>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key, e.g. with a document from an older build
    pub fn with_value(self, key: &str, value: impl Into<Vec<u8>>) -> Self {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.into());
        }
        self
    }

    /// Toggle write failures
    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap_or_else(|e| e.into_inner()) = fail;
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.values.lock().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PersistenceBackend for MemoryBackend {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let values = self
            .values
            .lock()
            .map_err(|_| StoreError::Database("memory backend lock poisoned".into()))?;
        Ok(values.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        if *self.fail_writes.lock().unwrap_or_else(|e| e.into_inner()) {
            return Err(StoreError::Io(io::Error::other("simulated write failure")));
        }

        let mut values = self
            .values
            .lock()
            .map_err(|_| StoreError::Database("memory backend lock poisoned".into()))?;
        values.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn is_healthy(&self) -> bool {
        self.values.lock().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_and_get() {
        let backend = MemoryBackend::new();
        assert!(backend.is_empty());

        backend.put("k", b"v").unwrap();
        assert_eq!(backend.get("k").unwrap().unwrap(), b"v");
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn test_failing_writes_leave_value_untouched() {
        let backend = MemoryBackend::new().with_value("k", "old");
        backend.set_fail_writes(true);

        assert!(backend.put("k", b"new").is_err());
        assert_eq!(backend.get("k").unwrap().unwrap(), b"old");

        backend.set_fail_writes(false);
        backend.put("k", b"new").unwrap();
        assert_eq!(backend.get("k").unwrap().unwrap(), b"new");
    }
}
