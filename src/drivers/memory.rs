//! An in-memory backend, used by the test suite and as the reference
//! implementation of the [`crate::store::Backend`] contract.

use std::collections::HashMap;

use crate::error::Error;
use crate::key::Key;
use crate::store::Backend;

/// Backs a [`crate::store::Store`] with a plain `HashMap`. No persistence,
/// no I/O — useful for unit tests and for composing with other backends.
#[derive(Default)]
pub struct MemoryBackend {
    chunks: HashMap<Key, Vec<u8>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> MemoryBackend {
        MemoryBackend { chunks: HashMap::new() }
    }
}

impl Backend for MemoryBackend {
    fn get_bytes(&mut self, key: &Key) -> Result<Vec<u8>, Error> {
        self.chunks.get(key).cloned().ok_or(Error::NotFound)
    }

    fn put_bytes(&mut self, key: &Key, data: &[u8]) -> Result<(), Error> {
        self.chunks.entry(*key).or_insert_with(|| data.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_not_found() {
        let mut backend = MemoryBackend::new();
        let key = Key::from_bytes([1u8; 32]);
        assert!(matches!(backend.get_bytes(&key), Err(Error::NotFound)));
    }

    #[test]
    fn put_is_idempotent() {
        let mut backend = MemoryBackend::new();
        let key = Key::from_bytes([2u8; 32]);
        backend.put_bytes(&key, b"one").unwrap();
        backend.put_bytes(&key, b"one").unwrap();
        assert_eq!(backend.get_bytes(&key).unwrap(), b"one");
    }
}
