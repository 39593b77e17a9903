//! The store abstraction: a narrow get/put/error-message contract over a
//! pluggable backend, plus the "last key written" side channel.

use crate::chunk::Chunk;
use crate::error::Error;
use crate::key::Key;

/// What a concrete driver must implement. Deliberately narrow — get, put,
/// and a human-readable error surface — mirroring the C original's
/// record-of-function-pointers `kvfs_store_t`. Rust expresses the same
/// polymorphism with a trait object rather than a vtable struct.
///
/// Implementors MUST pass the requested key through to
/// [`Chunk::new`]'s `expected_key` parameter on `get`, so that key
/// validation (and therefore corruption detection) happens uniformly
/// regardless of backend.
pub trait Backend {
    /// Fetches the raw bytes stored under `key`, or `Err(Error::NotFound)`
    /// if the backend has nothing for it.
    fn get_bytes(&mut self, key: &Key) -> Result<Vec<u8>, Error>;

    /// Persists `chunk`'s data under `chunk.key()`. Writes of identical
    /// content to the same key are idempotent; a driver MAY treat this as
    /// a no-op if the key already exists.
    fn put_bytes(&mut self, key: &Key, data: &[u8]) -> Result<(), Error>;

    /// A human-readable description of the most recent backend-level
    /// failure, if the backend tracks one beyond what it already returned
    /// via `Error`.
    fn error_message(&self) -> Option<String> {
        None
    }
}

/// A content-addressed key→chunk mapping, backed by a [`Backend`].
///
/// Owns the `last` field: the key of the most recent successful `put`.
/// Reads and writes on a single `Store` are not `Sync` — run independent
/// sessions on separate threads instead of sharing one.
pub struct Store {
    backend: Box<dyn Backend>,
    last: Option<Key>,
}

impl Store {
    /// Wraps a backend in a new store session.
    pub fn new(backend: Box<dyn Backend>) -> Store {
        Store { backend, last: None }
    }

    /// Fetches and validates the chunk addressed by `key`.
    ///
    /// The returned chunk's key is guaranteed to equal `key`: a backend
    /// that silently returned different bytes is caught here before the
    /// caller ever sees them.
    #[tracing::instrument(skip(self), fields(key = %key))]
    pub fn get(&mut self, key: &Key) -> Result<Chunk, Error> {
        let data = self.backend.get_bytes(key)?;
        Chunk::new(data, key.depth(), Some(key))
    }

    /// Persists `chunk`. On success, `chunk.key()` becomes `self.last()`.
    #[tracing::instrument(skip(self, chunk), fields(key = %chunk.key()))]
    pub fn put(&mut self, chunk: &Chunk) -> Result<(), Error> {
        self.backend.put_bytes(chunk.key(), chunk.data())?;
        self.last = Some(*chunk.key());
        Ok(())
    }

    /// The key of the most recent successful `put`, if any.
    pub fn last(&self) -> Option<Key> {
        self.last
    }

    /// A human-readable description of the most recent driver failure.
    pub fn error_message(&self) -> Option<String> {
        self.backend.error_message()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::memory::MemoryBackend;

    #[test]
    fn put_then_get_round_trips() {
        let mut store = Store::new(Box::new(MemoryBackend::new()));
        let chunk = Chunk::new(vec![1, 2, 3], 0, None).unwrap();
        store.put(&chunk).unwrap();
        assert_eq!(store.last(), Some(*chunk.key()));

        let got = store.get(chunk.key()).unwrap();
        assert_eq!(got.data(), chunk.data());
    }

    #[test]
    fn s5_missing_key_is_not_found() {
        let mut store = Store::new(Box::new(MemoryBackend::new()));
        let zero = Key::from_bytes([0u8; 32]);
        assert!(matches!(store.get(&zero), Err(Error::NotFound)));
    }

    #[test]
    fn last_is_unset_before_first_put() {
        let store = Store::new(Box::new(MemoryBackend::new()));
        assert_eq!(store.last(), None);
    }
}
