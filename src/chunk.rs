//! The self-describing leaf/branch chunk: a bounded byte buffer plus a
//! key that is validated against the buffer's own structure.

use crate::error::Error;
use crate::key::{Key, KEY_LEN, MAX};

/// An immutable `(data, depth, key)` triple.
///
/// At depth 0 (a leaf) `data` is opaque caller bytes. At depth > 0 (a
/// branch) `data` is a concatenation of child keys, each one
/// [`KEY_LEN`] bytes, all but the last encoding length `MAX`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    data: Vec<u8>,
    key: Key,
}

impl Chunk {
    /// Constructs and validates a chunk from owned data.
    ///
    /// `depth` is used both to decide whether `data` is opaque bytes or
    /// a sequence of child keys, and is packed into the resulting key
    /// alongside `data.len()`.
    ///
    /// If `expected_key` is supplied, the computed key must match it
    /// byte-for-byte or construction fails with [`Error::KeyNotValid`].
    /// Backends reconstructing a chunk fetched from storage should always
    /// pass the key they requested, so a corrupted or substituted backend
    /// response is caught here rather than handed to the caller.
    #[tracing::instrument(skip(data, expected_key), fields(depth, len = data.len()))]
    pub fn new(data: Vec<u8>, depth: u8, expected_key: Option<&Key>) -> Result<Chunk, Error> {
        validate(&data, depth)?;

        let key = Key::encode(depth, data.len(), &data);

        if let Some(expected) = expected_key {
            if &key != expected {
                tracing::warn!(
                    computed = %key,
                    expected = %expected,
                    "chunk key mismatch"
                );
                return Err(Error::KeyNotValid);
            }
        }

        Ok(Chunk { data, key })
    }

    /// The chunk's data bytes: opaque for a leaf, child keys for a branch.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the chunk, returning its owned data buffer.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// The chunk's key.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// The chunk's depth, read from its key.
    pub fn depth(&self) -> u8 {
        self.key.depth()
    }

    /// The chunk's data length, read from its key.
    pub fn length(&self) -> usize {
        self.key.length()
    }

    /// `true` if this chunk is a leaf (depth 0).
    pub fn is_leaf(&self) -> bool {
        self.depth() == 0
    }

    /// Iterates the child keys of a branch chunk, in ascending offset
    /// order. Empty for a leaf.
    pub fn children(&self) -> impl Iterator<Item = Key> + '_ {
        let n = if self.is_leaf() { 0 } else { self.data.len() / KEY_LEN };
        (0..n).map(move |i| {
            let off = i * KEY_LEN;
            let mut bytes = [0u8; KEY_LEN];
            bytes.copy_from_slice(&self.data[off..off + KEY_LEN]);
            Key::from_bytes(bytes)
        })
    }
}

fn validate(data: &[u8], depth: u8) -> Result<(), Error> {
    if data.is_empty() || data.len() > MAX {
        return Err(Error::BadDataLength);
    }

    if depth > 0 {
        if data.len() % KEY_LEN != 0 {
            return Err(Error::BadDataLength);
        }

        let n = data.len() / KEY_LEN;
        for (i, chunk) in data.chunks_exact(KEY_LEN).enumerate() {
            let mut bytes = [0u8; KEY_LEN];
            bytes.copy_from_slice(chunk);
            let child = Key::from_bytes(bytes);

            if child.depth() != depth - 1 {
                return Err(Error::BadIndirectDepth);
            }
            if i < n - 1 && child.length() != MAX {
                return Err(Error::BadIndirectLength);
            }
        }
    }

    Ok(())
}
