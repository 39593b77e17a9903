//! The 32-byte content key: depth and length packed in-band with a
//! truncated SHA-256 digest.

use sha2::digest::{FixedOutput as _, Update as _};
use sha2::Sha256;

use crate::error::Error;

/// Fixed width of a [`Key`] in bytes.
pub const KEY_LEN: usize = 32;

/// Maximum chunk payload length. Lengths are stored `mod MAX`; a stored
/// value of `0` is interpreted as `MAX`, so the representable range is
/// `[1, MAX]`.
pub const MAX: usize = 1024;

/// The 32-byte content address of a chunk.
///
/// Structurally: `byte 0` bits `7..2` are the 6-bit depth and bits `1..0`
/// are the high two bits of the 10-bit length; `byte 1` is the low 8 bits
/// of length; `bytes 2..31` are the remaining 30 bytes of SHA-256 over the
/// chunk's data.
///
/// # Note
///
/// `Key::encode` overwrites the top 16 bits of the SHA-256 output to carry
/// depth and length in-band. This reduces collision resistance from 256
/// bits to 240 bits. That is an intentional, permanent trade for
/// self-describing keys — it must never be silently changed, since doing
/// so changes every key ever produced by this format.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key([u8; KEY_LEN]);

impl Key {
    /// Computes `SHA256(data)` and packs `(depth, length)` into its first
    /// two bytes.
    ///
    /// `length` must already be known to be `1..=MAX`; this function does
    /// not itself validate that range (chunk construction does).
    pub fn encode(depth: u8, length: usize, data: &[u8]) -> Key {
        let mut hasher = Sha256::default();
        hasher.update(data);
        let digest = hasher.finalize_fixed();

        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(&digest);
        let len_field = (length % MAX) as u16;
        bytes[0] = (depth << 2) | ((len_field >> 8) as u8 & 0x03);
        bytes[1] = (len_field & 0xff) as u8;
        Key(bytes)
    }

    /// Builds a `Key` from a raw 32-byte array without interpreting it.
    /// Used by drivers reconstructing a key they already hold, and by the
    /// hex decoder.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Key {
        Key(bytes)
    }

    /// Borrows the raw 32 bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// The depth encoded in this key, `0..=63`.
    pub fn depth(&self) -> u8 {
        (self.0[0] >> 2) & 0x3f
    }

    /// The length encoded in this key, `1..=MAX`.
    pub fn length(&self) -> usize {
        let v = ((u16::from(self.0[0]) << 8) | u16::from(self.0[1])) & (MAX as u16 - 1);
        if v == 0 {
            MAX
        } else {
            v as usize
        }
    }

    /// Decodes a 64-character lowercase hex string into a key. Reentrant:
    /// allocates no process-wide scratch state.
    ///
    /// The fallible entry point for hex coming from outside the process
    /// (a driver's wire format, a caller-supplied root key) — malformed
    /// input is a caller error, not an absent value, so this returns
    /// [`Error::Invalid`] rather than `None`.
    pub fn from_hex(hex_str: &str) -> Result<Key, Error> {
        if hex_str.len() != KEY_LEN * 2 {
            return Err(Error::Invalid);
        }
        let mut bytes = [0u8; KEY_LEN];
        hex::decode_to_slice(hex_str, &mut bytes).map_err(|_| Error::Invalid)?;
        Ok(Key(bytes))
    }

    /// Encodes this key as a 64-character lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Debug for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Key")
            .field("hex", &self.to_hex())
            .field("depth", &self.depth())
            .field("length", &self.length())
            .finish()
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}
