//! Error enumeration for chunk construction, store operations, and the
//! streaming codec.

/// Errors surfaced by this crate.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Data length was zero, exceeded [`crate::key::MAX`], or (for a
    /// branch chunk) was not a positive multiple of
    /// [`crate::key::KEY_LEN`].
    #[error("bad chunk data length")]
    BadDataLength,

    /// A branch's child key encoded a depth other than `parent depth - 1`.
    #[error("bad indirection pointer depth")]
    BadIndirectDepth,

    /// A non-last branch child key encoded a length other than `MAX`.
    #[error("bad indirection pointer length")]
    BadIndirectLength,

    /// The chunk's computed key did not match the key the caller expected.
    #[error("key not valid")]
    KeyNotValid,

    /// A backend failed to produce a value for the requested key.
    #[error("not found")]
    NotFound,

    /// A backend-level failure. The detail, if any, is carried in the
    /// string and is also available via `Store::error_message`.
    #[error("driver error: {0}")]
    DriverError(String),

    /// Caller supplied an invalid argument (e.g. a malformed hex key).
    #[error("invalid argument")]
    Invalid,

    /// A streaming write was closed having received zero bytes. There is
    /// no root key for an empty stream.
    #[error("empty stream has no root key")]
    EmptyStream,

    /// Underlying I/O failure from a driver or from `std::io::{Read,
    /// Write}` adapters.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
