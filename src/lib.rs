//! A content-addressed chunked object store.
//!
//! Callers write arbitrary-length byte streams through a [`writer::StreamWriter`]
//! and receive a single 32-byte [`key::Key`] that later reconstitutes the
//! exact stream through a [`reader::StreamReader`]. Storage is backed by
//! a pluggable [`store::Backend`] — an in-memory map for tests, a
//! filesystem directory, or (as sketches) memcached and DNS.
//!
//! The store is immutable by construction: every key is the hash of its
//! own contents, so there is no deletion, no reference counting, and no
//! mutation of existing chunks.
//!
//! ```
//! use chunkstore::drivers::memory::MemoryBackend;
//! use chunkstore::{Store, StreamReader, StreamWriter};
//! use std::io::{Read, Write};
//!
//! let mut store = Store::new(Box::new(MemoryBackend::new()));
//!
//! let mut w = StreamWriter::new(&mut store);
//! w.write_all(b"hello, chunked world").unwrap();
//! let root = w.close().unwrap();
//!
//! let mut r = StreamReader::new(&mut store, root).unwrap();
//! let mut out = Vec::new();
//! r.read_to_end(&mut out).unwrap();
//! assert_eq!(out, b"hello, chunked world");
//! ```

#![warn(missing_docs)]

pub mod chunk;
pub mod drivers;
pub mod error;
pub mod key;
pub mod reader;
pub mod store;
pub mod writer;

pub use chunk::Chunk;
pub use error::Error;
pub use key::Key;
pub use reader::StreamReader;
pub use store::{Backend, Store};
pub use writer::StreamWriter;
