//! The streaming reader: walks a chunk tree in order to reproduce the
//! original byte stream.

use std::io;

use crate::chunk::Chunk;
use crate::error::Error;
use crate::key::{Key, KEY_LEN};
use crate::store::Store;

/// A single position in the tree: the chunk currently being walked, an
/// offset within its data, and (for a branch) the active child cursor.
///
/// Reads are once-through: the cursor never seeks backward, and children
/// are always walked in ascending offset order.
struct Cursor {
    chunk: Chunk,
    offset: usize,
    child: Option<Box<Cursor>>,
}

impl Cursor {
    fn open(store: &mut Store, key: &Key) -> Result<Cursor, Error> {
        let chunk = store.get(key)?;
        Ok(Cursor { chunk, offset: 0, child: None })
    }

    /// One read step. Returns `0` to mean end-of-stream for this cursor.
    fn read(&mut self, store: &mut Store, buf: &mut [u8]) -> Result<usize, Error> {
        if self.chunk.is_leaf() {
            self.read_leaf(buf)
        } else {
            self.read_branch(store, buf)
        }
    }

    fn read_leaf(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let remaining = self.chunk.length() - self.offset;
        if remaining == 0 {
            return Ok(0);
        }
        let n = remaining.min(buf.len());
        if n == 0 {
            // Caller passed an empty buffer; nothing to do, no progress.
            return Ok(0);
        }
        buf[..n].copy_from_slice(&self.chunk.data()[self.offset..self.offset + n]);
        self.offset += n;
        Ok(n)
    }

    fn read_branch(&mut self, store: &mut Store, buf: &mut [u8]) -> Result<usize, Error> {
        loop {
            if self.child.is_none() {
                if self.offset >= self.chunk.length() {
                    return Ok(0);
                }
                let mut key_bytes = [0u8; KEY_LEN];
                key_bytes.copy_from_slice(&self.chunk.data()[self.offset..self.offset + KEY_LEN]);
                let child_key = Key::from_bytes(key_bytes);
                self.offset += KEY_LEN;
                self.child = Some(Box::new(Cursor::open(store, &child_key)?));
            }

            let child = self.child.as_mut().expect("just ensured");
            let n = child.read(store, buf)?;

            if n == 0 {
                self.child = None;
                // The child was exhausted without producing bytes; loop
                // back around to (a) and try the next child, or return
                // EOF if there is none.
                continue;
            }

            return Ok(n);
        }
    }
}

/// A streaming source over a chunk tree rooted at a given key.
///
/// Implements [`std::io::Read`]; the wrapper loops internally until the
/// caller's buffer is full or the underlying walk reaches end-of-stream,
/// per spec §4.5's short-read discipline.
pub struct StreamReader<'s> {
    store: &'s mut Store,
    root: Cursor,
}

impl<'s> StreamReader<'s> {
    /// Opens a reader over the tree rooted at `key`.
    #[tracing::instrument(skip(store), fields(key = %key))]
    pub fn new(store: &'s mut Store, key: Key) -> Result<StreamReader<'s>, Error> {
        let root = Cursor::open(store, &key)?;
        Ok(StreamReader { store, root })
    }
}

impl io::Read for StreamReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self
                .root
                .read(self.store, &mut buf[filled..])
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        Ok(filled)
    }
}
