//! The streaming writer: splits arbitrary input into fixed-size leaves
//! and builds a left-complete tree of indirect nodes whose key is the
//! final root key.

use std::io;

use crate::chunk::Chunk;
use crate::error::Error;
use crate::key::{KEY_LEN, MAX};
use crate::store::Store;

/// One level of the tree under construction. Recursion into the next
/// level happens on `close`, matching spec §4.4 and §9's note that a loop
/// over depth is equally acceptable to recursion — this crate recurses,
/// since the depth bound (≤ 6 for any realistic stream) makes that the
/// more direct translation of the original.
struct Level {
    depth: u8,
    /// Fills with incoming bytes (depth 0) or child keys (depth > 0)
    /// until it reaches [`MAX`], at which point it is emitted as a chunk.
    buf: Vec<u8>,
    /// Accumulates the keys of chunks emitted so far at this level. Grows
    /// by doubling; not itself chunked until `close`.
    keybuf: Vec<u8>,
}

impl Level {
    fn new(depth: u8) -> Level {
        Level { depth, buf: Vec::with_capacity(MAX), keybuf: Vec::new() }
    }

    fn emit(&mut self, store: &mut Store, data: Vec<u8>) -> Result<(), Error> {
        let chunk = Chunk::new(data, self.depth, None)?;
        store.put(&chunk)?;
        self.keybuf.extend_from_slice(chunk.key().as_bytes());
        Ok(())
    }

    /// Accepts `input`, emitting full chunks as the buffer fills. Always
    /// consumes the entire input before returning, per spec §4.4's
    /// short-write loop discipline.
    fn accept(&mut self, store: &mut Store, mut input: &[u8]) -> Result<(), Error> {
        while !input.is_empty() {
            if self.buf.is_empty() && input.len() >= MAX {
                // Whole-chunk fast path: emit directly from the caller's
                // slice rather than copying into `buf` first.
                let (head, rest) = input.split_at(MAX);
                self.emit(store, head.to_vec())?;
                input = rest;
                continue;
            }

            let avail = MAX - self.buf.len();
            let take = avail.min(input.len());
            let (head, rest) = input.split_at(take);
            self.buf.extend_from_slice(head);
            input = rest;

            if self.buf.len() == MAX {
                let full = std::mem::replace(&mut self.buf, Vec::with_capacity(MAX));
                self.emit(store, full)?;
            }
        }
        Ok(())
    }

    /// Flushes any partial tail, then either surfaces the single
    /// remaining key as the root or recurses to build the next level.
    fn close(mut self, store: &mut Store) -> Result<Option<[u8; KEY_LEN]>, Error> {
        if !self.buf.is_empty() {
            let tail = std::mem::take(&mut self.buf);
            self.emit(store, tail)?;
        }

        if self.keybuf.is_empty() {
            return Ok(None);
        }

        if self.keybuf.len() > KEY_LEN {
            let mut next = Level::new(self.depth + 1);
            let keys = std::mem::take(&mut self.keybuf);
            next.accept(store, &keys)?;
            next.close(store)
        } else {
            let mut root = [0u8; KEY_LEN];
            root.copy_from_slice(&self.keybuf);
            Ok(Some(root))
        }
    }
}

/// A streaming sink: write arbitrary bytes, then [`StreamWriter::close`]
/// to obtain the root key.
///
/// Implements [`std::io::Write`]; every call consumes its entire input
/// buffer (never returns a short count), so it composes with `io::copy`
/// and friends without a wrapping retry loop.
pub struct StreamWriter<'s> {
    store: &'s mut Store,
    level: Option<Level>,
}

impl<'s> StreamWriter<'s> {
    /// Opens a new streaming write session over `store`.
    pub fn new(store: &'s mut Store) -> StreamWriter<'s> {
        StreamWriter { store, level: Some(Level::new(0)) }
    }

    /// Closes the stream, returning the root key.
    ///
    /// A stream that never received any bytes has no root key and
    /// returns [`Error::EmptyStream`]; `store.last()` is left untouched
    /// in that case.
    #[tracing::instrument(skip(self))]
    pub fn close(mut self) -> Result<crate::key::Key, Error> {
        let level = self.level.take().expect("close called at most once");
        match level.close(self.store)? {
            Some(bytes) => Ok(crate::key::Key::from_bytes(bytes)),
            None => Err(Error::EmptyStream),
        }
    }
}

impl io::Write for StreamWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let level = self.level.as_mut().expect("write after close");
        level
            .accept(self.store, buf)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::memory::MemoryBackend;
    use crate::reader::StreamReader;
    use std::io::{Read, Write};

    fn new_store() -> Store {
        Store::new(Box::new(MemoryBackend::new()))
    }

    #[test]
    fn empty_stream_is_an_error() {
        let mut store = new_store();
        let w = StreamWriter::new(&mut store);
        assert!(matches!(w.close(), Err(Error::EmptyStream)));
    }

    #[test]
    fn single_short_leaf_has_depth_zero_root() {
        let mut store = new_store();
        let mut w = StreamWriter::new(&mut store);
        w.write_all(b"hello").unwrap();
        let root = w.close().unwrap();
        assert_eq!(root.depth(), 0);
        assert_eq!(root.length(), 5);
    }

    #[test]
    fn s3_mixed_pattern_round_trip() {
        let mut data = vec![0x55u8; 1024];
        data.extend(vec![0xaau8; 1024]);

        let mut store = new_store();
        let mut w = StreamWriter::new(&mut store);
        w.write_all(&data).unwrap();
        let root = w.close().unwrap();
        assert_eq!(
            root.to_hex(),
            "04407d4b8f1015bf9317428b69104a668a0a1b9823d4685061ca85c2bc133625"
        );

        let mut r = StreamReader::new(&mut store, root).unwrap();
        let mut got = Vec::new();
        r.read_to_end(&mut got).unwrap();
        assert_eq!(got, data);
    }

    #[test]
    fn s4_64kib_stream_round_trip() {
        let data: Vec<u8> = (0..65536u32).map(|i| (i & 0xff) as u8).collect();

        let mut store = new_store();
        let mut w = StreamWriter::new(&mut store);
        w.write_all(&data).unwrap();
        let root = w.close().unwrap();
        assert_eq!(root.depth(), 2);
        assert_eq!(
            root.to_hex(),
            "084042e38dc8ce5220eef3f306d5efca1d37ecf6a2fbbb186e933c0ec72eb637"
        );

        let mut r = StreamReader::new(&mut store, root).unwrap();
        let mut got = Vec::new();
        r.read_to_end(&mut got).unwrap();
        assert_eq!(got, data);
    }

    #[test]
    fn idempotent_on_identical_input() {
        let data = vec![0x42u8; 3000];

        let mut store = new_store();
        let mut w1 = StreamWriter::new(&mut store);
        w1.write_all(&data).unwrap();
        let root1 = w1.close().unwrap();

        let mut w2 = StreamWriter::new(&mut store);
        w2.write_all(&data).unwrap();
        let root2 = w2.close().unwrap();

        assert_eq!(root1, root2);
    }

    #[test]
    fn single_byte_short_of_a_full_chunk_stays_depth_zero() {
        let data = vec![9u8; MAX - 1];
        let mut store = new_store();
        let mut w = StreamWriter::new(&mut store);
        w.write_all(&data).unwrap();
        let root = w.close().unwrap();
        assert_eq!(root.depth(), 0);
        assert_eq!(root.length(), MAX - 1);
    }

    #[test]
    fn exactly_two_full_chunks_builds_one_branch_level() {
        let data = vec![1u8; MAX * 2];
        let mut store = new_store();
        let mut w = StreamWriter::new(&mut store);
        w.write_all(&data).unwrap();
        let root = w.close().unwrap();
        assert_eq!(root.depth(), 1);
        assert_eq!(root.length(), KEY_LEN * 2);
    }
}
