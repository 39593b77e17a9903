//! Property-based fuzzing of the write/read round trip and of chunk
//! construction, mirroring `blob_store`'s proptest dev-dependency usage.

use chunkstore::chunk::Chunk;
use chunkstore::drivers::memory::MemoryBackend;
use chunkstore::key::{Key, MAX};
use chunkstore::{Store, StreamReader, StreamWriter};
use proptest::prelude::*;
use std::io::{Read, Write};

mod support;

fn round_trip(data: &[u8]) -> Vec<u8> {
    support::init_tracing();
    let mut store = Store::new(Box::new(MemoryBackend::new()));
    let mut w = StreamWriter::new(&mut store);
    w.write_all(data).unwrap();
    let root = w.close().unwrap();

    let mut r = StreamReader::new(&mut store, root).unwrap();
    let mut out = Vec::new();
    r.read_to_end(&mut out).unwrap();
    out
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property 2 (round trip): for any non-empty byte sequence,
    /// `read(write(b)) == b`.
    #[test]
    fn prop_round_trip(data in proptest::collection::vec(any::<u8>(), 1..300_000)) {
        let got = round_trip(&data);
        prop_assert_eq!(got, data);
    }

    /// Property 3 (idempotence): writing the same bytes twice produces
    /// the same root key.
    #[test]
    fn prop_idempotent_root_key(data in proptest::collection::vec(any::<u8>(), 1..50_000)) {
        support::init_tracing();
        let mut store = Store::new(Box::new(MemoryBackend::new()));

        let mut w1 = StreamWriter::new(&mut store);
        w1.write_all(&data).unwrap();
        let root1 = w1.close().unwrap();

        let mut w2 = StreamWriter::new(&mut store);
        w2.write_all(&data).unwrap();
        let root2 = w2.close().unwrap();

        prop_assert_eq!(root1, root2);
    }

    /// Property 1 (key determinism): a leaf chunk's key is a pure
    /// function of (data, depth).
    #[test]
    fn prop_leaf_key_determinism(data in proptest::collection::vec(any::<u8>(), 1..MAX)) {
        support::init_tracing();
        let a = Chunk::new(data.clone(), 0, None).unwrap();
        let b = Chunk::new(data, 0, None).unwrap();
        prop_assert_eq!(a.key(), b.key());
    }

    /// Property 4 (rejection): chunk construction at depth 0 fails with
    /// BadDataLength iff the length is 0 or exceeds MAX. Since proptest
    /// generates lengths in range, this only exercises the accept side;
    /// the reject side is covered by unit tests in `src/chunk.rs`.
    #[test]
    fn prop_leaf_accepts_any_in_range_length(len in 1usize..=MAX) {
        let data = vec![0xabu8; len];
        let chunk = Chunk::new(data, 0, None).unwrap();
        prop_assert_eq!(chunk.length(), len);
    }

    /// Hex round trip for arbitrary 32-byte keys (S6, generalized).
    #[test]
    fn prop_hex_round_trip(bytes in proptest::array::uniform32(any::<u8>())) {
        let key = Key::from_bytes(bytes);
        let hex = key.to_hex();
        let decoded = Key::from_hex(&hex).unwrap();
        prop_assert_eq!(decoded, key);
    }
}
