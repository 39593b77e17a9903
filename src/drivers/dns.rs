//! DNS backend sketch (feature `dns-driver`).
//!
//! Per spec §6: the qname is the hex key split into 16 labels of 4 hex
//! characters each, under a configured zone suffix; the record type is
//! `NULL` (type 10); rdata is the chunk body; `put` is a DNS UPDATE, `get`
//! is a recursive query. This hand-rolls the minimal wire format needed
//! for that — no DNS crate is part of this corpus's dependency surface.
//! TSIG signing and UPDATE are sketched but not implemented; this is a
//! read-only sketch at the interface boundary, not a production driver.

use std::net::UdpSocket;
use std::time::Duration;

use crate::error::Error;
use crate::key::{Key, KEY_LEN};
use crate::store::Backend;

const TYPE_NULL: u16 = 10;
const CLASS_IN: u16 = 1;

/// Configuration for [`DnsBackend`].
#[derive(Clone, Debug)]
pub struct Config {
    /// Resolver to query, e.g. `"127.0.0.1:53"`.
    pub server: String,
    /// Zone suffix labels are appended under, e.g. `"chunks.example.com"`.
    pub zone: String,
    /// Query timeout.
    pub timeout: Duration,
}

/// Resolves chunks as NULL records under a configured zone.
pub struct DnsBackend {
    cfg: Config,
    last_error: Option<String>,
}

impl DnsBackend {
    /// Creates the backend. Does not itself open a socket until a query
    /// is made.
    pub fn new(cfg: Config) -> DnsBackend {
        DnsBackend { cfg, last_error: None }
    }

    /// Splits a key's hex representation into 16 four-character labels
    /// and joins them under the configured zone, per spec §6.
    fn qname(&self, key: &Key) -> String {
        let hex = key.to_hex();
        debug_assert_eq!(hex.len(), KEY_LEN * 2);
        let labels: Vec<&str> = hex.as_bytes().chunks(4).map(|c| std::str::from_utf8(c).unwrap()).collect();
        format!("{}.{}", labels.join("."), self.cfg.zone)
    }
}

impl Backend for DnsBackend {
    #[tracing::instrument(skip(self), fields(key = %key))]
    fn get_bytes(&mut self, key: &Key) -> Result<Vec<u8>, Error> {
        let qname = self.qname(key);
        let query = build_query(&qname);

        let socket = UdpSocket::bind("0.0.0.0:0").map_err(|e| self.fail(e.to_string()))?;
        socket.set_read_timeout(Some(self.cfg.timeout)).ok();
        socket
            .send_to(&query, &self.cfg.server)
            .map_err(|e| self.fail(e.to_string()))?;

        let mut buf = [0u8; 4096];
        let n = socket.recv(&mut buf).map_err(|e| self.fail(e.to_string()))?;

        parse_null_rdata(&buf[..n]).ok_or(Error::NotFound)
    }

    fn put_bytes(&mut self, _key: &Key, _data: &[u8]) -> Result<(), Error> {
        // A full DNS UPDATE (RFC 2136), optionally TSIG-signed, is out of
        // scope for this sketch; see spec §6 for the wire contract a
        // complete driver must implement.
        Err(Error::DriverError("DNS UPDATE is not implemented in this sketch".into()))
    }

    fn error_message(&self) -> Option<String> {
        self.last_error.clone()
    }
}

impl DnsBackend {
    fn fail(&mut self, msg: String) -> Error {
        self.last_error = Some(msg.clone());
        Error::DriverError(msg)
    }
}

/// Builds a minimal recursive query for `qname` IN NULL.
fn build_query(qname: &str) -> Vec<u8> {
    let mut msg = Vec::new();
    msg.extend_from_slice(&0x1234u16.to_be_bytes()); // id
    msg.extend_from_slice(&0x0100u16.to_be_bytes()); // flags: RD=1
    msg.extend_from_slice(&1u16.to_be_bytes()); // qdcount
    msg.extend_from_slice(&0u16.to_be_bytes()); // ancount
    msg.extend_from_slice(&0u16.to_be_bytes()); // nscount
    msg.extend_from_slice(&0u16.to_be_bytes()); // arcount

    for label in qname.split('.') {
        msg.push(label.len() as u8);
        msg.extend_from_slice(label.as_bytes());
    }
    msg.push(0); // root label

    msg.extend_from_slice(&TYPE_NULL.to_be_bytes());
    msg.extend_from_slice(&CLASS_IN.to_be_bytes());
    msg
}

/// Extracts the rdata of the first NULL answer record in a DNS response.
/// Returns `None` if the response has no answers (NXDOMAIN/empty).
fn parse_null_rdata(msg: &[u8]) -> Option<Vec<u8>> {
    if msg.len() < 12 {
        return None;
    }
    let ancount = u16::from_be_bytes([msg[6], msg[7]]);
    if ancount == 0 {
        return None;
    }

    let mut pos = 12;
    pos = skip_name(msg, pos)?;
    pos += 4; // qtype + qclass

    pos = skip_name(msg, pos)?;
    let rtype = u16::from_be_bytes([*msg.get(pos)?, *msg.get(pos + 1)?]);
    pos += 2 + 2 + 4; // type, class, ttl
    let rdlength = u16::from_be_bytes([*msg.get(pos)?, *msg.get(pos + 1)?]) as usize;
    pos += 2;

    if rtype != TYPE_NULL {
        return None;
    }
    msg.get(pos..pos + rdlength).map(|s| s.to_vec())
}

/// Advances past a (possibly compressed) DNS name, returning the offset
/// just after it. Does not follow compression pointers — good enough for
/// the names this driver itself produces.
fn skip_name(msg: &[u8], mut pos: usize) -> Option<usize> {
    loop {
        let len = *msg.get(pos)? as usize;
        if len == 0 {
            return Some(pos + 1);
        }
        if len & 0xc0 == 0xc0 {
            return Some(pos + 2);
        }
        pos += 1 + len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qname_splits_into_sixteen_labels() {
        let cfg = Config {
            server: "127.0.0.1:53".into(),
            zone: "chunks.example.com".into(),
            timeout: Duration::from_millis(1),
        };
        let backend = DnsBackend::new(cfg);
        let key = Key::from_bytes([0xabu8; 32]);
        let name = backend.qname(&key);
        let labels: Vec<&str> = name.split('.').collect();
        // 16 hex labels + 3 zone labels
        assert_eq!(labels.len(), 16 + 3);
        assert!(labels[..16].iter().all(|l| l.len() == 4));
    }
}
