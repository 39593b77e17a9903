//! Memcached backend sketch (feature `memcached-driver`).
//!
//! Per spec §6: key = 64-char lowercase hex of the binary key; value =
//! chunk data, no framing. This talks the plain memcached text protocol
//! over `std::net::TcpStream` — no memcached client crate is part of this
//! corpus's dependency surface, and a minimal `get`/`set` exchange is all
//! the interface boundary requires. Not hardened for production use:
//! no connection pooling, no retries, no pipelining.

use std::io::{self, BufRead, BufReader, Write};
use std::net::TcpStream;

use crate::error::Error;
use crate::key::Key;
use crate::store::Backend;

/// Address of a memcached server.
#[derive(Clone, Debug)]
pub struct Config {
    /// `host:port` of the memcached server.
    pub addr: String,
}

/// Talks to a single memcached server over one TCP connection.
pub struct MemcachedBackend {
    stream: TcpStream,
    last_error: Option<String>,
}

impl MemcachedBackend {
    /// Connects to `cfg.addr`.
    pub fn connect(cfg: Config) -> Result<MemcachedBackend, Error> {
        let stream = TcpStream::connect(&cfg.addr).map_err(|e| Error::DriverError(e.to_string()))?;
        Ok(MemcachedBackend { stream, last_error: None })
    }

    fn record(&mut self, err: io::Error) -> Error {
        let msg = err.to_string();
        self.last_error = Some(msg.clone());
        Error::DriverError(msg)
    }
}

impl Backend for MemcachedBackend {
    #[tracing::instrument(skip(self), fields(key = %key))]
    fn get_bytes(&mut self, key: &Key) -> Result<Vec<u8>, Error> {
        let cmd = format!("get {}\r\n", key.to_hex());
        self.stream.write_all(cmd.as_bytes()).map_err(|e| self.record(e))?;

        let mut reader = BufReader::new(&mut self.stream);
        let mut header = String::new();
        reader.read_line(&mut header).map_err(|e| io_to_driver(&mut self.last_error, e))?;

        if header.starts_with("END") {
            return Err(Error::NotFound);
        }
        // "VALUE <key> <flags> <bytes>\r\n"
        let bytes_field = header
            .trim_end()
            .split(' ')
            .nth(3)
            .ok_or_else(|| Error::DriverError("malformed VALUE header".into()))?;
        let len: usize = bytes_field
            .parse()
            .map_err(|_| Error::DriverError("malformed VALUE length".into()))?;

        let mut data = vec![0u8; len];
        io::Read::read_exact(&mut reader, &mut data)
            .map_err(|e| io_to_driver(&mut self.last_error, e))?;

        let mut trailer = [0u8; 2]; // consume trailing "\r\n"
        io::Read::read_exact(&mut reader, &mut trailer)
            .map_err(|e| io_to_driver(&mut self.last_error, e))?;
        let mut end_line = String::new();
        reader.read_line(&mut end_line).map_err(|e| io_to_driver(&mut self.last_error, e))?;

        Ok(data)
    }

    #[tracing::instrument(skip(self, data), fields(key = %key, len = data.len()))]
    fn put_bytes(&mut self, key: &Key, data: &[u8]) -> Result<(), Error> {
        let cmd = format!("set {} 0 0 {}\r\n", key.to_hex(), data.len());
        self.stream.write_all(cmd.as_bytes()).map_err(|e| self.record(e))?;
        self.stream.write_all(data).map_err(|e| self.record(e))?;
        self.stream.write_all(b"\r\n").map_err(|e| self.record(e))?;

        let mut reader = BufReader::new(&mut self.stream);
        let mut reply = String::new();
        reader.read_line(&mut reply).map_err(|e| io_to_driver(&mut self.last_error, e))?;
        if reply.starts_with("STORED") {
            Ok(())
        } else {
            Err(Error::DriverError(format!("unexpected reply: {}", reply.trim_end())))
        }
    }

    fn error_message(&self) -> Option<String> {
        self.last_error.clone()
    }
}

fn io_to_driver(last_error: &mut Option<String>, err: io::Error) -> Error {
    let msg = err.to_string();
    *last_error = Some(msg.clone());
    Error::DriverError(msg)
}
