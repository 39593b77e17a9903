//! Filesystem backend: one file per chunk at `<root>/<hex(key)>.kvfs`.
//!
//! Exemplary per spec §6: a driver MUST preserve the chunk's bytes
//! exactly and must not interpret them. This is the only backend the
//! test suite exercises against real I/O.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::key::Key;
use crate::store::Backend;

/// Configuration for [`FileBackend`].
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory under which chunk files are created.
    pub root: PathBuf,
}

impl Config {
    /// A config rooted at `root`.
    pub fn with_root(root: PathBuf) -> Config {
        Config { root }
    }
}

/// Stores each chunk as a separate file named after its hex key.
pub struct FileBackend {
    cfg: Config,
    last_error: Option<String>,
}

impl FileBackend {
    /// Creates the backend, creating `cfg.root` if it does not exist.
    pub fn new(cfg: Config) -> Result<FileBackend, Error> {
        fs::create_dir_all(&cfg.root)?;
        Ok(FileBackend { cfg, last_error: None })
    }

    /// The path a chunk with this key would be stored at.
    pub fn path_for(&self, key: &Key) -> PathBuf {
        self.cfg.root.join(format!("{}.kvfs", key.to_hex()))
    }

    fn record_error(&mut self, context: &str, err: &io::Error) {
        self.last_error = Some(format!("{context}: {err}"));
    }
}

impl Backend for FileBackend {
    #[tracing::instrument(skip(self), fields(key = %key))]
    fn get_bytes(&mut self, key: &Key) -> Result<Vec<u8>, Error> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(data) => Ok(data),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(Error::NotFound),
            Err(err) => {
                self.record_error("read", &err);
                Err(Error::DriverError(err.to_string()))
            }
        }
    }

    #[tracing::instrument(skip(self, data), fields(key = %key, len = data.len()))]
    fn put_bytes(&mut self, key: &Key, data: &[u8]) -> Result<(), Error> {
        let path = self.path_for(key);
        // Idempotent: identical content already lives at this key.
        if path.exists() {
            return Ok(());
        }
        match fs::write(&path, data) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.record_error("write", &err);
                Err(Error::DriverError(err.to_string()))
            }
        }
    }

    fn error_message(&self) -> Option<String> {
        self.last_error.clone()
    }
}

/// Returns `true` if a `.kvfs` file exists for `key` under `root`.
pub fn exists(root: &Path, key: &Key) -> bool {
    root.join(format!("{}.kvfs", key.to_hex())).exists()
}
