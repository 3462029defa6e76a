//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Default shared-secret file, relative to the working directory.
pub const DEFAULT_SECRET_PATH: &str = "password.txt";

/// Default snapshot file, relative to the working directory.
pub const DEFAULT_SNAPSHOT_PATH: &str = "data.json";

/// Configuration for the sync server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to. Port 0 picks an ephemeral port.
    pub bind_addr: SocketAddr,
    /// File holding the shared secret.
    pub secret_path: PathBuf,
    /// File the state snapshot is persisted to.
    pub snapshot_path: PathBuf,
    /// Whether trailing `\r`/`\n` are stripped from the secret file.
    pub trim_secret: bool,
    /// Extra attempts made when persisting after a save fails.
    pub persist_retries: u32,
    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl ServerConfig {
    /// Creates a new server configuration.
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            secret_path: PathBuf::from(DEFAULT_SECRET_PATH),
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            trim_secret: true,
            persist_retries: 1,
            max_body_bytes: 1024 * 1024,
        }
    }

    /// Sets the shared-secret file.
    pub fn with_secret_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.secret_path = path.into();
        self
    }

    /// Sets the snapshot file.
    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = path.into();
        self
    }

    /// Sets whether trailing newlines are stripped from the secret.
    pub fn with_trim_secret(mut self, trim: bool) -> Self {
        self.trim_secret = trim;
        self
    }

    /// Sets the number of persistence retries.
    pub fn with_persist_retries(mut self, retries: u32) -> Self {
        self.persist_retries = retries;
        self
    }

    /// Sets the maximum request body size.
    pub fn with_max_body_bytes(mut self, max: usize) -> Self {
        self.max_body_bytes = max;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from(([127, 0, 0, 1], 0)))
    }
}
