//! Client configuration.

use crate::error::ClientResult;
use std::fs;
use std::path::Path;

/// Configuration for the sync client.
#[derive(Clone)]
pub struct ClientConfig {
    /// Server URL (e.g. `http://127.0.0.1:8080/`).
    pub server_url: String,
    /// Shared secret sent with every request.
    pub secret: String,
}

impl ClientConfig {
    /// Creates a new client configuration.
    pub fn new(server_url: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            secret: secret.into(),
        }
    }

    /// Reads the secret from a file, stripping trailing newlines if `trim`.
    pub fn with_secret_file(mut self, path: &Path, trim: bool) -> ClientResult<Self> {
        let secret = fs::read_to_string(path)?;
        self.secret = if trim {
            secret.trim_end_matches(['\r', '\n']).to_string()
        } else {
            secret
        };
        Ok(self)
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("server_url", &self.server_url)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn secret_file_is_trimmed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("password.txt");
        fs::write(&path, "s3cr3t\n").unwrap();

        let config = ClientConfig::new("http://localhost/", "")
            .with_secret_file(&path, true)
            .unwrap();
        assert_eq!(config.secret, "s3cr3t");
    }

    #[test]
    fn missing_secret_file_is_io_error() {
        let dir = tempdir().unwrap();
        let result =
            ClientConfig::new("http://localhost/", "").with_secret_file(&dir.path().join("x"), true);
        assert!(result.is_err());
    }

    #[test]
    fn debug_hides_secret() {
        let config = ClientConfig::new("http://localhost/", "s3cr3t");
        assert!(!format!("{config:?}").contains("s3cr3t"));
    }
}
