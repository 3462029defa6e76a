//! HTTP client abstraction.

use crate::error::ClientResult;

/// HTTP client abstraction.
///
/// Implement this trait to provide the actual HTTP transport
/// (reqwest, hyper, ureq, etc.).
pub trait HttpClient: Send + Sync {
    /// Sends a POST request and returns the response body.
    ///
    /// Non-2xx replies that carry a body should still return the body; the
    /// server reports request errors inside the JSON envelope. Failures that
    /// cannot succeed on retry (a bad URL) should be
    /// [`ClientError::transport_fatal`](crate::ClientError::transport_fatal).
    fn post(&self, url: &str, body: Vec<u8>) -> ClientResult<Vec<u8>>;
}

/// Trait for servers that can handle loopback requests.
pub trait LoopbackServer {
    /// Handles a request body and returns the response body.
    fn handle_post(&self, body: &[u8]) -> Vec<u8>;
}

/// A loopback HTTP client that routes requests directly to a server.
///
/// Useful for testing without actual network overhead.
pub struct LoopbackClient<S: LoopbackServer> {
    server: S,
}

impl<S: LoopbackServer + Send + Sync> LoopbackClient<S> {
    /// Creates a new loopback client connected to the given server.
    pub fn new(server: S) -> Self {
        Self { server }
    }
}

impl<S: LoopbackServer + Send + Sync> HttpClient for LoopbackClient<S> {
    fn post(&self, _url: &str, body: Vec<u8>) -> ClientResult<Vec<u8>> {
        Ok(self.server.handle_post(&body))
    }
}
