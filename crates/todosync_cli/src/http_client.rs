//! Blocking reqwest implementation of the client transport.

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use todosync_client::{ClientError, ClientResult, HttpClient};

/// HTTP client backed by `reqwest`.
pub struct ReqwestClient {
    inner: Client,
}

impl ReqwestClient {
    /// Creates a client with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let inner = Client::builder().timeout(timeout).build()?;
        Ok(Self { inner })
    }
}

fn transport_error(err: reqwest::Error) -> ClientError {
    // A request that cannot be built (bad URL) fails the same way every time
    if err.is_builder() {
        ClientError::transport_fatal(err.to_string())
    } else {
        ClientError::transport_retryable(err.to_string())
    }
}

impl HttpClient for ReqwestClient {
    fn post(&self, url: &str, body: Vec<u8>) -> ClientResult<Vec<u8>> {
        let response = self
            .inner
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(transport_error)?;

        // 4xx replies still carry a JSON envelope
        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(transport_error)
    }
}
