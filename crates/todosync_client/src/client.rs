//! Push/pull client.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::http::HttpClient;
use todosync_protocol::{RequestEnvelope, ResponseEnvelope, StateDocument};
use tracing::debug;

/// Client for a todosync server.
pub struct SyncClient<C: HttpClient> {
    config: ClientConfig,
    client: C,
}

impl<C: HttpClient> SyncClient<C> {
    /// Creates a new client.
    pub fn new(config: ClientConfig, client: C) -> Self {
        Self { config, client }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Checks that the server is reachable and accepts the secret.
    pub fn test(&self) -> ClientResult<()> {
        self.exchange(RequestEnvelope::test(self.config.secret.as_str()))
            .map(|_| ())
    }

    /// Fetches the full server state.
    pub fn load(&self) -> ClientResult<StateDocument> {
        let response = self.exchange(RequestEnvelope::load(self.config.secret.as_str()))?;
        Ok(response.into_state())
    }

    /// Sends entries to be merged into the server state.
    ///
    /// Entries absent from `state` are left untouched on the server.
    pub fn save(&self, state: &StateDocument) -> ClientResult<()> {
        debug!(
            checklist = state.checklist.len(),
            inventory = state.inventory.len(),
            "saving state"
        );
        self.exchange(RequestEnvelope::save(
            self.config.secret.as_str(),
            state.clone(),
        ))
        .map(|_| ())
    }

    fn exchange(&self, request: RequestEnvelope) -> ClientResult<ResponseEnvelope> {
        let body = request
            .encode()
            .map_err(|e| ClientError::Protocol(format!("failed to encode request: {e}")))?;

        let reply = self.client.post(&self.config.server_url, body)?;

        let response = ResponseEnvelope::decode(&reply)
            .map_err(|e| ClientError::Protocol(format!("failed to decode response: {e}")))?;

        if response.success {
            return Ok(response);
        }
        match response.error {
            Some(message) => Err(ClientError::Rejected(message)),
            None => Err(ClientError::AuthenticationFailed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct TestClient {
        reply: Vec<u8>,
        failure: Option<String>,
        sent: Mutex<Vec<Vec<u8>>>,
    }

    impl TestClient {
        fn replying(body: &str) -> Self {
            Self {
                reply: body.as_bytes().to_vec(),
                failure: None,
                sent: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Vec::new(),
                failure: Some(message.to_string()),
                sent: Mutex::new(Vec::new()),
            }
        }

        fn last_request(&self) -> RequestEnvelope {
            let sent = self.sent.lock().unwrap();
            RequestEnvelope::decode(sent.last().unwrap()).unwrap()
        }
    }

    impl HttpClient for TestClient {
        fn post(&self, _url: &str, body: Vec<u8>) -> ClientResult<Vec<u8>> {
            self.sent.lock().unwrap().push(body);
            match &self.failure {
                Some(message) => Err(ClientError::transport_retryable(message.as_str())),
                None => Ok(self.reply.clone()),
            }
        }
    }

    fn client(http: TestClient) -> SyncClient<TestClient> {
        SyncClient::new(ClientConfig::new("http://localhost/", "s3cr3t"), http)
    }

    #[test]
    fn test_sends_secret_and_type() {
        let client = client(TestClient::replying(r#"{"success":true}"#));
        client.test().unwrap();

        let request = client.client.last_request();
        assert_eq!(request.op_code, 2);
        assert_eq!(request.password, "s3cr3t");
    }

    #[test]
    fn load_returns_state() {
        let client = client(TestClient::replying(
            r#"{"success":true,"checklist":{"milk":{"checked":true,"index":2}},"inventory":{}}"#,
        ));
        let state = client.load().unwrap();
        assert!(state.checklist["milk"].checked);
        assert_eq!(state.checklist["milk"].index, 2);
    }

    #[test]
    fn save_sends_entries() {
        let client = client(TestClient::replying(r#"{"success":true}"#));
        let state = StateDocument::new().with_inventory("eggs", 3, 12, 0);
        client.save(&state).unwrap();

        let request = client.client.last_request();
        assert_eq!(request.op_code, 0);
        assert_eq!(request.inventory, Some(state.inventory));
    }

    #[test]
    fn denied_is_authentication_failure() {
        let client = client(TestClient::replying(r#"{"success":false}"#));
        assert!(matches!(client.test(), Err(ClientError::AuthenticationFailed)));
    }

    #[test]
    fn error_field_is_rejection() {
        let client = client(TestClient::replying(
            r#"{"success":false,"error":"invalid operation: 9"}"#,
        ));
        assert!(matches!(client.load(), Err(ClientError::Rejected(m)) if m.contains("9")));
    }

    #[test]
    fn transport_failure_is_retryable() {
        let client = client(TestClient::failing("connection refused"));
        let err = client.test().unwrap_err();
        assert!(err.is_retryable());
    }

    #[test]
    fn garbage_reply_is_protocol_error() {
        let client = client(TestClient::replying("<html>"));
        assert!(matches!(client.test(), Err(ClientError::Protocol(_))));
    }
}
