//! Main sync server.

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::{HandlerContext, RequestHandler};
use crate::persistence::{load_secret, FileSnapshotStore, SnapshotStore};
use crate::store::StateStore;
use std::sync::Arc;
use todosync_protocol::ResponseEnvelope;
use tracing::{error, info};

const FALLBACK_ERROR_BODY: &[u8] = br#"{"success":false,"error":"internal error"}"#;

/// The sync server.
///
/// Owns the state store and routes request bodies through the dispatcher.
/// Transports hand it raw bodies and write back whatever it returns.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use todosync_server::{MemorySnapshotStore, ServerConfig, SyncServer};
///
/// let server = SyncServer::with_snapshots(
///     ServerConfig::default(),
///     "s3cr3t",
///     Arc::new(MemorySnapshotStore::new()),
/// );
///
/// let reply = server.handle_body(br#"{"type": 2, "password": "s3cr3t"}"#);
/// assert_eq!(reply, br#"{"success":true}"#);
/// ```
pub struct SyncServer {
    handler: RequestHandler,
    context: Arc<HandlerContext>,
}

impl SyncServer {
    /// Opens a server from its configuration.
    ///
    /// Reads the secret (fatal if missing) and restores the snapshot from
    /// `snapshot_path` (an absent or unreadable snapshot starts empty).
    pub fn open(config: ServerConfig) -> ServerResult<Self> {
        let secret = load_secret(&config.secret_path, config.trim_secret)?;
        let snapshots = Arc::new(FileSnapshotStore::new(config.snapshot_path.clone()));
        Ok(Self::with_snapshots(config, secret, snapshots))
    }

    /// Creates a server with an explicit secret and snapshot store.
    pub fn with_snapshots(
        config: ServerConfig,
        secret: impl Into<String>,
        snapshots: Arc<dyn SnapshotStore>,
    ) -> Self {
        let store = StateStore::new();
        restore(&store, snapshots.as_ref());

        let context = Arc::new(HandlerContext::new(config, secret, store, snapshots));
        let handler = RequestHandler::new(Arc::clone(&context));

        Self { handler, context }
    }

    /// Dispatches one request body.
    pub fn dispatch(&self, body: &[u8]) -> ServerResult<ResponseEnvelope> {
        self.handler.dispatch(body)
    }

    /// Dispatches one request body and always returns a response body.
    pub fn handle_body(&self, body: &[u8]) -> Vec<u8> {
        let response = match self.dispatch(body) {
            Ok(response) => response,
            Err(e) => error_envelope(&e),
        };
        encode_or_fallback(&response)
    }

    /// Returns the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.context.config
    }

    /// Returns the live state store.
    pub fn store(&self) -> &StateStore {
        &self.context.store
    }
}

/// Builds the response sent for a request that could not be carried out.
pub fn error_envelope(err: &ServerError) -> ResponseEnvelope {
    if err.is_client_error() {
        ResponseEnvelope::error(err.to_string())
    } else {
        error!(error = %err, "request failed");
        ResponseEnvelope::error("internal error")
    }
}

/// Encodes a response, falling back to a fixed error body.
pub(crate) fn encode_or_fallback(response: &ResponseEnvelope) -> Vec<u8> {
    response.encode().unwrap_or_else(|e| {
        error!(error = %e, "failed to encode response");
        FALLBACK_ERROR_BODY.to_vec()
    })
}

fn restore(store: &StateStore, snapshots: &dyn SnapshotStore) {
    match snapshots.load() {
        Ok(Some(document)) => {
            info!(
                location = %snapshots.location(),
                checklist = document.checklist.len(),
                inventory = document.inventory.len(),
                "restored snapshot"
            );
            store.replace_with(document);
        }
        Ok(None) => {
            info!(location = %snapshots.location(), "no snapshot found, starting empty");
        }
        Err(e @ ServerError::SnapshotDecode { .. }) => {
            error!(
                location = %snapshots.location(),
                error = %e,
                "snapshot unreadable, starting with empty state"
            );
            match snapshots.set_aside() {
                Ok(Some(moved)) => info!(moved_to = %moved, "corrupt snapshot kept"),
                Ok(None) => {}
                Err(e) => error!(error = %e, "failed to move corrupt snapshot aside"),
            }
        }
        Err(e) => {
            error!(
                location = %snapshots.location(),
                error = %e,
                "snapshot unreadable, starting with empty state"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemorySnapshotStore;
    use std::fs;
    use tempfile::tempdir;
    use todosync_protocol::{RequestEnvelope, StateDocument};

    fn memory_server(snapshots: Arc<MemorySnapshotStore>) -> SyncServer {
        SyncServer::with_snapshots(ServerConfig::default(), "s3cr3t", snapshots)
    }

    fn reply(server: &SyncServer, request: RequestEnvelope) -> ResponseEnvelope {
        ResponseEnvelope::decode(&server.handle_body(&request.encode().unwrap())).unwrap()
    }

    #[test]
    fn restores_existing_snapshot() {
        let snapshots = Arc::new(MemorySnapshotStore::with_document(
            StateDocument::new().with_checklist("milk", true, 0),
        ));
        let server = memory_server(snapshots);

        assert_eq!(server.store().len(), (1, 0));
        let state = reply(&server, RequestEnvelope::load("s3cr3t")).into_state();
        assert!(state.checklist["milk"].checked);
    }

    #[test]
    fn first_load_without_snapshot_is_empty() {
        let server = memory_server(Arc::new(MemorySnapshotStore::new()));
        let response = reply(&server, RequestEnvelope::load("s3cr3t"));

        assert!(response.success);
        assert_eq!(response.checklist, Some(Default::default()));
        assert_eq!(response.inventory, Some(Default::default()));
    }

    #[test]
    fn malformed_body_gets_error_envelope() {
        let server = memory_server(Arc::new(MemorySnapshotStore::new()));
        let response = ResponseEnvelope::decode(&server.handle_body(b"garbage")).unwrap();

        assert!(!response.success);
        assert!(response.error.unwrap().starts_with("invalid request"));
    }

    #[test]
    fn unknown_operation_gets_error_envelope() {
        let server = memory_server(Arc::new(MemorySnapshotStore::new()));
        let body = server.handle_body(br#"{"type": 42, "password": "s3cr3t"}"#);
        let response = ResponseEnvelope::decode(&body).unwrap();

        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("invalid operation: 42"));
    }

    #[test]
    fn wrong_secret_with_out_of_range_type_is_plainly_denied() {
        let server = memory_server(Arc::new(MemorySnapshotStore::new()));
        for body in [
            &br#"{"type": 256, "password": "wrong"}"#[..],
            br#"{"type": -1, "password": "wrong"}"#,
            br#"{"type": 3, "password": "wrong"}"#,
        ] {
            assert_eq!(server.handle_body(body), br#"{"success":false}"#);
        }
    }

    #[test]
    fn open_requires_secret_file() {
        let dir = tempdir().unwrap();
        let config = ServerConfig::default()
            .with_secret_path(dir.path().join("password.txt"))
            .with_snapshot_path(dir.path().join("data.json"));

        assert!(matches!(
            SyncServer::open(config),
            Err(ServerError::SecretNotFound { .. })
        ));
    }

    #[test]
    fn open_tolerates_corrupt_snapshot() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("password.txt"), "s3cr3t\n").unwrap();
        fs::write(dir.path().join("data.json"), "{{{{").unwrap();
        let config = ServerConfig::default()
            .with_secret_path(dir.path().join("password.txt"))
            .with_snapshot_path(dir.path().join("data.json"));

        let server = SyncServer::open(config).unwrap();
        assert!(server.store().is_empty());
        assert!(reply(&server, RequestEnvelope::test("s3cr3t")).success);

        assert_eq!(
            fs::read_to_string(dir.path().join("data.json.corrupt")).unwrap(),
            "{{{{"
        );
        let state = StateDocument::new().with_checklist("milk", false, 0);
        assert!(reply(&server, RequestEnvelope::save("s3cr3t", state)).success);
        assert_eq!(
            fs::read_to_string(dir.path().join("data.json.corrupt")).unwrap(),
            "{{{{"
        );
    }

    #[test]
    fn state_survives_restart() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("password.txt"), "s3cr3t").unwrap();
        let config = ServerConfig::default()
            .with_secret_path(dir.path().join("password.txt"))
            .with_snapshot_path(dir.path().join("data.json"));

        let server = SyncServer::open(config.clone()).unwrap();
        let state = StateDocument::new()
            .with_checklist("milk", false, 0)
            .with_inventory("eggs", 6, 12, 1);
        assert!(reply(&server, RequestEnvelope::save("s3cr3t", state.clone())).success);
        drop(server);

        let server = SyncServer::open(config).unwrap();
        assert_eq!(reply(&server, RequestEnvelope::load("s3cr3t")).into_state(), state);
    }

    #[test]
    fn test_operation_leaves_snapshot_file_untouched() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("password.txt"), "s3cr3t").unwrap();
        let snapshot_path = dir.path().join("data.json");
        fs::write(&snapshot_path, r#"{"checklist":{},"inventory":{}}"#).unwrap();
        let config = ServerConfig::default()
            .with_secret_path(dir.path().join("password.txt"))
            .with_snapshot_path(&snapshot_path);
        let server = SyncServer::open(config).unwrap();

        assert!(!reply(&server, RequestEnvelope::test("wrong")).success);
        assert!(reply(&server, RequestEnvelope::test("s3cr3t")).success);

        assert_eq!(
            fs::read_to_string(&snapshot_path).unwrap(),
            r#"{"checklist":{},"inventory":{}}"#
        );
    }
}
