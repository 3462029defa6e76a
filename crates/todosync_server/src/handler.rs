//! Request dispatch: decode, authenticate, route.

use crate::auth::SecretValidator;
use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::persistence::SnapshotStore;
use crate::store::{StateSnapshot, StateStore};
use parking_lot::Mutex;
use std::sync::Arc;
use todosync_protocol::{Operation, RequestEnvelope, ResponseEnvelope};
use tracing::{debug, error, warn};

/// Context shared by every request.
pub struct HandlerContext {
    /// Server configuration.
    pub config: ServerConfig,
    /// Live state.
    pub store: StateStore,
    /// Snapshot persistence.
    pub snapshots: Arc<dyn SnapshotStore>,
    validator: SecretValidator,
    /// Generation of the newest snapshot written so far.
    persisted: Mutex<Option<u64>>,
}

impl HandlerContext {
    /// Creates a new handler context.
    pub fn new(
        config: ServerConfig,
        secret: impl Into<String>,
        store: StateStore,
        snapshots: Arc<dyn SnapshotStore>,
    ) -> Self {
        Self {
            config,
            store,
            snapshots,
            validator: SecretValidator::new(secret),
            persisted: Mutex::new(None),
        }
    }

    /// Writes `snapshot` unless a newer one has already been written.
    ///
    /// Failed writes are retried `persist_retries` times, then logged and
    /// dropped. Returns true if the snapshot is durable.
    pub fn persist(&self, snapshot: &StateSnapshot) -> bool {
        let mut persisted = self.persisted.lock();
        if persisted.is_some_and(|generation| generation >= snapshot.generation) {
            debug!(
                generation = snapshot.generation,
                "newer snapshot already persisted"
            );
            return true;
        }

        let attempts = self.config.persist_retries.saturating_add(1);
        for attempt in 1..=attempts {
            match self.snapshots.save(&snapshot.document) {
                Ok(()) => {
                    *persisted = Some(snapshot.generation);
                    debug!(generation = snapshot.generation, "snapshot persisted");
                    return true;
                }
                Err(e) if attempt < attempts => {
                    warn!(
                        location = %self.snapshots.location(),
                        attempt,
                        error = %e,
                        "failed to persist snapshot, retrying"
                    );
                }
                Err(e) => {
                    error!(
                        location = %self.snapshots.location(),
                        attempts,
                        error = %e,
                        "giving up on persisting snapshot"
                    );
                }
            }
        }
        false
    }
}

/// Handler for sync requests.
pub struct RequestHandler {
    context: Arc<HandlerContext>,
}

impl RequestHandler {
    /// Creates a new request handler.
    pub fn new(context: Arc<HandlerContext>) -> Self {
        Self { context }
    }

    /// Decodes, authenticates and routes one request body.
    ///
    /// A wrong secret yields a denied response, not an error. Malformed
    /// bodies and unknown operations are errors.
    pub fn dispatch(&self, body: &[u8]) -> ServerResult<ResponseEnvelope> {
        let request = RequestEnvelope::decode(body)?;
        self.handle(request)
    }

    /// Authenticates and routes a decoded request.
    pub fn handle(&self, request: RequestEnvelope) -> ServerResult<ResponseEnvelope> {
        if !self.context.validator.validate(&request.password) {
            warn!(op_code = request.op_code, "rejected request with wrong secret");
            return Ok(ResponseEnvelope::denied());
        }

        let operation = request.operation()?;
        debug!(operation = operation.name(), "dispatching request");

        match operation {
            Operation::Save => Ok(self.handle_save(request)),
            Operation::Load => Ok(self.handle_load()),
            Operation::Test => Ok(ResponseEnvelope::success()),
        }
    }

    /// Merges the request's entries into the store, then persists.
    ///
    /// The response does not depend on the outcome of persistence.
    fn handle_save(&self, request: RequestEnvelope) -> ResponseEnvelope {
        let snapshot = self
            .context
            .store
            .apply(request.checklist, request.inventory);
        let response = ResponseEnvelope::success();
        self.context.persist(&snapshot);
        response
    }

    fn handle_load(&self) -> ResponseEnvelope {
        ResponseEnvelope::with_state(self.context.store.snapshot().document)
    }
}
