//! # todosync Server
//!
//! Checklist and inventory sync server.
//!
//! This crate provides:
//! - An in-memory [`StateStore`] with upsert-by-name semantics
//! - Shared-secret authentication
//! - A request dispatcher for the save / load / test operations
//! - Snapshot persistence to a JSON file (write-then-rename)
//! - An HTTP transport serving the protocol on `POST /`
//!
//! # Protocol
//!
//! 1. The body is decoded into a request envelope
//! 2. The secret is checked before anything else; a mismatch is answered
//!    with `{"success": false}`
//! 3. Save merges entries and persists the full state; load returns the
//!    full state; test only confirms the secret
//!
//! Entries are never deleted by a request. The only way state shrinks is a
//! restart from an older snapshot.

#![deny(unsafe_code)]
#![warn(missing_docs)]
// Production code MUST NOT use panic!/unwrap()/expect()
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod auth;
mod config;
mod error;
mod handler;
mod http;
mod persistence;
mod server;
mod store;

pub use auth::SecretValidator;
pub use config::{ServerConfig, DEFAULT_SECRET_PATH, DEFAULT_SNAPSHOT_PATH};
pub use error::{ServerError, ServerResult};
pub use handler::{HandlerContext, RequestHandler};
pub use http::{router, HttpServer};
pub use persistence::{load_secret, FileSnapshotStore, MemorySnapshotStore, SnapshotStore};
pub use server::{error_envelope, SyncServer};
pub use store::{ChecklistEntry, InventoryEntry, StateSnapshot, StateStore};
