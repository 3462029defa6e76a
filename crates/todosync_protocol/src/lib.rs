//! # todosync Protocol
//!
//! Wire types for the todosync checklist/inventory sync protocol.
//!
//! This crate provides:
//! - [`Operation`] codes carried in the `type` field
//! - [`RequestEnvelope`] and [`ResponseEnvelope`] JSON bodies
//! - [`ChecklistPayload`], [`InventoryPayload`] and [`StateDocument`],
//!   shared by the wire format and the on-disk snapshot
//!
//! This is a pure protocol crate with no I/O operations.
//!
//! ```
//! use todosync_protocol::{Operation, RequestEnvelope};
//!
//! let request = RequestEnvelope::decode(br#"{"type": 2, "password": "s3cr3t"}"#).unwrap();
//! assert_eq!(request.operation().unwrap(), Operation::Test);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod messages;
mod operation;
mod payload;

pub use error::{ProtocolError, ProtocolResult};
pub use messages::{RequestEnvelope, ResponseEnvelope};
pub use operation::Operation;
pub use payload::{ChecklistMap, ChecklistPayload, InventoryMap, InventoryPayload, StateDocument};
