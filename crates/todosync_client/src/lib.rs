//! # todosync Client
//!
//! Pushes and pulls checklist/inventory state to a todosync server.
//!
//! The HTTP library is abstracted behind [`HttpClient`] so callers can pick
//! their own (the `todosync` binary uses a blocking `reqwest` client), and
//! tests can route requests into an in-process server with
//! [`LoopbackClient`].
//!
//! Every call sends the whole state or asks for the whole state; there is no
//! delta sync and no conflict handling. The last save wins per entry.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod config;
mod error;
mod http;

pub use client::SyncClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, LoopbackClient, LoopbackServer};
