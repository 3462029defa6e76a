//! HTTP transport.
//!
//! Serves the protocol as JSON bodies on `POST /`.

use crate::error::{ServerError, ServerResult};
use crate::server::{encode_or_fallback, error_envelope, SyncServer};
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use todosync_protocol::ResponseEnvelope;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Builds the router for a sync server.
pub fn router(server: Arc<SyncServer>) -> Router {
    let limit = server.config().max_body_bytes;
    Router::new()
        .route("/", post(handle_sync))
        .layer(DefaultBodyLimit::max(limit))
        .with_state(server)
}

async fn handle_sync(
    State(server): State<Arc<SyncServer>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            let response = ResponseEnvelope::error(rejection.body_text());
            return json_response(rejection.status(), &response);
        }
    };

    // Dispatch may block on snapshot I/O.
    let result = tokio::task::spawn_blocking(move || server.dispatch(&body)).await;

    let (status, response) = match result {
        Ok(Ok(response)) => (StatusCode::OK, response),
        Ok(Err(e)) => (status_for(&e), error_envelope(&e)),
        Err(e) => {
            error!(error = %e, "dispatch task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ResponseEnvelope::error("internal error"),
            )
        }
    };

    json_response(status, &response)
}

fn json_response(status: StatusCode, response: &ResponseEnvelope) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        encode_or_fallback(response),
    )
        .into_response()
}

fn status_for(err: &ServerError) -> StatusCode {
    if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// A bound HTTP listener for a sync server.
pub struct HttpServer {
    listener: TcpListener,
    server: Arc<SyncServer>,
}

impl HttpServer {
    /// Binds the address from the server configuration.
    pub async fn bind(server: Arc<SyncServer>) -> ServerResult<Self> {
        let addr = server.config().bind_addr;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        Ok(Self { listener, server })
    }

    /// Returns the address actually bound.
    pub fn local_addr(&self) -> ServerResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serves requests until `shutdown` resolves.
    pub async fn serve<F>(self, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.local_addr()?;
        info!(addr = %addr, "listening");

        axum::serve(self.listener, router(self.server))
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("shutting down");
        Ok(())
    }
}
