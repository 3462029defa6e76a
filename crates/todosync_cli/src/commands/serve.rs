//! Serve command implementation.

use std::sync::Arc;
use todosync_server::{HttpServer, ServerConfig, SyncServer};
use tracing::{info, warn};

/// Runs the server until ctrl-c.
///
/// Fails if the secret cannot be read or the address cannot be bound.
pub fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        secret = %config.secret_path.display(),
        snapshot = %config.snapshot_path.display(),
        "server starting"
    );
    let server = Arc::new(SyncServer::open(config)?);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let http = HttpServer::bind(server).await?;
        http.serve(shutdown_signal()).await
    })?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for ctrl-c, serving until killed");
        std::future::pending::<()>().await;
    }
}
