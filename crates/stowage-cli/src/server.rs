//! Server startup and lifecycle

use crate::{routes, AppState, SignatureServerConfig};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Run the signature server
pub async fn run_server(config: SignatureServerConfig) -> anyhow::Result<()> {
    run_server_with_shutdown(config, std::future::pending()).await
}

/// Run server with graceful shutdown
pub async fn run_server_with_shutdown(
    config: SignatureServerConfig,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(config.clone())?);
    let app = routes::create_router(state);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;

    info!("Signature endpoint listening on http://{}{}", addr, config.signature_route);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Signature server shutdown complete");

    Ok(())
}
