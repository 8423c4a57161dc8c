//! Startup orchestration.
//!
//! # Responsibilities
//! - Load the TLS certificate and key
//! - Bind the listener
//! - Serve until a shutdown signal, then drain
//!
//! # Design Decisions
//! - Fail fast: a bad certificate or a busy port is fatal before any
//!   request is served
//! - The listener starts last (traffic only when ready)

use std::future::Future;

use thiserror::Error;

use crate::config::GatewayConfig;
use crate::gemini::GeminiServer;
use crate::lifecycle::Shutdown;
use crate::net::{load_tls_acceptor, Listener, ListenerError, TlsError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Tls(#[from] TlsError),

    #[error(transparent)]
    Listener(#[from] ListenerError),
}

/// Run the gateway until the process receives a shutdown signal.
pub async fn run(config: GatewayConfig) -> Result<(), StartupError> {
    run_until(config, crate::lifecycle::signals::shutdown_signal()).await
}

/// Run the gateway until `stop` resolves.
pub async fn run_until<F>(config: GatewayConfig, stop: F) -> Result<(), StartupError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let tls = &config.listener.tls;
    let acceptor = load_tls_acceptor(&tls.cert_path, &tls.key_path)?;
    let listener = Listener::bind(&config.listener).await?;

    tracing::info!(
        address = %config.listener.address,
        port = config.listener.port,
        connect_timeout_secs = config.timeouts.connect_secs,
        download_timeout_secs = config.timeouts.download_secs,
        unfiltered = config.conversion.unfiltered,
        "Starting server"
    );

    let shutdown = Shutdown::new();
    let server = GeminiServer::new(&config, acceptor);
    let server_shutdown = shutdown.subscribe();

    let trigger = shutdown.clone();
    tokio::spawn(async move {
        stop.await;
        trigger.trigger();
    });

    server.run(listener, server_shutdown).await?;
    Ok(())
}
