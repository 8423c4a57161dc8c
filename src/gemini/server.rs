//! Gemini server.
//!
//! # Responsibilities
//! - Accept connections from the bounded listener
//! - Run the TLS handshake and read the request line under a deadline
//! - Hand the request to the `RequestHandler` and write its response
//! - Stop accepting on shutdown and drain in-flight connections
//!
//! # Design Decisions
//! - One task per connection; a failing connection never affects another
//! - Malformed requests get `59 Bad request`; a client that stalls before
//!   sending a request is disconnected without a response

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::broadcast;
use tokio::time::timeout;
use tokio_rustls::TlsAcceptor;
use tracing::Instrument;

use crate::config::GatewayConfig;
use crate::gemini::request::{GeminiRequest, RequestError};
use crate::gemini::response::{GeminiResponse, Status};
use crate::net::{ConnectionId, ConnectionPermit, Listener, ListenerError};
use crate::observability::tracing::connection_span;
use crate::proxy::RequestHandler;

/// Error type for a single connection.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("TLS handshake failed: {0}")]
    Handshake(#[source] std::io::Error),

    #[error("client did not send a request within {0:?}")]
    Timeout(Duration),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Gemini server for the gateway.
pub struct GeminiServer {
    handler: Arc<RequestHandler>,
    acceptor: TlsAcceptor,
    request_timeout: Duration,
    shutdown_grace: Duration,
}

impl GeminiServer {
    pub fn new(config: &GatewayConfig, acceptor: TlsAcceptor) -> Self {
        Self::with_handler(config, acceptor, RequestHandler::new(config))
    }

    pub fn with_handler(config: &GatewayConfig, acceptor: TlsAcceptor, handler: RequestHandler) -> Self {
        Self {
            handler: Arc::new(handler),
            acceptor,
            request_timeout: config.timeouts.request_read(),
            shutdown_grace: config.timeouts.shutdown_grace(),
        }
    }

    /// Serve until `shutdown` fires, then wait for open connections.
    pub async fn run(
        self,
        listener: Listener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ListenerError> {
        let addr = listener.local_addr().map_err(ListenerError::Accept)?;
        tracing::info!(address = %addr, "Gemini server starting");

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer, permit)) => self.spawn_connection(stream, peer, permit),
                    Err(ListenerError::Accept(e)) => {
                        tracing::warn!(error = %e, "Accept failed");
                    }
                    Err(e) => return Err(e),
                },
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown signal received, no longer accepting");
                    break;
                }
            }
        }

        if listener.drain(self.shutdown_grace).await {
            tracing::info!("All connections drained");
        }
        tracing::info!("Gemini server stopped");
        Ok(())
    }

    fn spawn_connection(&self, stream: TcpStream, peer: SocketAddr, permit: ConnectionPermit) {
        let acceptor = self.acceptor.clone();
        let handler = Arc::clone(&self.handler);
        let request_timeout = self.request_timeout;
        let span = connection_span(ConnectionId::new(), peer);

        tokio::spawn(
            async move {
                let _permit = permit;
                if let Err(e) = handle_tls(acceptor, stream, &handler, request_timeout).await {
                    tracing::debug!(error = %e, "Connection ended with error");
                }
            }
            .instrument(span),
        );
    }
}

async fn handle_tls(
    acceptor: TlsAcceptor,
    stream: TcpStream,
    handler: &RequestHandler,
    request_timeout: Duration,
) -> Result<(), ConnectionError> {
    let mut tls = timeout(request_timeout, acceptor.accept(stream))
        .await
        .map_err(|_| ConnectionError::Timeout(request_timeout))?
        .map_err(ConnectionError::Handshake)?;

    serve_connection(&mut tls, handler, request_timeout).await?;
    tls.shutdown().await?;
    Ok(())
}

/// Read one request from `stream`, answer it and flush.
///
/// Works on any byte stream; the TLS layer is applied by the caller.
pub async fn serve_connection<S>(
    stream: &mut S,
    handler: &RequestHandler,
    request_timeout: Duration,
) -> Result<(), ConnectionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let response = match timeout(request_timeout, GeminiRequest::read_from(stream)).await {
        Err(_) => return Err(ConnectionError::Timeout(request_timeout)),
        Ok(Err(RequestError::Io(e))) => return Err(ConnectionError::Io(e)),
        Ok(Err(e)) => {
            tracing::info!(error = %e, "Bad request");
            GeminiResponse::failure(Status::BadRequest, "Bad request")
        }
        Ok(Ok(request)) => handler.handle(&request).await,
    };

    tracing::info!(
        status = response.status().code(),
        meta = %response.meta(),
        size = response.body().map(|b| b.len()).unwrap_or(0),
        "Responding"
    );
    response.write_to(stream).await?;
    Ok(())
}
