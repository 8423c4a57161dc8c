//! Connection spans.
//!
//! Every log line emitted while serving a connection carries its ID and
//! peer address through the enclosing span.

use std::net::SocketAddr;

use tracing::Span;

use crate::net::ConnectionId;

pub fn connection_span(id: ConnectionId, peer: SocketAddr) -> Span {
    tracing::info_span!("connection", id = %id, peer = %peer)
}
