//! Readiness listener: a TCP black hole.
//!
//! # Responsibilities
//! - Bind to `0.0.0.0:<readiness_port>`
//! - Accept connections forever
//! - Read at most 64 bytes from each, discard them, close
//! - Keep serving after accept or read errors

use std::convert::Infallible;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};

use crate::config::DevnetConfig;
use crate::net::connection::ConnectionTracker;

/// Bytes read from each readiness connection before it is closed.
pub const DISCARD_READ_LIMIT: usize = 64;

/// Pause after a failed accept so descriptor exhaustion doesn't spin.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(50);

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Failed to bind to address.
    #[error("failed to bind readiness listener on {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },
}

/// Listener settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Bind address (e.g., "0.0.0.0:2000").
    pub bind_address: String,

    /// Upper bound on the per-connection read. `None` waits for 64 bytes
    /// or EOF however long that takes.
    pub read_timeout: Option<Duration>,
}

impl ListenerOptions {
    pub fn from_config(config: &DevnetConfig) -> Self {
        Self {
            bind_address: config.readiness_address(),
            read_timeout: None,
        }
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }
}

impl Default for ListenerOptions {
    fn default() -> Self {
        Self::from_config(&DevnetConfig::default())
    }
}

/// A bound readiness listener.
pub struct ReadinessListener {
    inner: TcpListener,
    read_timeout: Option<Duration>,
    tracker: ConnectionTracker,
}

impl ReadinessListener {
    /// Bind the listening socket. Failure is returned, not retried.
    pub async fn bind(options: &ListenerOptions) -> Result<Self, ListenerError> {
        let bind_err = |source: io::Error| ListenerError::Bind {
            address: options.bind_address.clone(),
            source,
        };

        let listener = TcpListener::bind(options.bind_address.as_str())
            .await
            .map_err(bind_err)?;
        let local_addr = listener.local_addr().map_err(bind_err)?;

        tracing::info!(
            address = %local_addr,
            read_timeout_ms = options.read_timeout.map(|t| t.as_millis() as u64),
            "Readiness listener bound"
        );

        Ok(Self {
            inner: listener,
            read_timeout: options.read_timeout,
            tracker: ConnectionTracker::new(),
        })
    }

    /// Get the local address this listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, io::Error> {
        self.inner.local_addr()
    }

    /// Handle on the connection counters.
    pub fn tracker(&self) -> ConnectionTracker {
        self.tracker.clone()
    }

    /// Accept and discard connections forever.
    ///
    /// Each connection is handled inline, so a client that neither sends
    /// 64 bytes nor closes holds up the next accept unless a read timeout
    /// is configured.
    pub async fn serve(self) -> Infallible {
        loop {
            let (stream, peer_addr) = match self.inner.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to accept readiness connection");
                    tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                    continue;
                }
            };

            let guard = self.tracker.track();
            tracing::debug!(
                connection_id = %guard.id(),
                peer_addr = %peer_addr,
                "Readiness client connected"
            );

            match discard(stream, self.read_timeout).await {
                Ok(bytes) => {
                    tracing::trace!(connection_id = %guard.id(), bytes, "Readiness data discarded")
                }
                Err(e) => tracing::debug!(
                    connection_id = %guard.id(),
                    error = %e,
                    "Readiness read failed"
                ),
            }
        }
    }
}

/// Read up to [`DISCARD_READ_LIMIT`] bytes, then drop the stream.
///
/// The stream is owned here, so it is closed on every return path.
async fn discard(stream: TcpStream, read_timeout: Option<Duration>) -> io::Result<usize> {
    let mut sink = Vec::with_capacity(DISCARD_READ_LIMIT);
    let mut limited = stream.take(DISCARD_READ_LIMIT as u64);
    let read = limited.read_to_end(&mut sink);

    match read_timeout {
        None => read.await,
        Some(limit) => tokio::time::timeout(limit, read)
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "readiness read timed out"))?,
    }
}

/// Bind the configured readiness port and serve it forever.
///
/// Only returns if binding fails.
pub async fn readiness(config: &DevnetConfig) -> Result<Infallible, ListenerError> {
    let listener = ReadinessListener::bind(&ListenerOptions::from_config(config)).await?;
    Ok(listener.serve().await)
}
