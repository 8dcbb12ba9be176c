//! Transport layer for the squeeze hub client.
//!
//! Provides the [`Connection`] trait, which abstracts the single byte
//! stream a session talks over, and [`TcpConnection`], the real
//! implementation on top of a tokio `TcpStream`.
//!
//! # Framing
//!
//! The hub speaks a line-oriented protocol, but this layer does not
//! reassemble lines. [`Connection::await_response`] returns the first
//! non-empty chunk from one read and treats it as the whole response.
//! Responses that exceed one read (see [`RECV_CHUNK_SIZE`]) or arrive in
//! several segments are truncated. This is a known limitation kept on
//! purpose; callers parse strictly and reject what does not fit.

#![allow(async_fn_in_trait)]

mod error;
mod tcp;

pub use error::TransportError;
pub use tcp::{TcpConnection, DEFAULT_PORT};

use std::time::Duration;

/// Maximum number of bytes returned by one [`Connection::recv`].
pub const RECV_CHUNK_SIZE: usize = 4096;

/// A single connection that can send commands and read responses.
///
/// A connection is owned exclusively by one session, so every method
/// takes `&mut self` and no locking is involved.
pub trait Connection: Send + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Writes all of `data` to the remote peer.
    async fn send(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Performs one read of at most [`RECV_CHUNK_SIZE`] bytes.
    ///
    /// Returns `Ok(None)` when the peer has closed the connection.
    async fn recv(&mut self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Closes the connection. Calling it again is a no-op.
    async fn close(&mut self) -> Result<(), Self::Error>;

    /// Human-readable peer description, used in log fields.
    fn peer(&self) -> &str;

    /// Sends one protocol command line.
    async fn send_command(&mut self, line: &str) -> Result<(), Self::Error> {
        tracing::debug!(peer = self.peer(), command = line.trim_end(), "sending command");
        self.send(line.as_bytes()).await
    }

    /// Waits up to `timeout` for the response to the last command.
    ///
    /// The timer starts when this is called. Returns the first chunk read,
    /// or `Ok(None)` if nothing arrived before the deadline. A peer that
    /// closes the connection can never answer, so that also returns
    /// `Ok(None)`, without waiting out the deadline.
    async fn await_response(
        &mut self,
        timeout: Duration,
    ) -> Result<Option<Vec<u8>>, Self::Error> {
        match tokio::time::timeout(timeout, self.recv()).await {
            Ok(Ok(Some(data))) => Ok(Some(data)),
            Ok(Ok(None)) => {
                tracing::debug!(peer = self.peer(), "peer closed before responding");
                Ok(None)
            }
            Ok(Err(e)) => Err(e),
            Err(_) => {
                tracing::debug!(
                    peer = self.peer(),
                    timeout_ms = timeout.as_millis() as u64,
                    "no response before deadline"
                );
                Ok(None)
            }
        }
    }
}
