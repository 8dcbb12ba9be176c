//! TCP transport implementation using tokio.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::{Connection, TransportError, RECV_CHUNK_SIZE};

/// Port the hub's command-line interface listens on by default.
pub const DEFAULT_PORT: u16 = 9090;

/// A [`Connection`] over one TCP stream to the hub.
///
/// The stream is held in an `Option` so [`close`](Connection::close) can
/// release it early; dropping the connection releases it as well.
#[derive(Debug)]
pub struct TcpConnection {
    addr: String,
    stream: Option<TcpStream>,
}

impl TcpConnection {
    /// Opens a TCP connection to `host:port`.
    ///
    /// # Errors
    /// Returns [`TransportError::ConnectFailed`] when the host does not
    /// resolve, refuses the connection, or is unreachable.
    pub async fn connect(host: &str, port: u16) -> Result<Self, TransportError> {
        let addr = format!("{host}:{port}");
        let stream = TcpStream::connect((host, port)).await.map_err(|source| {
            TransportError::ConnectFailed {
                addr: addr.clone(),
                source,
            }
        })?;
        tracing::info!(%addr, "connected to hub");
        Ok(Self {
            addr,
            stream: Some(stream),
        })
    }

    /// Returns `true` until [`close`](Connection::close) has been called.
    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    fn stream(&mut self) -> Result<&mut TcpStream, TransportError> {
        self.stream.as_mut().ok_or(TransportError::Closed)
    }
}

impl Connection for TcpConnection {
    type Error = TransportError;

    async fn send(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        let stream = self.stream()?;
        stream
            .write_all(data)
            .await
            .map_err(TransportError::SendFailed)?;
        stream.flush().await.map_err(TransportError::SendFailed)
    }

    async fn recv(&mut self) -> Result<Option<Vec<u8>>, Self::Error> {
        let stream = self.stream()?;
        let mut buf = vec![0u8; RECV_CHUNK_SIZE];
        let n = stream
            .read(&mut buf)
            .await
            .map_err(TransportError::ReceiveFailed)?;
        if n == 0 {
            return Ok(None);
        }
        buf.truncate(n);
        tracing::trace!(addr = %self.addr, bytes = n, "received chunk");
        Ok(Some(buf))
    }

    async fn close(&mut self) -> Result<(), Self::Error> {
        let Some(mut stream) = self.stream.take() else {
            return Ok(());
        };
        // The socket is released when `stream` drops, even if the
        // shutdown handshake fails.
        if let Err(e) = stream.shutdown().await {
            tracing::debug!(addr = %self.addr, error = %e, "shutdown failed");
        }
        tracing::info!(addr = %self.addr, "connection closed");
        Ok(())
    }

    fn peer(&self) -> &str {
        &self.addr
    }
}
