//! Socket Source Adapter
//!
//! Listens on a TCP or unix-domain address and reads newline-delimited
//! records from a single accepted client.

use super::read_line_record;
use crate::domain::entities::{EndpointState, Record};
use crate::domain::error::RelayError;
use crate::domain::ports::Source;
use crate::domain::value_objects::{Address, TransportKind};
use async_trait::async_trait;
use std::io;
#[cfg(unix)]
use std::path::PathBuf;
use tokio::io::{AsyncRead, BufReader};
use tokio::net::TcpListener;
#[cfg(unix)]
use tokio::net::UnixListener;

type Connection = BufReader<Box<dyn AsyncRead + Send + Unpin>>;

/// Bound listening socket.
enum Listener {
    Tcp(TcpListener),
    #[cfg(unix)]
    Unix { listener: UnixListener, path: PathBuf },
}

impl Listener {
    async fn bind(address: &Address) -> io::Result<Self> {
        match address.kind {
            TransportKind::Tcp => Ok(Self::Tcp(TcpListener::bind(&address.address).await?)),
            #[cfg(unix)]
            TransportKind::Unix => {
                let path = PathBuf::from(&address.address);
                let listener = UnixListener::bind(&path)?;
                Ok(Self::Unix { listener, path })
            }
            _ => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("cannot listen on {} sockets", address.kind),
            )),
        }
    }

    async fn accept(&self) -> io::Result<(Connection, String)> {
        match self {
            Self::Tcp(listener) => {
                let (stream, peer) = listener.accept().await?;
                let reader: Box<dyn AsyncRead + Send + Unpin> = Box::new(stream);
                Ok((BufReader::new(reader), peer.to_string()))
            }
            #[cfg(unix)]
            Self::Unix { listener, path } => {
                let (stream, _) = listener.accept().await?;
                let reader: Box<dyn AsyncRead + Send + Unpin> = Box::new(stream);
                Ok((BufReader::new(reader), path.display().to_string()))
            }
        }
    }
}

#[cfg(unix)]
impl Drop for Listener {
    fn drop(&mut self) {
        if let Self::Unix { path, .. } = self {
            if let Err(e) = std::fs::remove_file(path.as_path()) {
                if e.kind() != io::ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), error = %e, "failed to remove socket file");
                }
            }
        }
    }
}

/// Socket-backed source.
///
/// Binds and listens on the first read, then accepts exactly one client.
/// Once that client disconnects every further read reports `EndOfStream`;
/// the source never goes back to accept a second client.
pub struct SocketSource {
    address: Address,
    listener: EndpointState<Listener>,
    connection: EndpointState<Connection>,
    pending: Vec<u8>,
}

impl SocketSource {
    /// Create a new socket source. Nothing is bound yet.
    pub fn new(address: &str) -> Self {
        Self {
            address: Address::resolve(address),
            listener: EndpointState::Unacquired,
            connection: EndpointState::Unacquired,
            pending: Vec::new(),
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Whether the listening socket is bound.
    pub fn is_listening(&self) -> bool {
        self.listener.is_acquired()
    }

    /// Whether a client connection has been accepted.
    pub fn is_connected(&self) -> bool {
        self.connection.is_acquired()
    }

    async fn ensure_listening(&mut self) -> Result<(), RelayError> {
        if self.listener.is_acquired() {
            return Ok(());
        }
        if self.address.kind == TransportKind::Udp {
            return Err(RelayError::UnsupportedTransport {
                kind: TransportKind::Udp,
                role: "source",
            });
        }

        let listener = Listener::bind(&self.address)
            .await
            .map_err(|source| RelayError::Listen {
                address: self.address.to_string(),
                source,
            })?;

        tracing::info!(address = %self.address, "socket source listening");
        self.listener.acquire(listener);
        Ok(())
    }

    async fn ensure_connected(&mut self) -> Result<(), RelayError> {
        if self.connection.is_acquired() {
            return Ok(());
        }
        self.ensure_listening().await?;

        let listener = self.listener.get_mut().ok_or(RelayError::Closed)?;
        let (connection, peer) =
            listener
                .accept()
                .await
                .map_err(|source| RelayError::Accept {
                    address: self.address.to_string(),
                    source,
                })?;

        tracing::info!(address = %self.address, peer = %peer, "socket source accepted client");
        self.connection.acquire(connection);
        Ok(())
    }
}

#[async_trait]
impl Source for SocketSource {
    async fn read_record(&mut self) -> Result<Record, RelayError> {
        if self.connection.is_closed() {
            return Err(RelayError::Closed);
        }

        self.ensure_connected().await?;

        let connection = self.connection.get_mut().ok_or(RelayError::Closed)?;
        read_line_record(connection, &mut self.pending).await
    }

    async fn close(&mut self) -> Result<(), RelayError> {
        let had_connection = self.connection.close().is_some();
        let had_listener = self.listener.close().is_some();
        self.pending.clear();

        if had_connection || had_listener {
            tracing::debug!(address = %self.address, "socket source closed");
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("socket:{}", self.address)
    }
}
