//! Socket Destination Adapter
//!
//! Forwards records over a TCP, UDP or unix-domain socket.

use crate::domain::entities::{EndpointState, Record};
use crate::domain::error::RelayError;
use crate::domain::ports::Destination;
use crate::domain::value_objects::{Address, TransportKind};
use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use tokio::io::AsyncWriteExt;
#[cfg(unix)]
use tokio::net::UnixStream;
use tokio::net::{TcpStream, UdpSocket};

/// Dialed outbound socket.
enum Connection {
    Tcp(TcpStream),
    Udp(UdpSocket),
    #[cfg(unix)]
    Unix(UnixStream),
}

impl Connection {
    async fn dial(address: &Address) -> io::Result<Self> {
        match address.kind {
            TransportKind::Tcp => Ok(Self::Tcp(TcpStream::connect(&address.address).await?)),
            TransportKind::Udp => {
                let target = tokio::net::lookup_host(&address.address)
                    .await?
                    .next()
                    .ok_or_else(|| {
                        io::Error::new(io::ErrorKind::InvalidInput, "address resolved to nothing")
                    })?;
                let local: SocketAddr = if target.is_ipv4() {
                    ([0u8; 4], 0).into()
                } else {
                    ([0u16; 8], 0).into()
                };
                let socket = UdpSocket::bind(local).await?;
                socket.connect(target).await?;
                Ok(Self::Udp(socket))
            }
            #[cfg(unix)]
            TransportKind::Unix => Ok(Self::Unix(UnixStream::connect(&address.address).await?)),
            #[cfg(not(unix))]
            TransportKind::Unix => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "unix-domain sockets are not available on this platform",
            )),
        }
    }

    async fn send(&mut self, bytes: &[u8]) -> io::Result<()> {
        match self {
            Self::Tcp(stream) => stream.write_all(bytes).await,
            Self::Udp(socket) => socket.send(bytes).await.map(|_| ()),
            #[cfg(unix)]
            Self::Unix(stream) => stream.write_all(bytes).await,
        }
    }

    async fn shutdown(&mut self) -> io::Result<()> {
        match self {
            Self::Tcp(stream) => stream.shutdown().await,
            Self::Udp(_) => Ok(()),
            #[cfg(unix)]
            Self::Unix(stream) => stream.shutdown().await,
        }
    }
}

/// Socket destination.
///
/// Dials the resolved address on the first write and sends each record
/// verbatim, without adding a delimiter. Failures are logged and swallowed;
/// a failed send drops the connection so the next record re-dials.
pub struct SocketDestination {
    address: Address,
    connection: EndpointState<Connection>,
}

impl SocketDestination {
    /// Create a new socket destination. No connection is made yet.
    pub fn new(address: &str) -> Self {
        Self {
            address: Address::resolve(address),
            connection: EndpointState::Unacquired,
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Whether a connection is currently established.
    pub fn is_connected(&self) -> bool {
        self.connection.is_acquired()
    }

    async fn connect(&self) -> Result<Connection, RelayError> {
        Connection::dial(&self.address)
            .await
            .map_err(|source| RelayError::Connect {
                address: self.address.to_string(),
                source,
            })
    }
}

#[async_trait]
impl Destination for SocketDestination {
    async fn write_record(&mut self, record: &Record) -> Result<(), RelayError> {
        if self.connection.is_closed() {
            tracing::warn!(address = %self.address, "dropping record for closed socket destination");
            return Ok(());
        }

        if !self.connection.is_acquired() {
            match self.connect().await {
                Ok(connection) => {
                    tracing::debug!(address = %self.address, "socket destination connected");
                    self.connection.acquire(connection);
                }
                Err(e) => {
                    tracing::warn!(address = %self.address, error = %e, "failed to connect socket destination");
                    return Ok(());
                }
            }
        }

        let Some(connection) = self.connection.get_mut() else {
            return Ok(());
        };

        if let Err(e) = connection.send(record.as_bytes()).await {
            tracing::error!(address = %self.address, error = %e, "failed to write to socket destination");
            self.connection.invalidate();
        }

        Ok(())
    }

    async fn close(&mut self) -> Result<(), RelayError> {
        match self.connection.close() {
            Some(mut connection) => {
                tracing::debug!(address = %self.address, "socket destination closed");
                connection.shutdown().await.map_err(RelayError::Write)
            }
            None => Ok(()),
        }
    }

    fn describe(&self) -> String {
        format!("socket:{}", self.address)
    }
}
