//! Direct TCP transport to a projector.
//!
//! [`TcpTransport::connect`] opens the socket, runs the authentication
//! handshake and returns a ready transport; nothing partially connected is
//! ever handed back to the caller.
//!
//! # Architecture
//!
//! ```text
//! ProjectorClient
//!     │
//!     └─> TcpTransport ───(TCP)───> Projector
//!            │
//!            ├─> handshake: read_exact / write_all on the raw halves
//!            └─> packets:   FramedRead<PacketCodec> + write half
//! ```
//!
//! # Failure Handling
//!
//! The transport is fail-fast. Any error during the handshake or an exchange
//! (timeout, closed socket, malformed or mismatched packet) shuts the
//! transport down with that error; every later call fails immediately with the
//! same error. Retrying is up to the caller, or to
//! [`ReconnectTransport`](crate::ReconnectTransport).
//!
//! # Timeout Handling
//!
//! Connect, every read and every write carry the configured timeout
//! (default 2 s). Expiry surfaces as `Error::Timeout`.

use std::net::SocketAddr;
use std::time::Duration;

use futures::StreamExt;
use jvc_core::constants::{
    HANDSHAKE_MESSAGE_LENGTH, PASSWORD_SEPARATOR, PJ_OK, PJACK, PJNAK, PJREQ,
};
use jvc_core::{Error, Result};
use jvc_protocol::{Packet, PacketCodec};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::Mutex;
use tokio_util::codec::FramedRead;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::transport::{ResponsePackets, TerminalStatus, Transport};

struct Connection {
    reader: FramedRead<OwnedReadHalf, PacketCodec>,
    writer: OwnedWriteHalf,
}

/// Authenticated TCP connection to a projector.
pub struct TcpTransport {
    peer_addr: SocketAddr,
    timeout: Duration,
    transaction_lock: Mutex<()>,
    connection: Mutex<Option<Connection>>,
    status: TerminalStatus,
    cancel: CancellationToken,
}

impl TcpTransport {
    /// Connect to `addr` and authenticate.
    ///
    /// An empty `password` is treated as no password.
    ///
    /// # Errors
    ///
    /// - `Error::Connect` if the TCP connection cannot be opened
    /// - `Error::Timeout` if connect or a handshake step takes too long
    /// - `Error::HandshakeFailed` if the projector does not speak the protocol
    /// - `Error::AuthenticationFailed` if the projector rejects the password
    ///
    /// # Example
    ///
    /// ```no_run
    /// use jvc_network::{TcpTransport, Transport};
    /// use jvc_protocol::Command;
    /// use std::time::Duration;
    ///
    /// # async fn example() -> jvc_core::Result<()> {
    /// let transport = TcpTransport::connect(
    ///     "192.168.1.50:20554".parse().unwrap(),
    ///     Some("secret"),
    ///     Duration::from_secs(2),
    /// )
    /// .await?;
    ///
    /// let command = Command::from_name("power_status.query", b"")?;
    /// let packets = transport.transact(command.packet()).await?;
    /// let response = packets.into_response(command)?;
    /// println!("{:?}", response.response_str());
    ///
    /// transport.shutdown(None);
    /// transport.wait().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(
        addr: SocketAddr,
        password: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        info!(%addr, "Connecting to projector");

        let stream = match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                warn!(%addr, error = %e, "Connection failed");
                return Err(Error::Connect {
                    addr: addr.to_string(),
                    reason: e.to_string(),
                });
            }
            Err(_) => {
                warn!(%addr, timeout_ms = timeout.as_millis(), "Connection timeout");
                return Err(Error::Timeout {
                    operation: "connect",
                    timeout,
                });
            }
        };

        if let Err(e) = stream.set_nodelay(true) {
            warn!(error = %e, "Failed to set TCP_NODELAY");
        }

        let (read_half, writer) = stream.into_split();
        let transport = TcpTransport {
            peer_addr: addr,
            timeout,
            transaction_lock: Mutex::new(()),
            connection: Mutex::new(Some(Connection {
                reader: FramedRead::new(read_half, PacketCodec::new()),
                writer,
            })),
            status: TerminalStatus::new(),
            cancel: CancellationToken::new(),
        };

        if let Err(e) = transport.handshake(password).await {
            warn!(%addr, error = %e, "Handshake failed");
            transport.shutdown(Some(e.clone()));
            return Err(e);
        }

        info!(%addr, "Projector connection ready");
        Ok(transport)
    }

    #[must_use]
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn handshake(&self, password: Option<&str>) -> Result<()> {
        let _guard = self.transaction_lock.lock().await;
        let mut connection = self.connection.lock().await;
        let Some(conn) = connection.as_mut() else {
            return Err(self.status.error());
        };
        // The codec has not been polled yet, so its buffer is empty and the
        // raw half can be read directly.
        let reader = conn.reader.get_mut();

        let greeting = read_handshake_message(reader, self.timeout, "greeting").await?;
        if greeting != *PJ_OK {
            return Err(Error::HandshakeFailed(format!(
                "expected PJ_OK greeting, got {}",
                hex::encode(greeting)
            )));
        }
        debug!(addr = %self.peer_addr, "Received greeting");

        let mut request = PJREQ.to_vec();
        if let Some(password) = password.filter(|p| !p.is_empty()) {
            request.push(PASSWORD_SEPARATOR);
            request.extend_from_slice(password.as_bytes());
        }
        write_with_timeout(&mut conn.writer, &request, self.timeout).await?;

        let reply = read_handshake_message(conn.reader.get_mut(), self.timeout, "auth reply").await?;
        if reply == *PJNAK {
            return Err(Error::AuthenticationFailed);
        }
        if reply != *PJACK {
            return Err(Error::HandshakeFailed(format!(
                "expected PJACK, got {}",
                hex::encode(reply)
            )));
        }
        debug!(addr = %self.peer_addr, "Authenticated");
        Ok(())
    }

    async fn exchange(conn: &mut Connection, packet: &Packet, timeout: Duration) -> Result<ResponsePackets> {
        trace!(packet = %hex::encode(packet.raw_bytes()), "Sending command");
        write_with_timeout(&mut conn.writer, packet.raw_bytes(), timeout).await?;

        let basic = read_packet(&mut conn.reader, timeout).await?;
        if basic.is_advanced_response() {
            return Err(Error::ProtocolViolation(format!(
                "advanced response {basic} arrived before the basic acknowledgement"
            )));
        }
        if !basic.is_basic_response() {
            return Err(Error::ProtocolViolation(format!(
                "expected basic response, got {basic}"
            )));
        }
        if basic.command_code() != packet.command_code() {
            return Err(Error::ProtocolViolation(format!(
                "response code {} does not match command code {}",
                basic.command_code(),
                packet.command_code()
            )));
        }

        let advanced = if packet.is_advanced_command() {
            let advanced = read_packet(&mut conn.reader, timeout).await?;
            if !advanced.is_advanced_response() {
                return Err(Error::ProtocolViolation(format!(
                    "expected advanced response, got {advanced}"
                )));
            }
            if advanced.command_code() != packet.command_code() {
                return Err(Error::ProtocolViolation(format!(
                    "advanced response code {} does not match command code {}",
                    advanced.command_code(),
                    packet.command_code()
                )));
            }
            Some(advanced)
        } else {
            None
        };

        Ok(ResponsePackets { basic, advanced })
    }
}

impl Transport for TcpTransport {
    fn transaction_lock(&self) -> &Mutex<()> {
        &self.transaction_lock
    }

    async fn transact_no_lock(&self, packet: &Packet) -> Result<ResponsePackets> {
        if self.is_shutting_down() {
            return Err(self.status.error());
        }

        let mut connection = self.connection.lock().await;
        let result = match connection.as_mut() {
            None => Err(self.status.error()),
            Some(conn) => tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Err(self.status.error()),
                result = Self::exchange(conn, packet, self.timeout) => result,
            },
        };

        if let Err(e) = &result {
            connection.take();
            if !self.is_shutting_down() {
                warn!(addr = %self.peer_addr, error = %e, "Transaction failed, closing transport");
            }
            self.shutdown(Some(e.clone()));
        }
        result
    }

    fn shutdown(&self, error: Option<Error>) {
        if !self.status.resolve(error) {
            return;
        }

        debug!(addr = %self.peer_addr, "Shutting down transport");
        self.cancel.cancel();
        // Pending operations hold the connection and drop it themselves
        // once cancelled.
        if let Ok(mut connection) = self.connection.try_lock() {
            connection.take();
        }
    }

    fn is_shutting_down(&self) -> bool {
        self.status.is_resolved()
    }

    async fn wait(&self) -> Result<()> {
        self.status.wait().await
    }
}

impl std::fmt::Debug for TcpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TcpTransport")
            .field("peer_addr", &self.peer_addr)
            .field("timeout", &self.timeout)
            .field("shutting_down", &self.is_shutting_down())
            .finish()
    }
}

async fn read_handshake_message(
    reader: &mut OwnedReadHalf,
    timeout: Duration,
    what: &str,
) -> Result<[u8; HANDSHAKE_MESSAGE_LENGTH]> {
    let mut buf = [0u8; HANDSHAKE_MESSAGE_LENGTH];
    match tokio::time::timeout(timeout, reader.read_exact(&mut buf)).await {
        Ok(Ok(_)) => Ok(buf),
        Ok(Err(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => Err(Error::HandshakeFailed(
            format!("connection closed while waiting for {what}"),
        )),
        Ok(Err(e)) => Err(e.into()),
        Err(_) => Err(Error::Timeout {
            operation: "handshake read",
            timeout,
        }),
    }
}

async fn write_with_timeout(writer: &mut OwnedWriteHalf, bytes: &[u8], timeout: Duration) -> Result<()> {
    let write = async {
        writer.write_all(bytes).await?;
        writer.flush().await
    };
    match tokio::time::timeout(timeout, write).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(e.into()),
        Err(_) => Err(Error::Timeout {
            operation: "write",
            timeout,
        }),
    }
}

async fn read_packet(
    reader: &mut FramedRead<OwnedReadHalf, PacketCodec>,
    timeout: Duration,
) -> Result<Packet> {
    match tokio::time::timeout(timeout, reader.next()).await {
        Ok(Some(Ok(packet))) => {
            trace!(packet = %hex::encode(packet.raw_bytes()), "Received packet");
            Ok(packet)
        }
        Ok(Some(Err(e))) => Err(e),
        Ok(None) => Err(Error::ConnectionClosed(
            "projector closed the connection".to_string(),
        )),
        Err(_) => Err(Error::Timeout {
            operation: "read",
            timeout,
        }),
    }
}
