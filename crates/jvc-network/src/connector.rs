//! Connectors and the client's transport selection.

use std::sync::Arc;
use std::time::Duration;

use jvc_core::{Error, Result};
use jvc_protocol::Packet;
use tokio::sync::Mutex;

use crate::config::ClientConfig;
use crate::reconnect::{Connector, ReconnectTransport};
use crate::resolve::{Discovery, HostSpec, NoDiscovery, resolve_host};
use crate::tcp_transport::TcpTransport;
use crate::transport::{ResponsePackets, Transport};

/// Opens authenticated [`TcpTransport`]s to one projector.
///
/// The host specifier is resolved again on every connect, so a projector
/// that changes address (DHCP, rediscovery) is followed.
#[derive(Clone)]
pub struct TcpConnector {
    host: HostSpec,
    default_port: u16,
    password: Option<String>,
    timeout: Duration,
    discovery: Arc<dyn Discovery>,
}

impl TcpConnector {
    pub fn new(host: HostSpec, default_port: u16, password: Option<String>, timeout: Duration) -> Self {
        Self {
            host,
            default_port,
            password: password.filter(|p| !p.is_empty()),
            timeout,
            discovery: Arc::new(NoDiscovery),
        }
    }

    /// Build a connector from client settings.
    ///
    /// # Errors
    /// Returns `Error::InvalidHost` if the configured host does not parse.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self::new(
            config.host_spec()?,
            config.port,
            config.password().map(str::to_string),
            config.timeout,
        ))
    }

    /// Use `discovery` for `sddp://` host specifiers.
    #[must_use]
    pub fn with_discovery(mut self, discovery: Arc<dyn Discovery>) -> Self {
        self.discovery = discovery;
        self
    }

    #[must_use]
    pub fn host(&self) -> &HostSpec {
        &self.host
    }
}

impl Connector for TcpConnector {
    type Transport = TcpTransport;

    async fn connect(&self) -> Result<TcpTransport> {
        let addr = resolve_host(&self.host, self.discovery.as_ref(), self.default_port).await?;
        TcpTransport::connect(addr, self.password.as_deref(), self.timeout).await
    }
}

impl std::fmt::Debug for TcpConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TcpConnector")
            .field("host", &self.host)
            .field("default_port", &self.default_port)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Transport used by [`ProjectorClient`](crate::ProjectorClient) by default:
/// one held connection, or reconnect on demand.
#[derive(Debug)]
pub enum ClientTransport {
    Direct(TcpTransport),
    Reconnecting(ReconnectTransport<TcpConnector>),
}

impl ClientTransport {
    /// Build the transport `config` asks for.
    ///
    /// With `auto_reconnect` no connection is made until the first command;
    /// otherwise the projector is connected and authenticated immediately.
    ///
    /// # Errors
    /// As [`TcpConnector::from_config`] and, without `auto_reconnect`,
    /// [`TcpTransport::connect`].
    pub async fn from_config(config: &ClientConfig, discovery: Option<Arc<dyn Discovery>>) -> Result<Self> {
        let mut connector = TcpConnector::from_config(config)?;
        if let Some(discovery) = discovery {
            connector = connector.with_discovery(discovery);
        }

        if config.auto_reconnect {
            Ok(ClientTransport::Reconnecting(ReconnectTransport::new(
                connector,
                config.idle_disconnect,
            )))
        } else {
            Ok(ClientTransport::Direct(connector.connect().await?))
        }
    }
}

impl Transport for ClientTransport {
    fn transaction_lock(&self) -> &Mutex<()> {
        match self {
            ClientTransport::Direct(t) => t.transaction_lock(),
            ClientTransport::Reconnecting(t) => t.transaction_lock(),
        }
    }

    async fn transact_no_lock(&self, packet: &Packet) -> Result<ResponsePackets> {
        match self {
            ClientTransport::Direct(t) => t.transact_no_lock(packet).await,
            ClientTransport::Reconnecting(t) => t.transact_no_lock(packet).await,
        }
    }

    fn shutdown(&self, error: Option<Error>) {
        match self {
            ClientTransport::Direct(t) => t.shutdown(error),
            ClientTransport::Reconnecting(t) => t.shutdown(error),
        }
    }

    fn is_shutting_down(&self) -> bool {
        match self {
            ClientTransport::Direct(t) => t.is_shutting_down(),
            ClientTransport::Reconnecting(t) => t.is_shutting_down(),
        }
    }

    async fn wait(&self) -> Result<()> {
        match self {
            ClientTransport::Direct(t) => t.wait().await,
            ClientTransport::Reconnecting(t) => t.wait().await,
        }
    }
}
