//! Network layer for JVC projector control.
//!
//! This crate connects to projectors over TCP, performs the `PJ_OK` /
//! `PJREQ` / `PJACK` handshake and exchanges command packets with the
//! framing from `jvc-protocol`.
//!
//! # Components
//!
//! - **Transport**: packet-level contract with a transaction lock
//! - **TcpTransport**: one authenticated TCP connection, fail-fast
//! - **ReconnectTransport**: reconnects on demand, disconnects when idle
//! - **ProjectorClient**: command names, status decoding, power sequencing
//! - **ClientConfig** / **HostSpec**: settings and address resolution
//!
//! # Example
//!
//! ```no_run
//! use jvc_network::{ClientConfig, ProjectorClient};
//!
//! # async fn example() -> jvc_core::Result<()> {
//! let config = ClientConfig {
//!     host: Some("192.168.1.50".into()),
//!     ..Default::default()
//! };
//! let client = ProjectorClient::connect(&config).await?;
//! println!("Power: {}", client.power_status().await?);
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod connector;
mod reconnect;
mod resolve;
mod tcp_transport;
mod transport;

pub use client::ProjectorClient;
pub use config::ClientConfig;
pub use connector::{ClientTransport, TcpConnector};
pub use reconnect::{Connector, ReconnectTransport};
pub use resolve::{Discovery, HostSpec, NoDiscovery, resolve_host};
pub use tcp_transport::TcpTransport;
pub use transport::{ResponsePackets, Transaction, Transport};
