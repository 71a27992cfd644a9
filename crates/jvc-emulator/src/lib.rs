//! JVC projector emulator.
//!
//! A TCP server speaking the projector control protocol, for testing
//! clients without hardware. It performs the `PJ_OK` / `PJREQ` / `PJACK`
//! handshake, answers status queries from its own state and walks the
//! power cycle (`Standby → Warming → On → Cooling → Standby`) on timers.
//!
//! # Modules
//!
//! - `session`: sans-IO per-connection state machine
//! - `connection`: drives a session over a socket
//! - `dispatcher`: single-consumer command queue and projector state
//! - `server`: [`Emulator`] lifecycle and accept loop
//! - `config`: [`EmulatorConfig`]

mod config;
mod connection;
mod dispatcher;
mod server;
pub mod session;

pub use config::EmulatorConfig;
pub use connection::{SessionId, SessionInfo};
pub use dispatcher::{CommandOutcome, ProjectorState, response_packets};
pub use server::Emulator;
pub use session::{SessionAction, SessionMachine, SessionState, SessionTimer};
