use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// Broad classification of an [`Error`], used by callers to pick a policy
/// (retry, ask for a password, give up).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connection could not be made, was lost, or an operation timed out.
    Network,
    /// The peer sent bytes that violate the protocol, or a command was misused.
    Protocol,
    /// The projector rejected the password.
    Authentication,
    /// The projector is in a power state that prevents the operation.
    State,
    /// Invalid configuration, host specifier or model name.
    Configuration,
}

#[derive(Error, Debug, Clone)]
pub enum Error {
    // Packet and command errors
    #[error("Malformed packet: {0}")]
    MalformedPacket(String),

    #[error("Unknown command name: {0}")]
    UnknownCommand(String),

    #[error("Unrecognized command packet: {0}")]
    UnrecognizedCommand(String),

    #[error("Malformed command: {0}")]
    MalformedCommand(String),

    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),

    // Connection errors
    #[error("Failed to connect to {addr}: {reason}")]
    Connect { addr: String, reason: String },

    #[error("Connection closed: {0}")]
    ConnectionClosed(String),

    #[error("Handshake failed: {0}")]
    HandshakeFailed(String),

    #[error("Authentication failed (bad password?)")]
    AuthenticationFailed,

    #[error("{operation} timed out after {}ms", .timeout.as_millis())]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    #[error("Transport is shut down")]
    TransportClosed,

    // Power state errors
    #[error("Projector is in emergency state")]
    EmergencyState,

    #[error("Unexpected projector state: {0}")]
    UnexpectedState(String),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    // Emulator status errors
    #[error("Unknown {field} value: {value}")]
    UnknownStatus { field: &'static str, value: String },

    // Configuration errors
    #[error("Unknown projector model: {0}")]
    UnknownModel(String),

    #[error("Invalid host specifier: {0}")]
    InvalidHost(String),

    #[error("Projector discovery failed: {0}")]
    DiscoveryFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(Arc<std::io::Error>),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(Arc::new(err))
    }
}

impl Error {
    /// Classify this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use jvc_core::{Error, ErrorCategory};
    ///
    /// assert_eq!(Error::AuthenticationFailed.category(), ErrorCategory::Authentication);
    /// assert_eq!(Error::EmergencyState.category(), ErrorCategory::State);
    /// ```
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::MalformedPacket(_)
            | Error::UnknownCommand(_)
            | Error::UnrecognizedCommand(_)
            | Error::MalformedCommand(_)
            | Error::ProtocolViolation(_)
            | Error::HandshakeFailed(_) => ErrorCategory::Protocol,
            Error::Connect { .. }
            | Error::ConnectionClosed(_)
            | Error::Timeout { .. }
            | Error::TransportClosed
            | Error::DiscoveryFailed(_)
            | Error::Io(_) => ErrorCategory::Network,
            Error::AuthenticationFailed => ErrorCategory::Authentication,
            Error::EmergencyState
            | Error::UnexpectedState(_)
            | Error::InvalidStateTransition { .. } => ErrorCategory::State,
            Error::UnknownStatus { .. }
            | Error::UnknownModel(_)
            | Error::InvalidHost(_)
            | Error::Config(_) => ErrorCategory::Configuration,
        }
    }

    /// True if the error was caused by an operation exceeding its deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
