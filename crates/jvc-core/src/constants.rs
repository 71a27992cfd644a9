//! Core constants for the JVC projector control protocol.
//!
//! This module defines the protocol-level constants shared by the client,
//! the emulator and the packet codec. Keeping them in one place keeps the
//! two ends of the connection byte-compatible.
//!
//! # Connection Handshake
//!
//! Every TCP session starts with a three-message exchange. None of the
//! handshake messages carry a terminating newline:
//!
//! ```text
//! Projector: PJ_OK
//! Client:    PJREQ            (no password configured)
//!            PJREQ_<password> (password configured)
//! Projector: PJACK            (accepted)
//!            PJNAK            (rejected, connection is closed)
//! ```
//!
//! # Packet Structure
//!
//! After the handshake every message is a packet:
//!
//! ```text
//! <type> 0x89 0x01 <code0> <code1> [payload...] 0x0A
//! ```
//!
//! | Type byte | Meaning                            |
//! |-----------|------------------------------------|
//! | `0x21`    | Basic command (operation)          |
//! | `0x3F`    | Advanced command (reference/query) |
//! | `0x06`    | Basic response (acknowledgement)   |
//! | `0x40`    | Advanced response (with payload)   |
//!
//! # Usage
//!
//! ```
//! use jvc_core::constants::*;
//!
//! assert_eq!(PJ_OK, b"PJ_OK");
//! assert_eq!(PACKET_MAGIC, [0x89, 0x01]);
//!
//! fn length_ok(len: usize) -> bool {
//!     (MIN_PACKET_LENGTH..=MAX_PACKET_LENGTH).contains(&len)
//! }
//! assert!(length_ok(6));
//! assert!(!length_ok(31));
//! ```

use std::time::Duration;

// ============================================================================
// Handshake
// ============================================================================

/// Greeting sent by the projector immediately after the TCP connection opens.
pub const PJ_OK: &[u8; 5] = b"PJ_OK";

/// Authentication request sent by the client after the greeting.
///
/// When a password is configured, `_` followed by the UTF-8 password is
/// appended. Older projectors reject any suffix, so an empty password must
/// produce the bare request.
pub const PJREQ: &[u8; 5] = b"PJREQ";

/// Separator between [`PJREQ`] and the password.
pub const PASSWORD_SEPARATOR: u8 = b'_';

/// Sent by the projector when authentication succeeded.
pub const PJACK: &[u8; 5] = b"PJACK";

/// Sent by the projector when authentication failed.
pub const PJNAK: &[u8; 5] = b"PJNAK";

/// Length of each fixed handshake message.
pub const HANDSHAKE_MESSAGE_LENGTH: usize = 5;

// ============================================================================
// Packet framing
// ============================================================================

/// Leading byte of a basic command packet (`!`).
pub const BASIC_COMMAND_BYTE: u8 = 0x21;

/// Leading byte of an advanced command packet (`?`).
pub const ADVANCED_COMMAND_BYTE: u8 = 0x3F;

/// Leading byte of a basic response packet (ACK).
pub const BASIC_RESPONSE_BYTE: u8 = 0x06;

/// Leading byte of an advanced response packet (`@`).
pub const ADVANCED_RESPONSE_BYTE: u8 = 0x40;

/// Magic bytes following the packet type in every packet.
pub const PACKET_MAGIC: [u8; 2] = [0x89, 0x01];

/// Terminating byte of every packet. Never appears anywhere else in a packet.
pub const END_OF_PACKET: u8 = 0x0A;

/// Length of the command code carried by every packet.
pub const COMMAND_CODE_LENGTH: usize = 2;

/// Offset of the command code within a packet.
pub const COMMAND_CODE_OFFSET: usize = 1 + PACKET_MAGIC.len();

/// Offset of the payload within a packet.
pub const PAYLOAD_OFFSET: usize = COMMAND_CODE_OFFSET + COMMAND_CODE_LENGTH;

/// Smallest legal packet: type, magic, command code and terminator.
pub const MIN_PACKET_LENGTH: usize = PAYLOAD_OFFSET + 1;

/// Largest packet either side will send or accept.
pub const MAX_PACKET_LENGTH: usize = 30;

/// Largest payload that still fits in [`MAX_PACKET_LENGTH`].
pub const MAX_PAYLOAD_LENGTH: usize = MAX_PACKET_LENGTH - MIN_PACKET_LENGTH;

// ============================================================================
// Network defaults
// ============================================================================

/// TCP port projectors listen on for network control.
pub const DEFAULT_PORT: u16 = 20554;

/// Default timeout applied to every individual network operation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// How long the projector may take to leave `Warming` or `Cooling`.
pub const STABLE_POWER_TIMEOUT: Duration = Duration::from_secs(60);

/// Interval between power status queries while waiting for a stable state.
pub const POWER_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Idle time after which a reconnecting client drops its connection.
///
/// Projectors accept a single control connection at a time, so holding an
/// idle one locks out every other controller.
pub const DEFAULT_IDLE_DISCONNECT: Duration = Duration::from_secs(2);

// ============================================================================
// Environment variables
// ============================================================================

/// Projector host specifier (`host[:port]`, `tcp://...` or `sddp://...`).
pub const ENV_HOST: &str = "JVC_PROJECTOR_HOST";

/// Default projector port.
pub const ENV_PORT: &str = "JVC_PROJECTOR_PORT";

/// Projector password. Empty means no password.
pub const ENV_PASSWORD: &str = "JVC_PROJECTOR_PASSWORD";

/// Operation timeout in (fractional) seconds.
pub const ENV_TIMEOUT: &str = "JVC_PROJECTOR_TIMEOUT";

// ============================================================================
// Emulator defaults
// ============================================================================

/// Time the emulated projector spends in `Warming` before turning `On`.
pub const EMULATOR_WARMUP_TIME: Duration = Duration::from_secs(10);

/// Time allowed for a connecting client to complete the handshake.
pub const EMULATOR_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

/// Inactivity window after which the emulator drops an authenticated session.
pub const EMULATOR_IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum number of simultaneous emulator sessions.
pub const EMULATOR_MAX_SESSIONS: usize = 16;

/// Model emulated when none is configured.
pub const EMULATOR_DEFAULT_MODEL: &str = "DLA-NZ8";
