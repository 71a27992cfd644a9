//! Emulator session state machine.
//!
//! One [`SessionMachine`] tracks one client connection. It does no I/O: the
//! connection driver feeds it received bytes and timer expiries, and carries
//! out the [`SessionAction`]s it returns.
//!
//! # States
//!
//! - `Unconnected`: created, nothing sent yet
//! - `SendingGreeting`: writing `PJ_OK`
//! - `ReadingAuthentication`: waiting for `PJREQ[_password]`
//! - `Rejecting`: writing `PJNAK` before closing
//! - `ReadingCommand`: authenticated, waiting for the next packet
//! - `RunningCommand`: a packet is being handed to the dispatcher
//! - `ShuttingDown`: closing the connection
//! - `Closed`: finished
//!
//! # Valid Transitions
//!
//! ```text
//! Unconnected → SendingGreeting → ReadingAuthentication → ReadingCommand
//! ReadingAuthentication → Rejecting → ShuttingDown
//! ReadingCommand → RunningCommand → ReadingCommand
//! (any live state) → ShuttingDown → Closed
//! ```
//!
//! # Examples
//!
//! ```
//! use jvc_emulator::{SessionAction, SessionMachine, SessionState, SessionTimer};
//!
//! let mut machine = SessionMachine::new(None);
//! let actions = machine.connect().unwrap();
//! assert_eq!(actions[0], SessionAction::Write(b"PJ_OK".to_vec()));
//! assert_eq!(machine.state(), SessionState::ReadingAuthentication);
//!
//! let actions = machine.receive(b"PJREQ").unwrap();
//! assert!(actions.contains(&SessionAction::Write(b"PJACK".to_vec())));
//! assert!(actions.contains(&SessionAction::ArmTimer(SessionTimer::Idle)));
//! assert_eq!(machine.state(), SessionState::ReadingCommand);
//! ```

use std::fmt;

use bytes::BytesMut;
use jvc_core::constants::{PASSWORD_SEPARATOR, PJ_OK, PJACK, PJNAK, PJREQ};
use jvc_core::{Error, Result};
use jvc_protocol::{Packet, PacketCodec};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use tokio_util::codec::Decoder;

/// Lifecycle state of an emulator session.
///
/// There are no separate states for sending `PJACK`, `PJNAK` or a response:
/// the connection driver performs those writes while the machine already
/// sits in the state that follows them (`Rejecting` covers the `PJNAK` path).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Unconnected,
    SendingGreeting,
    ReadingAuthentication,
    Rejecting,
    ReadingCommand,
    RunningCommand,
    ShuttingDown,
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state_str = match self {
            SessionState::Unconnected => "Unconnected",
            SessionState::SendingGreeting => "SendingGreeting",
            SessionState::ReadingAuthentication => "ReadingAuthentication",
            SessionState::Rejecting => "Rejecting",
            SessionState::ReadingCommand => "ReadingCommand",
            SessionState::RunningCommand => "RunningCommand",
            SessionState::ShuttingDown => "ShuttingDown",
            SessionState::Closed => "Closed",
        };
        f.write_str(state_str)
    }
}

impl SessionState {
    /// Check if transition to target state is valid from this state.
    ///
    /// # Examples
    ///
    /// ```
    /// use jvc_emulator::SessionState;
    ///
    /// assert!(SessionState::ReadingCommand.can_transition_to(&SessionState::RunningCommand));
    /// assert!(!SessionState::Unconnected.can_transition_to(&SessionState::ReadingCommand));
    /// ```
    pub fn can_transition_to(&self, target: &SessionState) -> bool {
        matches!(
            (self, target),
            (SessionState::Unconnected, SessionState::SendingGreeting)
                | (SessionState::SendingGreeting, SessionState::ReadingAuthentication)
                | (
                    SessionState::ReadingAuthentication,
                    SessionState::ReadingCommand | SessionState::Rejecting
                )
                | (SessionState::ReadingCommand, SessionState::RunningCommand)
                | (SessionState::RunningCommand, SessionState::ReadingCommand)
                | (SessionState::ShuttingDown, SessionState::Closed)
        ) || (self.is_live() && *target == SessionState::ShuttingDown)
    }

    /// True until the session starts shutting down.
    #[must_use]
    pub fn is_live(&self) -> bool {
        !matches!(self, SessionState::ShuttingDown | SessionState::Closed)
    }
}

/// Per-session timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionTimer {
    /// Limits how long the client may take to authenticate.
    Handshake,
    /// Closes a session with no command traffic.
    Idle,
}

/// Work the connection driver must carry out, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Write these bytes to the client.
    Write(Vec<u8>),
    /// Queue this command packet for the dispatcher.
    Dispatch(Packet),
    /// (Re)start a timer, replacing any running one.
    ArmTimer(SessionTimer),
    /// Stop the running timer.
    CancelTimer,
    /// Close the connection.
    Close,
}

/// Sans-IO state machine for one emulator session.
pub struct SessionMachine {
    state: SessionState,
    expected_auth: Vec<u8>,
    auth_buffer: Vec<u8>,
    codec: PacketCodec,
    buffer: BytesMut,
}

impl SessionMachine {
    /// New session expecting `password`; `None` or empty means none.
    pub fn new(password: Option<&str>) -> Self {
        let mut expected_auth = PJREQ.to_vec();
        if let Some(password) = password.filter(|p| !p.is_empty()) {
            expected_auth.push(PASSWORD_SEPARATOR);
            expected_auth.extend_from_slice(password.as_bytes());
        }
        Self {
            state: SessionState::Unconnected,
            expected_auth,
            auth_buffer: Vec::new(),
            codec: PacketCodec::new(),
            buffer: BytesMut::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    fn transition_to(&mut self, new_state: SessionState) -> Result<()> {
        if !self.state.can_transition_to(&new_state) {
            return Err(Error::InvalidStateTransition {
                from: self.state.to_string(),
                to: new_state.to_string(),
            });
        }
        self.state = new_state;
        Ok(())
    }

    /// Start the session: greet the client and wait for authentication.
    ///
    /// # Errors
    /// Returns `Error::InvalidStateTransition` if already started.
    pub fn connect(&mut self) -> Result<Vec<SessionAction>> {
        self.transition_to(SessionState::SendingGreeting)?;
        let greeting = SessionAction::Write(PJ_OK.to_vec());
        self.transition_to(SessionState::ReadingAuthentication)?;
        Ok(vec![greeting, SessionAction::ArmTimer(SessionTimer::Handshake)])
    }

    /// Feed bytes received from the client.
    ///
    /// # Errors
    /// Returns `Error::MalformedPacket` for bytes that do not frame into a
    /// packet. The caller must close the session.
    pub fn receive(&mut self, data: &[u8]) -> Result<Vec<SessionAction>> {
        match self.state {
            SessionState::ReadingAuthentication => self.receive_authentication(data),
            SessionState::ReadingCommand => {
                self.buffer.extend_from_slice(data);
                self.drain_packets()
            }
            // Late bytes on a closing session are dropped.
            _ => Ok(Vec::new()),
        }
    }

    fn receive_authentication(&mut self, data: &[u8]) -> Result<Vec<SessionAction>> {
        self.auth_buffer.extend_from_slice(data);

        // The client may not send commands before PJACK, so anything past the
        // expected request is an overlong (wrong) password.
        let n = self.auth_buffer.len().min(self.expected_auth.len());
        let prefix_matches: bool = self.auth_buffer[..n].ct_eq(&self.expected_auth[..n]).into();
        if !prefix_matches || self.auth_buffer.len() > self.expected_auth.len() {
            self.transition_to(SessionState::Rejecting)?;
            return Ok(vec![
                SessionAction::CancelTimer,
                SessionAction::Write(PJNAK.to_vec()),
                SessionAction::Close,
            ]);
        }
        if self.auth_buffer.len() < self.expected_auth.len() {
            return Ok(Vec::new());
        }

        self.transition_to(SessionState::ReadingCommand)?;
        self.auth_buffer.clear();
        Ok(vec![
            SessionAction::CancelTimer,
            SessionAction::Write(PJACK.to_vec()),
            SessionAction::ArmTimer(SessionTimer::Idle),
        ])
    }

    fn drain_packets(&mut self) -> Result<Vec<SessionAction>> {
        let mut actions = Vec::new();
        while let Some(packet) = self.codec.decode(&mut self.buffer)? {
            self.transition_to(SessionState::RunningCommand)?;
            actions.push(SessionAction::CancelTimer);
            actions.push(SessionAction::Dispatch(packet));
            self.transition_to(SessionState::ReadingCommand)?;
            actions.push(SessionAction::ArmTimer(SessionTimer::Idle));
        }
        Ok(actions)
    }

    /// A timer fired. Stale timers (for a state already left) do nothing.
    pub fn timer_expired(&mut self, timer: SessionTimer) -> Vec<SessionAction> {
        match (timer, self.state) {
            (SessionTimer::Handshake, SessionState::ReadingAuthentication) => {
                self.state = SessionState::Rejecting;
                vec![SessionAction::Write(PJNAK.to_vec()), SessionAction::Close]
            }
            (SessionTimer::Idle, SessionState::ReadingCommand) => vec![SessionAction::Close],
            _ => Vec::new(),
        }
    }

    /// Begin closing. Returns false if the session was already closing.
    pub fn begin_close(&mut self) -> bool {
        if !self.state.is_live() {
            return false;
        }
        self.state = SessionState::ShuttingDown;
        true
    }

    /// Mark the connection as fully closed.
    pub fn finish_close(&mut self) {
        self.state = SessionState::Closed;
    }
}

impl fmt::Debug for SessionMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionMachine")
            .field("state", &self.state)
            .field("buffered", &self.buffer.len())
            .finish_non_exhaustive()
    }
}
