//! Responses: the packets a projector sends back for one command.
//!
//! ```text
//! command:   21 89 01 50 57 31 0A         power.on
//! response:  06 89 01 50 57 0A            basic ack
//!
//! command:   3F 89 01 50 57 0A            power_status.query
//! response:  06 89 01 50 57 0A            basic ack
//!            40 89 01 50 57 31 0A         advanced, payload "1" (On)
//! ```

use std::fmt;

use bytes::{Bytes, BytesMut};
use jvc_core::{Error, Result};

use crate::command::Command;
use crate::packet::Packet;

/// A command and the response packets that answered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    command: Command,
    basic: Packet,
    advanced: Option<Packet>,
}

impl Response {
    /// Assemble a response, checking every structural rule.
    ///
    /// # Errors
    /// Returns `Error::ProtocolViolation` naming the broken rule: basic packet
    /// of the wrong type, with the wrong command code or with a payload; an
    /// advanced packet missing, unexpected, of the wrong type, with the wrong
    /// command code or with the wrong payload length.
    pub fn from_packets(command: Command, basic: Packet, advanced: Option<Packet>) -> Result<Self> {
        if !basic.is_basic_response() {
            return Err(Error::ProtocolViolation(format!(
                "expected basic response to {}, got {basic}",
                command.name()
            )));
        }
        if basic.command_code() != command.command_code() {
            return Err(Error::ProtocolViolation(format!(
                "basic response code {} does not match command {}",
                basic.command_code(),
                command
            )));
        }
        if !basic.payload().is_empty() {
            return Err(Error::ProtocolViolation(format!(
                "basic response to {} carries payload {}",
                command.name(),
                hex::encode(basic.payload())
            )));
        }

        match (&advanced, command.is_advanced()) {
            (None, true) => {
                return Err(Error::ProtocolViolation(format!(
                    "advanced command {} is missing its advanced response",
                    command.name()
                )));
            }
            (Some(packet), false) => {
                return Err(Error::ProtocolViolation(format!(
                    "basic command {} got an unexpected advanced response {packet}",
                    command.name()
                )));
            }
            (Some(packet), true) => {
                if !packet.is_advanced_response() {
                    return Err(Error::ProtocolViolation(format!(
                        "expected advanced response to {}, got {packet}",
                        command.name()
                    )));
                }
                if packet.command_code() != command.command_code() {
                    return Err(Error::ProtocolViolation(format!(
                        "advanced response code {} does not match command {}",
                        packet.command_code(),
                        command
                    )));
                }
                if let Some(expected) = command.response_payload_length()
                    && packet.payload().len() != expected
                {
                    return Err(Error::ProtocolViolation(format!(
                        "advanced response to {} has {}-byte payload, expected {expected}",
                        command.name(),
                        packet.payload().len()
                    )));
                }
            }
            (None, false) => {}
        }

        Ok(Response {
            command,
            basic,
            advanced,
        })
    }

    #[must_use]
    pub fn command(&self) -> &Command {
        &self.command
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.command.name()
    }

    #[must_use]
    pub fn basic_packet(&self) -> &Packet {
        &self.basic
    }

    #[must_use]
    pub fn advanced_packet(&self) -> Option<&Packet> {
        self.advanced.as_ref()
    }

    #[must_use]
    pub fn is_advanced(&self) -> bool {
        self.advanced.is_some()
    }

    /// Advanced response payload, or empty for basic commands.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        self.advanced
            .as_ref()
            .map(Packet::payload)
            .unwrap_or_default()
    }

    /// Friendly string for the payload, if the command has a response map
    /// containing it.
    ///
    /// # Example
    ///
    /// ```
    /// use jvc_protocol::Command;
    ///
    /// let command = Command::from_name("power_status.query", b"").unwrap();
    /// let response = command.response(b"\x33").unwrap();
    /// assert_eq!(response.response_str(), Some("Warming"));
    /// ```
    #[must_use]
    pub fn response_str(&self) -> Option<&'static str> {
        self.command.response_map()?.get(self.payload())
    }

    /// Wire bytes of the basic packet followed by the advanced packet.
    #[must_use]
    pub fn raw_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(
            self.basic.len() + self.advanced.as_ref().map_or(0, Packet::len),
        );
        buf.extend_from_slice(self.basic.raw_bytes());
        if let Some(advanced) = &self.advanced {
            buf.extend_from_slice(advanced.raw_bytes());
        }
        buf.freeze()
    }

    /// Response packets in the order they go on the wire.
    pub fn packets(&self) -> impl Iterator<Item = &Packet> {
        std::iter::once(&self.basic).chain(self.advanced.as_ref())
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Response<{}>({})", self.name(), hex::encode(self.raw_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn query() -> Command {
        Command::from_name("power_status.query", b"").unwrap()
    }

    fn packet(raw: &[u8]) -> Packet {
        Packet::parse(raw).unwrap()
    }

    #[rstest]
    #[case(b"\x31", "On")]
    #[case(b"\x33", "Warming")]
    #[case(b"\x34", "Emergency")]
    fn test_power_status_decoding(#[case] payload: &[u8], #[case] expected: &str) {
        let mut raw = b"\x40\x89\x01PW".to_vec();
        raw.extend_from_slice(payload);
        raw.push(0x0A);
        let response =
            Response::from_packets(query(), packet(b"\x06\x89\x01PW\n"), Some(packet(&raw)))
                .unwrap();
        assert_eq!(response.payload(), payload);
        assert_eq!(response.response_str(), Some(expected));
    }

    #[test]
    fn test_unknown_payload_has_no_string() {
        let response = query().response(b"\x39").unwrap();
        assert_eq!(response.response_str(), None);
    }

    #[test]
    fn test_basic_with_payload_rejected() {
        let on = Command::from_name("power.on", b"").unwrap();
        let err = Response::from_packets(on, packet(b"\x06\x89\x01PW1\n"), None).unwrap_err();
        assert!(matches!(err, Error::ProtocolViolation(msg) if msg.contains("carries payload")));
    }

    #[rstest]
    #[case::wrong_basic_code(b"\x06\x89\x01IP\n", Some(&b"\x40\x89\x01PW1\n"[..]), "does not match")]
    #[case::basic_is_advanced(b"\x40\x89\x01PW1\n", Some(&b"\x40\x89\x01PW1\n"[..]), "expected basic")]
    #[case::missing_advanced(b"\x06\x89\x01PW\n", None, "missing")]
    #[case::advanced_not_advanced(b"\x06\x89\x01PW\n", Some(&b"\x06\x89\x01PW\n"[..]), "expected advanced")]
    #[case::wrong_advanced_code(b"\x06\x89\x01PW\n", Some(&b"\x40\x89\x01IP1\n"[..]), "does not match")]
    #[case::wrong_length(b"\x06\x89\x01PW\n", Some(&b"\x40\x89\x01PW11\n"[..]), "payload")]
    fn test_advanced_invariants(
        #[case] basic: &[u8],
        #[case] advanced: Option<&[u8]>,
        #[case] fragment: &str,
    ) {
        let err = Response::from_packets(query(), packet(basic), advanced.map(packet)).unwrap_err();
        assert!(
            matches!(&err, Error::ProtocolViolation(msg) if msg.contains(fragment)),
            "{err}"
        );
    }

    #[test]
    fn test_unexpected_advanced_rejected() {
        let on = Command::from_name("power.on", b"").unwrap();
        let err = Response::from_packets(
            on,
            packet(b"\x06\x89\x01PW\n"),
            Some(packet(b"\x40\x89\x01PW1\n")),
        )
        .unwrap_err();
        assert!(matches!(err, Error::ProtocolViolation(msg) if msg.contains("unexpected")));
    }

    #[test]
    fn test_raw_bytes_concatenates_packets() {
        let response = query().response(b"\x30").unwrap();
        assert_eq!(
            response.raw_bytes().as_ref(),
            b"\x06\x89\x01PW\n\x40\x89\x01PW0\n"
        );
        assert_eq!(response.packets().count(), 2);
    }
}
