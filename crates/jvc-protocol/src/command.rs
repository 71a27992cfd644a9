//! Commands: a command packet bound to its metadata.

use std::fmt;

use jvc_core::{Error, Result};
use tracing::debug;

use crate::command_meta::{CommandMeta, ResponseMap, registry};
use crate::model::JvcModel;
use crate::packet::{CommandCode, Packet, PacketType};
use crate::response::Response;

/// A command packet together with the metadata it was built from or
/// resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    packet: Packet,
    meta: &'static CommandMeta,
}

impl Command {
    /// Bind an existing packet to `meta`, checking they agree.
    ///
    /// # Errors
    /// Returns `Error::MalformedCommand` if the packet is not a command
    /// packet, does not start with the command's prefix, or has the wrong
    /// payload length.
    pub fn new(packet: Packet, meta: &'static CommandMeta) -> Result<Self> {
        if !packet.is_command() {
            return Err(Error::MalformedCommand(format!(
                "{} is not a command packet: {packet}",
                packet.packet_type()
            )));
        }
        if !packet.raw_bytes().starts_with(meta.packet_prefix()) {
            return Err(Error::MalformedCommand(format!(
                "packet does not start with {} prefix {}: {packet}",
                meta.name(),
                hex::encode(meta.packet_prefix())
            )));
        }
        if let Some(expected) = meta.packet_payload_length()
            && packet.payload().len() != expected
        {
            return Err(Error::MalformedCommand(format!(
                "{} expects a {expected}-byte packet payload, got {}: {packet}",
                meta.name(),
                packet.payload().len()
            )));
        }
        Ok(Command { packet, meta })
    }

    /// Build a command from its metadata and the payload following the
    /// command prefix (empty for almost every command).
    ///
    /// # Errors
    /// Returns `Error::MalformedPacket` if the packet cannot be built and
    /// `Error::MalformedCommand` if the payload length is wrong.
    pub fn from_meta(meta: &'static CommandMeta, payload: &[u8]) -> Result<Self> {
        let packet_type = if meta.is_advanced() {
            PacketType::AdvancedCommand
        } else {
            PacketType::BasicCommand
        };
        let mut packet_payload = meta.payload_prefix();
        packet_payload.extend_from_slice(payload);
        let packet = Packet::build(packet_type, meta.command_code(), &packet_payload)?;
        Command::new(packet, meta)
    }

    /// Build a command by its full dotted name.
    ///
    /// # Errors
    /// Returns `Error::UnknownCommand` for unregistered names, otherwise as
    /// [`Command::from_meta`].
    ///
    /// # Example
    ///
    /// ```
    /// use jvc_protocol::Command;
    ///
    /// let command = Command::from_name("power.on", b"").unwrap();
    /// assert_eq!(command.packet().raw_bytes(), b"\x21\x89\x01PW1\n");
    /// assert!(!command.is_advanced());
    /// ```
    pub fn from_name(name: &str, payload: &[u8]) -> Result<Self> {
        let meta = registry().get(name)?;
        Command::from_meta(meta, payload)
    }

    /// Resolve a packet received from the wire to a command.
    ///
    /// When several commands share the packet's bytes the first candidate
    /// wins, after `model` has dropped candidates for other projector models.
    ///
    /// # Errors
    /// Returns `Error::UnrecognizedCommand` if nothing matches and
    /// `Error::MalformedCommand` if the packet disagrees with the match.
    pub fn from_wire_packet(packet: Packet, model: Option<&JvcModel>) -> Result<Self> {
        let candidates = registry().resolve(&packet, model);
        let Some(&meta) = candidates.first() else {
            return Err(Error::UnrecognizedCommand(format!(
                "{packet} ({})",
                hex::encode(packet.raw_bytes())
            )));
        };
        if candidates.len() > 1 {
            debug!(
                packet = %hex::encode(packet.raw_bytes()),
                chosen = %meta.name(),
                candidates = ?candidates.iter().map(|m| m.name()).collect::<Vec<_>>(),
                "Ambiguous command packet, using first match"
            );
        }
        Command::new(packet, meta)
    }

    #[must_use]
    pub fn packet(&self) -> &Packet {
        &self.packet
    }

    #[must_use]
    pub fn meta(&self) -> &'static CommandMeta {
        self.meta
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        let meta: &'static CommandMeta = self.meta;
        meta.name()
    }

    #[must_use]
    pub fn command_code(&self) -> CommandCode {
        self.packet.command_code()
    }

    #[must_use]
    pub fn is_advanced(&self) -> bool {
        self.packet.is_advanced_command()
    }

    /// Payload after the group and command prefixes.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        let skip = self.meta.group().group_prefix.len() + self.meta.command_prefix().len();
        &self.packet.payload()[skip..]
    }

    #[must_use]
    pub fn response_payload_length(&self) -> Option<usize> {
        self.meta.response_payload_length()
    }

    #[must_use]
    pub fn response_map(&self) -> Option<&'static ResponseMap> {
        self.meta.response_map()
    }

    /// Empty acknowledgement for this command.
    ///
    /// # Errors
    /// Never fails for a valid command; the error path exists because packet
    /// construction is fallible.
    pub fn basic_response_packet(&self) -> Result<Packet> {
        Packet::build(PacketType::BasicResponse, self.command_code(), &[])
    }

    /// Payload-carrying response for an advanced command.
    ///
    /// # Errors
    /// Returns `Error::ProtocolViolation` if the command is basic or the
    /// payload length differs from a fixed response length.
    pub fn advanced_response_packet(&self, payload: &[u8]) -> Result<Packet> {
        if !self.is_advanced() {
            return Err(Error::ProtocolViolation(format!(
                "basic command {} has no advanced response",
                self.name()
            )));
        }
        if let Some(expected) = self.response_payload_length()
            && payload.len() != expected
        {
            return Err(Error::ProtocolViolation(format!(
                "{} response payload must be {expected} bytes, got {}: {}",
                self.name(),
                payload.len(),
                hex::encode(payload)
            )));
        }
        Packet::build(PacketType::AdvancedResponse, self.command_code(), payload)
    }

    /// Full response to this command, as a projector would send it.
    ///
    /// # Errors
    /// Returns `Error::ProtocolViolation` if a basic command is given a
    /// payload, or as [`Command::advanced_response_packet`].
    pub fn response(&self, payload: &[u8]) -> Result<Response> {
        let basic = self.basic_response_packet()?;
        let advanced = if self.is_advanced() {
            Some(self.advanced_response_packet(payload)?)
        } else if !payload.is_empty() {
            return Err(Error::ProtocolViolation(format!(
                "basic command {} cannot carry response payload {}",
                self.name(),
                hex::encode(payload)
            )));
        } else {
            None
        };
        Response::from_packets(self.clone(), basic, advanced)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.meta.name(), hex::encode(self.packet.raw_bytes()))
    }
}
