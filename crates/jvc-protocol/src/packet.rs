//! Single wire frame of the JVC control protocol.
//!
//! A [`Packet`] is an immutable, validated byte string:
//!
//! ```text
//! +------+-----------+--------------+-------------+------+
//! | type | 0x89 0x01 | code0  code1 | payload ... | 0x0A |
//! +------+-----------+--------------+-------------+------+
//!   1 B      2 B          2 B          0..=24 B     1 B
//! ```
//!
//! Packets are either parsed from raw bytes (validated immediately) or built
//! from their components. In both cases the exact wire form is kept, so a
//! received packet can be forwarded byte-for-byte.
//!
//! # Example
//!
//! ```
//! use jvc_protocol::{CommandCode, Packet, PacketType};
//!
//! let packet = Packet::build(PacketType::BasicCommand, CommandCode::new(*b"PW"), b"1").unwrap();
//! assert_eq!(packet.raw_bytes(), b"\x21\x89\x01PW1\n");
//!
//! let parsed = Packet::parse(packet.raw_bytes()).unwrap();
//! assert_eq!(parsed.command_code().as_bytes(), b"PW");
//! assert_eq!(parsed.payload(), b"1");
//! assert!(parsed.is_command());
//! ```

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};
use jvc_core::constants::{
    ADVANCED_COMMAND_BYTE, ADVANCED_RESPONSE_BYTE, BASIC_COMMAND_BYTE, BASIC_RESPONSE_BYTE,
    COMMAND_CODE_OFFSET, END_OF_PACKET, MAX_PACKET_LENGTH, MIN_PACKET_LENGTH, PACKET_MAGIC,
    PAYLOAD_OFFSET,
};
use jvc_core::{Error, Result};

/// Kind of packet, identified by its leading byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketType {
    /// Operation command; answered by a single basic response.
    BasicCommand,
    /// Reference command; answered by a basic then an advanced response.
    AdvancedCommand,
    /// Empty acknowledgement.
    BasicResponse,
    /// Acknowledgement carrying a payload.
    AdvancedResponse,
}

impl PacketType {
    #[must_use]
    pub fn as_byte(&self) -> u8 {
        match self {
            PacketType::BasicCommand => BASIC_COMMAND_BYTE,
            PacketType::AdvancedCommand => ADVANCED_COMMAND_BYTE,
            PacketType::BasicResponse => BASIC_RESPONSE_BYTE,
            PacketType::AdvancedResponse => ADVANCED_RESPONSE_BYTE,
        }
    }

    /// Map a leading byte to a packet type.
    ///
    /// # Errors
    /// Returns `Error::MalformedPacket` for any byte that is not one of the
    /// four packet type bytes.
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            BASIC_COMMAND_BYTE => Ok(PacketType::BasicCommand),
            ADVANCED_COMMAND_BYTE => Ok(PacketType::AdvancedCommand),
            BASIC_RESPONSE_BYTE => Ok(PacketType::BasicResponse),
            ADVANCED_RESPONSE_BYTE => Ok(PacketType::AdvancedResponse),
            other => Err(Error::MalformedPacket(format!(
                "unknown packet type byte 0x{other:02x}"
            ))),
        }
    }

    #[must_use]
    pub fn is_command(&self) -> bool {
        matches!(self, PacketType::BasicCommand | PacketType::AdvancedCommand)
    }

    #[must_use]
    pub fn is_response(&self) -> bool {
        !self.is_command()
    }

    #[must_use]
    pub fn is_advanced(&self) -> bool {
        matches!(
            self,
            PacketType::AdvancedCommand | PacketType::AdvancedResponse
        )
    }
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PacketType::BasicCommand => "basic command",
            PacketType::AdvancedCommand => "advanced command",
            PacketType::BasicResponse => "basic response",
            PacketType::AdvancedResponse => "advanced response",
        };
        f.write_str(name)
    }
}

/// Two-byte command code (usually two ASCII letters such as `PW`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandCode([u8; 2]);

impl CommandCode {
    #[must_use]
    pub const fn new(code: [u8; 2]) -> Self {
        CommandCode(code)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 2] {
        &self.0
    }
}

impl fmt::Display for CommandCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.iter().all(u8::is_ascii_graphic) {
            write!(f, "{}{}", self.0[0] as char, self.0[1] as char)
        } else {
            write!(f, "0x{}", hex::encode(self.0))
        }
    }
}

/// Validated protocol packet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Packet {
    raw: Bytes,
}

impl Packet {
    /// Parse and validate a complete packet, including its trailing `0x0A`.
    ///
    /// # Errors
    /// Returns `Error::MalformedPacket` if the length is outside
    /// `[MIN_PACKET_LENGTH, MAX_PACKET_LENGTH]`, the type byte is unknown, the
    /// magic bytes differ, the last byte is not `0x0A`, or `0x0A` also appears
    /// before the end.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        Self::from_bytes(Bytes::copy_from_slice(raw))
    }

    /// Same as [`Packet::parse`], taking ownership of the buffer.
    ///
    /// # Errors
    /// See [`Packet::parse`].
    pub fn from_bytes(raw: Bytes) -> Result<Self> {
        let len = raw.len();
        if !(MIN_PACKET_LENGTH..=MAX_PACKET_LENGTH).contains(&len) {
            return Err(Error::MalformedPacket(format!(
                "length {len} outside {MIN_PACKET_LENGTH}..={MAX_PACKET_LENGTH}: {}",
                hex::encode(&raw)
            )));
        }
        PacketType::from_byte(raw[0])?;
        if raw[1..COMMAND_CODE_OFFSET] != PACKET_MAGIC {
            return Err(Error::MalformedPacket(format!(
                "bad magic bytes: {}",
                hex::encode(&raw)
            )));
        }
        if raw[len - 1] != END_OF_PACKET {
            return Err(Error::MalformedPacket(format!(
                "missing terminator: {}",
                hex::encode(&raw)
            )));
        }
        if raw[..len - 1].contains(&END_OF_PACKET) {
            return Err(Error::MalformedPacket(format!(
                "embedded terminator: {}",
                hex::encode(&raw)
            )));
        }
        Ok(Packet { raw })
    }

    /// Build a packet from its components.
    ///
    /// # Errors
    /// Returns `Error::MalformedPacket` if the packet would be longer than
    /// `MAX_PACKET_LENGTH`, or if the command code or payload contains `0x0A`.
    pub fn build(packet_type: PacketType, command_code: CommandCode, payload: &[u8]) -> Result<Self> {
        let len = MIN_PACKET_LENGTH + payload.len();
        if len > MAX_PACKET_LENGTH {
            return Err(Error::MalformedPacket(format!(
                "payload of {} bytes makes a {len}-byte packet (max {MAX_PACKET_LENGTH})",
                payload.len()
            )));
        }
        if command_code.0.contains(&END_OF_PACKET) || payload.contains(&END_OF_PACKET) {
            return Err(Error::MalformedPacket(format!(
                "0x0a inside packet body (code {}, payload {})",
                hex::encode(command_code.0),
                hex::encode(payload)
            )));
        }

        let mut buf = BytesMut::with_capacity(len);
        buf.put_u8(packet_type.as_byte());
        buf.put_slice(&PACKET_MAGIC);
        buf.put_slice(&command_code.0);
        buf.put_slice(payload);
        buf.put_u8(END_OF_PACKET);
        Ok(Packet { raw: buf.freeze() })
    }

    #[must_use]
    pub fn packet_type(&self) -> PacketType {
        // Validated at construction.
        match self.raw[0] {
            BASIC_COMMAND_BYTE => PacketType::BasicCommand,
            ADVANCED_COMMAND_BYTE => PacketType::AdvancedCommand,
            BASIC_RESPONSE_BYTE => PacketType::BasicResponse,
            _ => PacketType::AdvancedResponse,
        }
    }

    #[must_use]
    pub fn command_code(&self) -> CommandCode {
        CommandCode([
            self.raw[COMMAND_CODE_OFFSET],
            self.raw[COMMAND_CODE_OFFSET + 1],
        ])
    }

    /// Bytes between the command code and the terminator.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.raw[PAYLOAD_OFFSET..self.raw.len() - 1]
    }

    /// Exact wire form, terminator included.
    #[must_use]
    pub fn raw_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Cheap clone of the wire form.
    #[must_use]
    pub fn to_bytes(&self) -> Bytes {
        self.raw.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Always false: a packet is never shorter than `MIN_PACKET_LENGTH`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[must_use]
    pub fn is_command(&self) -> bool {
        self.packet_type().is_command()
    }

    #[must_use]
    pub fn is_response(&self) -> bool {
        self.packet_type().is_response()
    }

    #[must_use]
    pub fn is_advanced_command(&self) -> bool {
        self.packet_type() == PacketType::AdvancedCommand
    }

    #[must_use]
    pub fn is_advanced_response(&self) -> bool {
        self.packet_type() == PacketType::AdvancedResponse
    }

    #[must_use]
    pub fn is_basic_command(&self) -> bool {
        self.packet_type() == PacketType::BasicCommand
    }

    #[must_use]
    pub fn is_basic_response(&self) -> bool {
        self.packet_type() == PacketType::BasicResponse
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}]",
            self.packet_type(),
            self.command_code(),
            hex::encode(self.payload())
        )
    }
}

impl TryFrom<&[u8]> for Packet {
    type Error = Error;

    fn try_from(raw: &[u8]) -> Result<Self> {
        Packet::parse(raw)
    }
}

impl AsRef<[u8]> for Packet {
    fn as_ref(&self) -> &[u8] {
        &self.raw
    }
}
