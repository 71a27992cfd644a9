//! Tokio codec for JVC packet framing.
//!
//! After the handshake, both directions of a connection carry a plain
//! sequence of packets, each terminated by `0x0A`. [`PacketCodec`] splits an
//! inbound byte stream on that terminator and validates each line as a
//! [`Packet`]; outbound packets are written verbatim.
//!
//! # Architecture
//!
//! ```text
//! TCP Stream -> Decoder -> Packet (validated)
//! Packet -> Encoder -> TCP Stream (exact wire bytes)
//! ```
//!
//! The handshake messages carry no terminator, so they are read with
//! `read_exact` before the stream is wrapped in a `FramedRead`. Any bytes the
//! peer sent early stay in the socket and are picked up by the codec.
//!
//! # Usage with Tokio Framed
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use tokio::net::TcpStream;
//! use tokio_util::codec::FramedRead;
//! use jvc_protocol::PacketCodec;
//!
//! # async fn example() -> jvc_core::Result<()> {
//! let stream = TcpStream::connect("127.0.0.1:20554").await?;
//! let mut packets = FramedRead::new(stream, PacketCodec::new());
//! while let Some(packet) = packets.next().await {
//!     println!("{}", packet?);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Limits
//!
//! A line longer than `MAX_PACKET_LENGTH` is rejected as soon as that many
//! bytes have been buffered without a terminator, so a misbehaving peer can
//! never make the buffer grow without bound.

use bytes::BytesMut;
use jvc_core::constants::{END_OF_PACKET, MAX_PACKET_LENGTH};
use jvc_core::{Error, Result};
use tokio_util::codec::{Decoder, Encoder};
use tracing::trace;

use crate::packet::Packet;

/// Line-oriented packet codec.
#[derive(Debug, Default)]
pub struct PacketCodec {
    /// Bytes already scanned for a terminator.
    next_index: usize,
}

impl PacketCodec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Decoder for PacketCodec {
    type Item = Packet;
    type Error = Error;

    /// Extract the next complete packet.
    ///
    /// # Errors
    /// Returns `Error::MalformedPacket` if a line fails packet validation or
    /// grows past `MAX_PACKET_LENGTH` without a terminator.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Packet>> {
        let scan_end = src.len().min(MAX_PACKET_LENGTH);
        let found = src[self.next_index.min(scan_end)..scan_end]
            .iter()
            .position(|&b| b == END_OF_PACKET);

        match found {
            Some(offset) => {
                let end = self.next_index.min(scan_end) + offset + 1;
                self.next_index = 0;
                let line = src.split_to(end).freeze();
                trace!(bytes = %hex::encode(&line), "Decoded line");
                Packet::from_bytes(line).map(Some)
            }
            None if src.len() >= MAX_PACKET_LENGTH => {
                self.next_index = 0;
                let head = hex::encode(&src[..MAX_PACKET_LENGTH]);
                src.clear();
                Err(Error::MalformedPacket(format!(
                    "no terminator within {MAX_PACKET_LENGTH} bytes: {head}"
                )))
            }
            None => {
                self.next_index = src.len();
                Ok(None)
            }
        }
    }

    /// Like [`decode`](Self::decode), but a partial packet left at end of
    /// stream means the peer closed mid-packet.
    ///
    /// # Errors
    /// Returns `Error::ConnectionClosed` for leftover bytes.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Packet>> {
        match self.decode(src)? {
            Some(packet) => Ok(Some(packet)),
            None if src.is_empty() => Ok(None),
            None => {
                let partial = hex::encode(&src[..]);
                src.clear();
                self.next_index = 0;
                Err(Error::ConnectionClosed(format!(
                    "peer closed mid-packet after {partial}"
                )))
            }
        }
    }
}

impl Encoder<Packet> for PacketCodec {
    type Error = Error;

    fn encode(&mut self, item: Packet, dst: &mut BytesMut) -> Result<()> {
        dst.extend_from_slice(item.raw_bytes());
        Ok(())
    }
}

impl Encoder<&Packet> for PacketCodec {
    type Error = Error;

    fn encode(&mut self, item: &Packet, dst: &mut BytesMut) -> Result<()> {
        dst.extend_from_slice(item.raw_bytes());
        Ok(())
    }
}
