//! Property-based tests for packet framing and command resolution.
//!
//! These tests use proptest to generate random packets and byte strings and
//! verify that framing invariants hold for every input.

use bytes::BytesMut;
use proptest::prelude::*;
use tokio_util::codec::Decoder;

use jvc_protocol::{Command, CommandCode, Packet, PacketCodec, PacketType, registry};

/// Strategy for any packet type.
fn packet_type() -> impl Strategy<Value = PacketType> {
    prop_oneof![
        Just(PacketType::BasicCommand),
        Just(PacketType::AdvancedCommand),
        Just(PacketType::BasicResponse),
        Just(PacketType::AdvancedResponse),
    ]
}

/// Strategy for body bytes, which may be anything except the terminator.
fn body_byte() -> impl Strategy<Value = u8> {
    any::<u8>().prop_filter("terminator", |b| *b != 0x0A)
}

fn command_code() -> impl Strategy<Value = CommandCode> {
    [body_byte(), body_byte()].prop_map(CommandCode::new)
}

fn payload() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(body_byte(), 0..=24)
}

proptest! {
    /// Property: build then parse preserves every field.
    #[test]
    fn prop_build_parse_roundtrip(
        packet_type in packet_type(),
        code in command_code(),
        payload in payload(),
    ) {
        let built = Packet::build(packet_type, code, &payload).unwrap();
        let parsed = Packet::parse(built.raw_bytes()).unwrap();

        prop_assert_eq!(parsed.packet_type(), packet_type);
        prop_assert_eq!(parsed.command_code(), code);
        prop_assert_eq!(parsed.payload(), &payload[..]);
        prop_assert_eq!(parsed.len(), 6 + payload.len());
        prop_assert_eq!(&parsed, &built);
    }

    /// Property: strings outside the length bounds never parse.
    #[test]
    fn prop_parse_rejects_bad_lengths(
        short in prop::collection::vec(any::<u8>(), 0..6),
        long in prop::collection::vec(any::<u8>(), 31..64),
    ) {
        prop_assert!(Packet::parse(&short).is_err());
        prop_assert!(Packet::parse(&long).is_err());
    }

    /// Property: a valid packet with its terminator replaced never parses.
    #[test]
    fn prop_parse_requires_terminator(
        packet_type in packet_type(),
        code in command_code(),
        payload in payload(),
        last in body_byte(),
    ) {
        let built = Packet::build(packet_type, code, &payload).unwrap();
        let mut raw = built.raw_bytes().to_vec();
        *raw.last_mut().unwrap() = last;
        prop_assert!(Packet::parse(&raw).is_err());
    }

    /// Property: wrong magic bytes never parse.
    #[test]
    fn prop_parse_requires_magic(
        code in command_code(),
        magic in [any::<u8>(), any::<u8>()],
    ) {
        prop_assume!(magic != [0x89, 0x01]);
        let mut raw = vec![0x21, magic[0], magic[1]];
        raw.extend_from_slice(code.as_bytes());
        raw.push(0x0A);
        prop_assert!(Packet::parse(&raw).is_err());
    }

    /// Property: the codec yields the same packets however the stream is split.
    #[test]
    fn prop_codec_split_invariance(
        packets in prop::collection::vec((packet_type(), command_code(), payload()), 1..8),
        split in any::<prop::sample::Index>(),
    ) {
        let packets: Vec<Packet> = packets
            .into_iter()
            .map(|(t, c, p)| Packet::build(t, c, &p).unwrap())
            .collect();
        let stream: Vec<u8> = packets.iter().flat_map(|p| p.raw_bytes().to_vec()).collect();
        let at = split.index(stream.len());

        let mut codec = PacketCodec::new();
        let mut buffer = BytesMut::from(&stream[..at]);
        let mut decoded = Vec::new();
        while let Some(packet) = codec.decode(&mut buffer).unwrap() {
            decoded.push(packet);
        }
        buffer.extend_from_slice(&stream[at..]);
        while let Some(packet) = codec.decode(&mut buffer).unwrap() {
            decoded.push(packet);
        }

        prop_assert_eq!(decoded, packets);
        prop_assert!(buffer.is_empty());
    }
}

/// Every registered name survives a trip through its wire bytes, up to
/// aliases that share identical bytes.
#[test]
fn test_every_command_name_resolves_back() {
    let reg = registry();
    for meta in reg.iter() {
        let command = Command::from_meta(meta, &[]).unwrap();
        let candidates = reg.resolve(command.packet(), None);
        assert!(
            candidates.iter().any(|c| c.name() == meta.name()),
            "{} resolved to {:?}",
            meta.name(),
            candidates.iter().map(|c| c.name()).collect::<Vec<_>>()
        );
        for candidate in &candidates {
            assert_eq!(candidate.packet_prefix(), meta.packet_prefix());
        }

        let resolved = Command::from_wire_packet(command.packet().clone(), None).unwrap();
        assert_eq!(resolved.packet(), command.packet());
    }
}

/// Every command in a model-restricted group resolves to its own group when
/// one of its models is given.
#[test]
fn test_model_specific_commands_resolve_with_model() {
    let reg = registry();
    for meta in reg.iter().filter(|m| !m.group().models.is_empty()) {
        let model = jvc_protocol::model(meta.group().models[0]).unwrap();
        let command = Command::from_meta(meta, &[]).unwrap();
        let resolved = Command::from_wire_packet(command.packet().clone(), Some(model)).unwrap();
        assert_eq!(resolved.name(), meta.name());
    }
}
