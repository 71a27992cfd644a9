//! Performance benchmarks for packet framing and command resolution.
//!
//! Run benchmarks with:
//! ```sh
//! cargo bench --bench packet_bench
//! ```

use bytes::BytesMut;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use tokio_util::codec::Decoder;
use jvc_protocol::{Command, CommandCode, Packet, PacketCodec, PacketType, model, registry};

/// Benchmark parsing packets of increasing payload size.
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("packet_parse");
    group.throughput(Throughput::Elements(1));

    for payload_len in [0usize, 1, 14, 24] {
        let payload = vec![0x30u8; payload_len];
        let packet =
            Packet::build(PacketType::AdvancedResponse, CommandCode::new(*b"MD"), &payload)
                .unwrap();
        let raw = packet.raw_bytes().to_vec();

        group.bench_with_input(BenchmarkId::from_parameter(payload_len), &raw, |b, raw| {
            b.iter(|| black_box(Packet::parse(black_box(raw)).unwrap()));
        });
    }

    group.finish();
}

/// Benchmark building a command by name.
fn bench_build_command(c: &mut Criterion) {
    let mut group = c.benchmark_group("command_build");
    group.throughput(Throughput::Elements(1));

    for name in ["power.on", "power_status.query", "remote_control.menu"] {
        group.bench_with_input(BenchmarkId::from_parameter(name), name, |b, name| {
            b.iter(|| black_box(Command::from_name(black_box(name), &[]).unwrap()));
        });
    }

    group.finish();
}

/// Benchmark resolving wire packets back to commands, including the
/// ambiguous picture mode case.
fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("command_resolve");
    group.throughput(Throughput::Elements(1));

    let reg = registry();
    let hd350 = model("DLA-HD350").unwrap();
    let cases = [
        ("power_on", Packet::parse(b"\x21\x89\x01PW1\n").unwrap(), None),
        ("remote_menu", Packet::parse(b"\x21\x89\x01RC732E\n").unwrap(), None),
        ("picture_mode", Packet::parse(b"\x21\x89\x01PMPM3\n").unwrap(), Some(hd350)),
    ];

    for (label, packet, model) in &cases {
        group.bench_with_input(BenchmarkId::from_parameter(label), packet, |b, packet| {
            b.iter(|| black_box(reg.resolve(black_box(packet), *model)));
        });
    }

    group.finish();
}

/// Benchmark decoding a stream of back-to-back response packets.
fn bench_decode_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec_decode_stream");

    let mut stream = Vec::new();
    for _ in 0..100 {
        stream.extend_from_slice(b"\x06\x89\x01PW\n\x40\x89\x01PW1\n");
    }
    group.throughput(Throughput::Elements(200));

    group.bench_function("decode_200_packets", |b| {
        b.iter(|| {
            let mut codec = PacketCodec::new();
            let mut buffer = BytesMut::from(&stream[..]);
            let mut count = 0;
            while let Some(packet) = codec.decode(&mut buffer).unwrap() {
                black_box(packet);
                count += 1;
            }
            assert_eq!(count, 200);
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parse,
    bench_build_command,
    bench_resolve,
    bench_decode_stream
);
criterion_main!(benches);
