use std::{hint::black_box, io::Cursor};

use chirpmon_benchmark::frame_stream;
use chirpmon_core::{
    route_packet, FrameSync, L7gHeaderDecoder, MagnitudeSeries, PacketDecoder,
};
use chirpmon_types::{RawBlock, FRAME_SIZE, MARKER};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const FRAMES: usize = 1_000;

fn bench_sync(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_sync");

    for noise in [0usize, 16, 256] {
        let stream = frame_stream(FRAMES, noise, 7).unwrap();
        group.throughput(Throughput::Bytes(stream.len() as u64));

        group.bench_with_input(BenchmarkId::from_parameter(noise), &stream, |b, s| {
            b.iter(|| {
                let mut sync = FrameSync::new(Cursor::new(s.as_slice()));
                let mut n = 0usize;
                while sync.next_frame().is_ok() {
                    n += 1;
                }
                black_box(n)
            })
        });
    }

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let stream = frame_stream(FRAMES, 0, 11).unwrap();
    let decoder = PacketDecoder::new(L7gHeaderDecoder);

    let mut group = c.benchmark_group("decode_route");
    group.throughput(Throughput::Bytes((FRAMES * (MARKER.len() + FRAME_SIZE)) as u64));

    group.bench_function("1000_frames", |b| {
        b.iter(|| {
            let mut sync = FrameSync::new(Cursor::new(stream.as_slice()));
            let mut seq = 0u64;
            while let Ok(frame) = sync.next_frame() {
                let packet = decoder.decode(frame);
                seq += 1;
                black_box(route_packet(&packet, seq).ok());
            }
            seq
        })
    });

    group.finish();
}

fn bench_magnitude(c: &mut Criterion) {
    let mut block = RawBlock::default();
    for (k, b) in block.0.iter_mut().enumerate() {
        *b = (k * 37) as u8;
    }

    c.bench_function("magnitude_series", |b| {
        b.iter(|| black_box(MagnitudeSeries::from_block(black_box(&block)).summary()))
    });
}

criterion_group!(benches, bench_sync, bench_pipeline, bench_magnitude);
criterion_main!(benches);
