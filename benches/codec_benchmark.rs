//! Criterion benchmarks for zengif encoding and decoding.
//!
//! Run with: cargo bench --bench codec_benchmark

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;
use zengif::{ColorTableEntry, GifDecoder, GifEncoder, IndexedFrame};

/// Deterministic pseudo-random index buffer.
fn noise_indices(len: usize, width: u8, seed: u64) -> Vec<u8> {
    let mask = (1u32 << width) - 1;
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((state >> 33) as u32 & mask) as u8
        })
        .collect()
}

fn grayscale_palette(n: usize) -> Vec<ColorTableEntry> {
    (0..n)
        .map(|i| {
            let v = (i * 255 / (n - 1)) as u8;
            ColorTableEntry::new(v, v, v)
        })
        .collect()
}

fn make_gif(side: u16, bits: u8) -> Vec<u8> {
    let indices = noise_indices(usize::from(side) * usize::from(side), bits, 42);
    let palette = grayscale_palette(1 << bits);
    let frame = IndexedFrame::from_indices(&indices, bits, palette, 0, 0, side, side, None);
    let mut encoder = GifEncoder::new();
    encoder.add_frame(&frame, None);
    encoder.finish()
}

fn bench_encode(c: &mut Criterion) {
    let side = 256u16;
    let pixels = u64::from(side) * u64::from(side);
    let mut group = c.benchmark_group("encode");
    group.throughput(Throughput::Elements(pixels));

    for bits in [2u8, 8] {
        let indices = noise_indices(usize::from(side) * usize::from(side), bits, 42);
        let palette = grayscale_palette(1 << bits);
        group.bench_function(format!("noise_256x256_{bits}bpp"), |b| {
            b.iter(|| {
                let frame = IndexedFrame::from_indices(
                    black_box(&indices),
                    bits,
                    palette.clone(),
                    0,
                    0,
                    side,
                    side,
                    None,
                );
                let mut encoder = GifEncoder::new();
                encoder.add_frame(&frame, None);
                black_box(encoder.finish())
            })
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let side = 256u16;
    let pixels = u64::from(side) * u64::from(side);
    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Elements(pixels));

    for bits in [2u8, 8] {
        let gif = make_gif(side, bits);
        group.bench_function(format!("noise_256x256_{bits}bpp"), |b| {
            b.iter(|| {
                let decoder = GifDecoder::new(black_box(&gif)).unwrap();
                for frame in decoder.frames() {
                    black_box(frame.unwrap());
                }
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
