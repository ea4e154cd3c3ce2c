use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rece232::{Crc16Dnp, Decoder, DecoderOptions, Encoder, EncoderOptions};

fn random_words(n: usize) -> Vec<i32> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..n).map(|_| rng.gen()).collect()
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for &n in &[1usize, 7, 64] {
        let words = random_words(n);
        group.bench_with_input(BenchmarkId::new("fletcher", n), &words, |b, words| {
            let mut encoder = Encoder::new(EncoderOptions::default());
            b.iter(|| black_box(encoder.encode(0x2A, black_box(words)).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("crc16", n), &words, |b, words| {
            let mut encoder = Encoder::with_checksum(EncoderOptions::default(), Crc16Dnp::new());
            b.iter(|| black_box(encoder.encode(0x2A, black_box(words)).unwrap()))
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for &n in &[1usize, 7, 64] {
        let message = Encoder::default().encode(0x2A, &random_words(n)).unwrap();

        group.bench_with_input(BenchmarkId::new("clean", n), &message, |b, message| {
            let mut decoder = Decoder::new(DecoderOptions::default());
            b.iter(|| decoder.load(black_box(message)).unwrap())
        });

        // A drop early in the message shifts every later byte
        let mut dropped = message.clone();
        dropped.remove(2);
        group.bench_with_input(BenchmarkId::new("dropped", n), &dropped, |b, message| {
            let mut decoder = Decoder::new(DecoderOptions::default());
            b.iter(|| decoder.load(black_box(message)).unwrap())
        });

        let mut flipped = message.clone();
        flipped[1] ^= 1;
        group.bench_with_input(BenchmarkId::new("repaired", n), &flipped, |b, message| {
            let mut decoder = Decoder::new(DecoderOptions::default());
            b.iter(|| decoder.load(black_box(message)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
