use criterion::{black_box, criterion_group, criterion_main, Criterion};

use riffwave::codec::adpcm::{AdpcmDecoder, AdpcmEncoder};
use riffwave::codec::g711;
use riffwave::{BitDepth, WaveFile};

fn test_signal(len: usize) -> Vec<i16> {
    (0..len)
        .map(|n| ((n as f64 * 0.3).sin() * 12000.0) as i16)
        .collect()
}

fn bench_adpcm(c: &mut Criterion) {
    let samples = test_signal(8000);
    let encoded = AdpcmEncoder::new().encode(&samples);

    c.bench_function("adpcm_encode_1s", |b| {
        b.iter(|| AdpcmEncoder::new().encode(black_box(&samples)))
    });
    c.bench_function("adpcm_decode_1s", |b| {
        b.iter(|| AdpcmDecoder::new().decode(black_box(&encoded), 256))
    });
}

fn bench_g711(c: &mut Criterion) {
    let samples = test_signal(8000);
    let alaw = g711::alaw::encode(&samples);
    let mulaw = g711::mulaw::encode(&samples);

    c.bench_function("alaw_encode_1s", |b| {
        b.iter(|| g711::alaw::encode(black_box(&samples)))
    });
    c.bench_function("alaw_decode_1s", |b| {
        b.iter(|| g711::alaw::decode(black_box(&alaw)))
    });
    c.bench_function("mulaw_encode_1s", |b| {
        b.iter(|| g711::mulaw::encode(black_box(&samples)))
    });
    c.bench_function("mulaw_decode_1s", |b| {
        b.iter(|| g711::mulaw::decode(black_box(&mulaw)))
    });
}

fn bench_file_round_trip(c: &mut Criterion) {
    let samples: Vec<f64> = test_signal(44100).iter().map(|&s| f64::from(s)).collect();
    let wav = WaveFile::from_scratch(1, 44100, BitDepth::Pcm(16), &samples).unwrap();
    let bytes = wav.to_bytes().unwrap();

    c.bench_function("serialize_1s_pcm16", |b| b.iter(|| wav.to_bytes().unwrap()));
    c.bench_function("parse_1s_pcm16", |b| {
        b.iter(|| WaveFile::from_bytes(black_box(&bytes)).unwrap())
    });
}

criterion_group!(benches, bench_adpcm, bench_g711, bench_file_round_trip);
criterion_main!(benches);
