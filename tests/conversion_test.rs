//! End-to-end conversion behavior.

use riffwave::{BitDepth, Container, WaveFile};

fn speech_like(len: usize) -> Vec<f64> {
    // Small varying signal, representative of quiet speech
    (0..len)
        .map(|n| {
            let phase = n as f64 * 0.3;
            (phase.sin() * 3000.0 + (phase * 0.1).sin() * 500.0).trunc()
        })
        .collect()
}

#[test]
fn test_adpcm_compress_decompress_cycle() {
    let mut wav =
        WaveFile::from_scratch(1, 8000, BitDepth::Pcm(16), &[0.0, 1.0, -32768.0, 32767.0])
            .unwrap();
    wav.to_ima_adpcm().unwrap();

    assert_eq!(wav.bit_depth, BitDepth::Adpcm);
    let fmt = wav.fmt.as_ref().unwrap();
    assert_eq!(fmt.audio_format, 17);
    assert_eq!(fmt.block_align, 256);
    assert_eq!(fmt.bits_per_sample, 4);
    assert_eq!(fmt.byte_rate, 4055);
    assert_eq!(fmt.valid_bits_per_sample, 505);
    assert_eq!(wav.data.len(), 256);
    assert_eq!(wav.fact.as_ref().unwrap().dw_sample_length, 512);

    wav.from_ima_adpcm().unwrap();
    assert_eq!(wav.bit_depth, BitDepth::Pcm(16));
    let fmt = wav.fmt.as_ref().unwrap();
    assert_eq!(fmt.audio_format, 1);
    assert_eq!(fmt.bits_per_sample, 16);
    assert_eq!(fmt.block_align, 2);
    assert!(wav.fact.is_none());
    // One padded block decodes to 506 samples
    assert_eq!(wav.sample_count(), 506);
}

#[test]
fn test_adpcm_tracks_a_speech_like_signal() {
    let samples = speech_like(505);
    let mut wav = WaveFile::from_scratch(1, 8000, BitDepth::Pcm(16), &samples).unwrap();
    wav.to_ima_adpcm().unwrap();
    wav.from_ima_adpcm().unwrap();
    let decoded = wav.samples_f64().unwrap();
    // The decoded block carries two extra leading samples, so decoded[k+1]
    // lines up with samples[k]. Adaptive quantization noise varies per
    // sample; bound the mean absolute error instead.
    let mut total_error = 0.0;
    let mut count = 0;
    for (k, &original) in samples.iter().enumerate().skip(16).take(480) {
        total_error += (decoded[k + 1] - original).abs();
        count += 1;
    }
    let mean_error = total_error / f64::from(count);
    assert!(mean_error <= 1024.0, "mean error {}", mean_error);
}

#[test]
fn test_adpcm_survives_a_byte_round_trip() {
    let mut wav = WaveFile::from_scratch(1, 8000, BitDepth::Pcm(16), &speech_like(1010)).unwrap();
    wav.to_ima_adpcm().unwrap();
    let parsed = WaveFile::from_bytes(&wav.to_bytes().unwrap()).unwrap();
    assert_eq!(parsed.bit_depth, BitDepth::Adpcm);
    assert_eq!(parsed.data, wav.data);
    let mut parsed = parsed;
    parsed.from_ima_adpcm().unwrap();
    assert_eq!(parsed.sample_count(), 1012);
}

#[test]
fn test_companding_through_serialization() {
    type Conversion = fn(&mut WaveFile) -> riffwave::Result<()>;
    let pairs: [(Conversion, Conversion); 2] = [
        (WaveFile::to_a_law, WaveFile::from_a_law),
        (WaveFile::to_mu_law, WaveFile::from_mu_law),
    ];
    for (to, from) in pairs {
        let samples = speech_like(160);
        let mut wav = WaveFile::from_scratch(1, 8000, BitDepth::Pcm(16), &samples).unwrap();
        to(&mut wav).unwrap();
        let mut parsed = WaveFile::from_bytes(&wav.to_bytes().unwrap()).unwrap();
        from(&mut parsed).unwrap();
        let decoded = parsed.samples_f64().unwrap();
        for (original, decoded) in samples.iter().zip(&decoded) {
            assert!((original - decoded).abs() <= 256.0);
        }
    }
}

#[test]
fn test_sixteen_to_twenty_four_and_back_is_within_one_step() {
    let samples = speech_like(200);
    let mut wav = WaveFile::from_scratch(1, 44100, BitDepth::Pcm(16), &samples).unwrap();
    wav.to_bit_depth(BitDepth::Pcm(24)).unwrap();
    wav.to_bit_depth(BitDepth::Pcm(16)).unwrap();
    // Truncation toward zero can lose one unit per direction
    for (original, round) in samples.iter().zip(wav.samples_f64().unwrap()) {
        assert!((original - round).abs() <= 1.0, "{} -> {}", original, round);
    }
}

#[test]
fn test_float_to_int_clamps_out_of_range() {
    let mut wav =
        WaveFile::from_scratch(1, 8000, BitDepth::Float32, &[2.0, -3.0, 0.5]).unwrap();
    wav.to_bit_depth(BitDepth::Pcm(16)).unwrap();
    let samples = wav.samples_f64().unwrap();
    assert_eq!(samples[0], 32767.0);
    assert_eq!(samples[1], -32768.0);
}

#[test]
fn test_container_conversions_preserve_audio_and_tags() {
    let samples = speech_like(64);
    let mut wav = WaveFile::from_scratch(1, 8000, BitDepth::Pcm(16), &samples).unwrap();
    wav.set_tag("INAM", "beep").unwrap();

    wav.to_rifx().unwrap();
    let parsed = WaveFile::from_bytes(&wav.to_bytes().unwrap()).unwrap();
    assert_eq!(parsed.container, Container::Rifx);
    assert_eq!(parsed.samples_f64().unwrap(), samples);
    assert_eq!(parsed.get_tag("INAM"), Some("beep".to_string()));

    wav.to_rf64().unwrap();
    assert!(wav.ds64.is_some());
    wav.to_riff().unwrap();
    assert_eq!(wav.container, Container::Riff);
    assert_eq!(wav.samples_f64().unwrap(), samples);
}

#[test]
fn test_conversion_errors_are_reported() {
    let mut wav = WaveFile::from_scratch(2, 44100, BitDepth::Pcm(16), &[0.0, 0.0]).unwrap();
    // ADPCM requires mono 8000 Hz
    assert!(wav.to_ima_adpcm().is_err());
    // Expanding audio that is not companded
    assert!(wav.from_a_law().is_err());
    assert!(wav.from_mu_law().is_err());
    assert!(wav.from_ima_adpcm().is_err());
    // Rescaling to a compressed depth
    assert!(wav.to_bit_depth(BitDepth::MuLaw).is_err());
}
