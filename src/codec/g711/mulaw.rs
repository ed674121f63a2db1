//! mu-law companding

/// Encoding bias added before the segment lookup
const BIAS: i32 = 0x84;
/// Input magnitude ceiling
const CLIP: i32 = 32635;

/// Segment (exponent) lookup indexed by the biased magnitude's top byte
const ENCODE_TABLE: [i32; 256] = [
    0, 0, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 3, 3, 3, 3, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4,
    4, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5,
    5, 5, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6,
    6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6,
    6, 6, 6, 6, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7,
    7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7,
    7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7,
    7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7,
    7, 7, 7, 7, 7, 7, 7, 7,
];

/// Segment base values for reconstruction
const DECODE_TABLE: [i32; 8] = [0, 132, 396, 924, 1980, 4092, 8316, 16764];

/// Compand one 16-bit sample to 8-bit mu-law.
pub fn encode_sample(sample: i16) -> u8 {
    let mut sample = i32::from(sample);
    let sign = (sample >> 8) & 0x80;
    if sign != 0 {
        sample = -sample;
    }
    if sample > CLIP {
        sample = CLIP;
    }
    sample += BIAS;
    let exponent = ENCODE_TABLE[((sample >> 7) & 0xff) as usize];
    let mantissa = (sample >> (exponent + 3)) & 0x0f;
    !(sign | (exponent << 4) | mantissa) as u8
}

/// Expand one 8-bit mu-law sample to 16 bits.
pub fn decode_sample(mu_law: u8) -> i16 {
    let value = i32::from(!mu_law);
    let sign = value & 0x80;
    let exponent = (value >> 4) & 0x07;
    let mantissa = value & 0x0f;
    let sample = DECODE_TABLE[exponent as usize] + (mantissa << (exponent + 3));
    (if sign != 0 { -sample } else { sample }) as i16
}

/// Compand a run of samples.
pub fn encode(samples: &[i16]) -> Vec<u8> {
    samples.iter().map(|&sample| encode_sample(sample)).collect()
}

/// Expand a run of samples.
pub fn decode(samples: &[u8]) -> Vec<i16> {
    samples.iter().map(|&sample| decode_sample(sample)).collect()
}
