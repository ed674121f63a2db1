//! A-law companding

/// Segment (exponent) lookup indexed by the top magnitude bits
const LOG_TABLE: [i32; 128] = [
    1, 1, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 4, 4, 4, 4, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5,
    5, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6,
    6, 6, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7,
    7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7,
    7, 7, 7, 7,
];

/// Compand one 16-bit sample to 8-bit A-law.
pub fn encode_sample(sample: i16) -> u8 {
    let mut sample = if sample == i16::MIN {
        -32767
    } else {
        i32::from(sample)
    };
    // Bit 7 set here means the original sample was non-negative
    let sign = ((!sample) >> 8) & 0x80;
    if sign == 0 {
        sample = -sample;
    }
    if sample > 32635 {
        sample = 32635;
    }
    let companded = if sample >= 256 {
        let exponent = LOG_TABLE[((sample >> 8) & 0x7f) as usize];
        let mantissa = (sample >> (exponent + 3)) & 0x0f;
        (exponent << 4) | mantissa
    } else {
        sample >> 4
    };
    (companded ^ (sign ^ 0x55)) as u8
}

/// Expand one 8-bit A-law sample to 16 bits.
pub fn decode_sample(a_law: u8) -> i16 {
    let mut value = i32::from(a_law) ^ 0x55;
    let mut sign = 0;
    if value & 0x80 != 0 {
        value &= !0x80;
        sign = -1;
    }
    let position = ((value & 0xf0) >> 4) + 4;
    let decoded = if position != 4 {
        (1 << position) | ((value & 0x0f) << (position - 4)) | (1 << (position - 5))
    } else {
        (value << 1) | 1
    };
    let decoded = if sign == 0 { decoded } else { -decoded };
    // The sign convention above is inverted relative to the stored bit, so
    // the reference scale step carries a final negation that restores it.
    ((decoded * 8) * -1) as i16
}

/// Compand a run of samples.
pub fn encode(samples: &[i16]) -> Vec<u8> {
    samples.iter().map(|&sample| encode_sample(sample)).collect()
}

/// Expand a run of samples.
pub fn decode(samples: &[u8]) -> Vec<i16> {
    samples.iter().map(|&sample| decode_sample(sample)).collect()
}
