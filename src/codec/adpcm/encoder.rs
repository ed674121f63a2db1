//! IMA ADPCM encoder

use super::{BLOCK_SIZE, INDEX_TABLE, SAMPLES_PER_BLOCK, STEP_TABLE};

/// Block encoder state
///
/// `predicted` tracks the int16 running prediction, `step_index` the
/// position in the step-size table. Both persist across blocks within one
/// `encode` call and are owned by this instance, never shared.
#[derive(Debug, Default)]
pub struct AdpcmEncoder {
    predicted: i32,
    step_index: i32,
}

impl AdpcmEncoder {
    /// Create an encoder with zeroed prediction state.
    pub fn new() -> Self {
        AdpcmEncoder::default()
    }

    /// Encode 16-bit samples into 256-byte ADPCM blocks.
    ///
    /// Every block, including a trailing partial one, occupies exactly
    /// [`BLOCK_SIZE`] bytes; short blocks are padded with zero bytes.
    pub fn encode(&mut self, samples: &[i16]) -> Vec<u8> {
        let blocks = samples.len().div_ceil(SAMPLES_PER_BLOCK);
        let mut out = Vec::with_capacity(blocks * BLOCK_SIZE);
        for block in samples.chunks(SAMPLES_PER_BLOCK) {
            self.encode_block(block, &mut out);
        }
        out
    }

    /// Encode one block: 4-byte header then nibble pairs, low nibble first.
    fn encode_block(&mut self, block: &[i16], out: &mut Vec<u8>) {
        let start = out.len();

        // The header carries the raw first sample; encoding it primes the
        // predictor and step index recorded alongside.
        let head = block[0];
        self.encode_sample(head);
        out.extend_from_slice(&head.to_le_bytes());
        out.push(self.step_index as u8);
        out.push(0);

        for pair in block[1..].chunks(2) {
            let low = self.encode_sample(pair[0]);
            let high = match pair.get(1) {
                Some(&sample) => self.encode_sample(sample),
                // Partial trailing pair: pad with a zero sample
                None => self.encode_sample(0),
            };
            out.push((high << 4) | low);
        }

        out.resize(start + BLOCK_SIZE, 0);
    }

    /// Quantize one sample against the current prediction.
    fn encode_sample(&mut self, sample: i16) -> u8 {
        let mut delta = i32::from(sample) - self.predicted;
        let mut nibble = 0u8;
        if delta < 0 {
            nibble = 8;
            delta = -delta;
        }

        // Three-step magnitude comparison against the current step size,
        // accumulating the reconstruction diff with the implicit rounding
        // term step/8.
        let mut step = STEP_TABLE[self.step_index as usize];
        let mut diff = step >> 3;
        if delta > step {
            nibble |= 4;
            delta -= step;
            diff += step;
        }
        step >>= 1;
        if delta > step {
            nibble |= 2;
            delta -= step;
            diff += step;
        }
        step >>= 1;
        if delta > step {
            nibble |= 1;
            diff += step;
        }

        if nibble & 8 != 0 {
            self.predicted -= diff;
        } else {
            self.predicted += diff;
        }
        self.predicted = self.predicted.clamp(-32768, 32767);

        self.step_index = (self.step_index + INDEX_TABLE[(nibble & 7) as usize]).clamp(0, 88);
        nibble
    }
}
