//! IMA ADPCM decoder

use super::{BLOCK_SIZE, INDEX_TABLE, STEP_TABLE};

/// Block decoder state
#[derive(Debug)]
pub struct AdpcmDecoder {
    predicted: i32,
    step_index: i32,
    step: i32,
}

impl Default for AdpcmDecoder {
    fn default() -> Self {
        AdpcmDecoder {
            predicted: 0,
            step_index: 0,
            step: STEP_TABLE[0],
        }
    }
}

impl AdpcmDecoder {
    /// Create a decoder with zeroed prediction state.
    pub fn new() -> Self {
        AdpcmDecoder::default()
    }

    /// Decode ADPCM blocks into 16-bit samples.
    ///
    /// `block_align` is the encoded block size; sources that do not
    /// specify one use [`BLOCK_SIZE`]. A trailing block shorter than the
    /// 4-byte header is ignored.
    pub fn decode(&mut self, data: &[u8], block_align: usize) -> Vec<i16> {
        let block_align = if block_align == 0 { BLOCK_SIZE } else { block_align };
        let mut out = Vec::with_capacity(data.len() * 2);
        for block in data.chunks(block_align) {
            if block.len() >= 4 {
                self.decode_block(block, &mut out);
            }
        }
        out
    }

    /// Decode one block.
    ///
    /// Emits the raw header sample, a sample decoded from the low nibble
    /// of the reserved header byte, then two samples per data byte, low
    /// nibble first.
    fn decode_block(&mut self, block: &[u8], out: &mut Vec<i16>) {
        self.predicted = i32::from(i16::from_le_bytes([block[0], block[1]]));
        self.step_index = i32::from(block[2]).clamp(0, 88);
        self.step = STEP_TABLE[self.step_index as usize];

        out.push(self.predicted as i16);
        out.push(self.decode_sample(block[3] & 0xf));
        for &byte in &block[4..] {
            out.push(self.decode_sample(byte & 0xf));
            out.push(self.decode_sample(byte >> 4));
        }
    }

    /// Reconstruct one sample from a nibble.
    fn decode_sample(&mut self, nibble: u8) -> i16 {
        let mut difference = 0;
        if nibble & 4 != 0 {
            difference += self.step;
        }
        if nibble & 2 != 0 {
            difference += self.step >> 1;
        }
        if nibble & 1 != 0 {
            difference += self.step >> 2;
        }
        difference += self.step >> 3;
        if nibble & 8 != 0 {
            difference = -difference;
        }

        // Asymmetric clamp, one step narrower than the encoder's
        self.predicted = (self.predicted + difference).clamp(-32767, 32767);

        self.step_index = (self.step_index + INDEX_TABLE[nibble as usize]).clamp(0, 88);
        self.step = STEP_TABLE[self.step_index as usize];
        self.predicted as i16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_sample_is_emitted_raw() {
        let mut block = vec![0u8; 256];
        block[0..2].copy_from_slice(&(-1234i16).to_le_bytes());
        block[2] = 10;
        let mut decoder = AdpcmDecoder::new();
        let samples = decoder.decode(&block, 256);
        assert_eq!(samples.len(), 2 + 252 * 2);
        assert_eq!(samples[0], -1234);
    }

    #[test]
    fn test_short_trailing_block_is_ignored() {
        let mut decoder = AdpcmDecoder::new();
        let mut data = vec![0u8; 256];
        data.extend_from_slice(&[1, 2]);
        let samples = decoder.decode(&data, 256);
        assert_eq!(samples.len(), 506);
    }

    #[test]
    fn test_custom_block_align() {
        let mut decoder = AdpcmDecoder::new();
        let data = vec![0u8; 1024];
        let samples = decoder.decode(&data, 512);
        assert_eq!(samples.len(), 2 * (2 + 508 * 2));
    }

    #[test]
    fn test_out_of_range_step_index_is_clamped() {
        let mut decoder = AdpcmDecoder::new();
        let block = [0, 0, 200, 0];
        let samples = decoder.decode(&block, 256);
        assert_eq!(samples.len(), 2);
        // Clamped to the top of the step table rather than panicking
        assert_eq!(samples[1], STEP_TABLE[88] as i16 >> 3);
    }
}
