//! From-scratch WAVE construction
//!
//! Derives the audio chunks (`fmt`, `fact`, `data`, and `ds64` for RF64)
//! from a channel count, sample rate, bit-depth code and interleaved
//! sample array. The conversion entry points reuse [`WaveFile::rebuild_audio`]
//! so a converted file always carries a freshly derived header.

use super::chunks::{BitDepth, FactChunk, FmtChunk};
use super::WaveFile;
use crate::error::{Error, Result};
use crate::format::riff::Container;
use crate::util::ValueCodec;

/// WAVE_FORMAT_EXTENSIBLE format code
pub const WAVE_FORMAT_EXTENSIBLE: u16 = 65534;

/// Tail of the KSDATAFORMAT subtype GUID shared by PCM and float
const SUBFORMAT_TAIL: [u32; 3] = [0x0010_0000, 0xAA00_0080, 0x719B_3800];

impl WaveFile {
    /// Build a RIFF file from interleaved samples.
    ///
    /// Samples are numeric values at the given depth; for the compressed
    /// codes (`Adpcm`, `ALaw`, `MuLaw`) they are already-encoded byte
    /// values in `0..=255`.
    pub fn from_scratch(
        num_channels: u16,
        sample_rate: u32,
        bit_depth: BitDepth,
        samples: &[f64],
    ) -> Result<Self> {
        Self::from_scratch_in(Container::Riff, num_channels, sample_rate, bit_depth, samples)
    }

    /// Build a file from interleaved samples in a specific container.
    pub fn from_scratch_in(
        container: Container,
        num_channels: u16,
        sample_rate: u32,
        bit_depth: BitDepth,
        samples: &[f64],
    ) -> Result<Self> {
        let mut wav = WaveFile {
            container,
            ..WaveFile::default()
        };
        wav.rebuild_audio(num_channels, sample_rate, bit_depth, samples)?;
        Ok(wav)
    }

    /// Replace the audio chunks, leaving metadata chunks untouched.
    pub(crate) fn rebuild_audio(
        &mut self,
        num_channels: u16,
        sample_rate: u32,
        bit_depth: BitDepth,
        samples: &[f64],
    ) -> Result<()> {
        validate_block_limits(num_channels, sample_rate, bit_depth)?;

        let codec = ValueCodec::new(bit_depth.sample_type(), self.container.is_big_endian())?;
        let data = codec.pack_all(samples)?;
        let bytes = bit_depth.storage_bytes();

        let mut fmt = FmtChunk {
            chunk_size: 16,
            audio_format: bit_depth.audio_format(),
            num_channels,
            sample_rate,
            byte_rate: u32::from(num_channels) * u32::from(bytes) * sample_rate,
            block_align: num_channels * bytes,
            bits_per_sample: bit_depth.bits(),
            ..FmtChunk::default()
        };

        self.fact = None;
        match bit_depth {
            BitDepth::Adpcm => {
                fmt.chunk_size = 20;
                fmt.byte_rate = (u64::from(sample_rate) * 256 / 505) as u32;
                fmt.block_align = 256;
                fmt.cb_size = 2;
                fmt.valid_bits_per_sample = 505;
                self.fact = Some(FactChunk {
                    dw_sample_length: data.len() as u32 * 2,
                });
            }
            BitDepth::ALaw | BitDepth::MuLaw => {
                fmt.chunk_size = 20;
                fmt.cb_size = 2;
                fmt.valid_bits_per_sample = 8;
                self.fact = Some(FactChunk {
                    dw_sample_length: samples.len() as u32,
                });
            }
            _ if num_channels > 2 || !bit_depth.is_standard() => {
                fmt.audio_format = WAVE_FORMAT_EXTENSIBLE;
                fmt.chunk_size = 40;
                fmt.cb_size = 22;
                fmt.valid_bits_per_sample = bit_depth.bits();
                fmt.bits_per_sample = bytes * 8;
                fmt.channel_mask = channel_mask(num_channels);
                let base: u32 = match bit_depth {
                    BitDepth::Float32 | BitDepth::Float64 => 3,
                    _ => 1,
                };
                fmt.sub_format = [base, SUBFORMAT_TAIL[0], SUBFORMAT_TAIL[1], SUBFORMAT_TAIL[2]];
            }
            _ => {}
        }

        self.bit_depth = bit_depth;
        self.fmt = Some(fmt);
        self.data = data;
        if self.container == Container::Rf64 {
            // Sizes are filled in at serialization time
            self.ds64.get_or_insert_with(Default::default);
        } else {
            self.ds64 = None;
        }
        Ok(())
    }
}

/// Standard speaker position masks by channel count
fn channel_mask(num_channels: u16) -> u32 {
    match num_channels {
        1 => 0x4,
        2 => 0x3,
        4 => 0x33,
        6 => 0x3f,
        8 => 0x63f,
        _ => 0,
    }
}

/// Enforce the header invariants.
///
/// Violations are construction/serialization errors, never silent fixes.
/// The limits are exact: block align up to 65535 and byte rate up to
/// 4294967295 are accepted, one unit beyond is not.
pub(crate) fn validate_audio_params(num_channels: u16, sample_rate: u32) -> Result<()> {
    if num_channels < 1 {
        return Err(Error::validation("Channel count must be at least 1"));
    }
    if sample_rate < 1 {
        return Err(Error::validation("Sample rate must be at least 1"));
    }
    Ok(())
}

/// Depth-aware size checks shared by construction and serialization.
pub(crate) fn validate_block_limits(
    num_channels: u16,
    sample_rate: u32,
    bit_depth: BitDepth,
) -> Result<()> {
    validate_audio_params(num_channels, sample_rate)?;
    let block_align = u64::from(num_channels) * u64::from(bit_depth.storage_bytes());
    if block_align > 65535 {
        return Err(Error::validation(format!(
            "Block align {} exceeds the u16 field limit",
            block_align
        )));
    }
    let byte_rate = block_align * u64::from(sample_rate);
    if byte_rate > 4_294_967_295 {
        return Err(Error::validation(format!(
            "Byte rate {} exceeds the u32 field limit",
            byte_rate
        )));
    }
    Ok(())
}
