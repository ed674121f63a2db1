//! Audio conversions
//!
//! Bit-depth, companding, ADPCM and container conversions. Every
//! conversion rebuilds the audio chunks through the from-scratch header
//! derivation, so `fmt`/`fact`/`data` always agree with the new encoding
//! while metadata chunks (cue, smpl, bext, LIST, iXML, _PMX, junk) ride
//! along untouched.

use super::chunks::BitDepth;
use super::WaveFile;
use crate::codec::adpcm::{AdpcmDecoder, AdpcmEncoder};
use crate::codec::{bitdepth, g711};
use crate::error::{Error, Result};
use crate::format::riff::Container;

impl WaveFile {
    /// Rescale linear samples to another bit depth.
    ///
    /// Both sides must be PCM or float; the codec conversions handle the
    /// compressed depths.
    pub fn to_bit_depth(&mut self, target: BitDepth) -> Result<()> {
        if target.is_compressed() {
            return Err(Error::unsupported(format!(
                "Cannot rescale to {}; use the codec conversions",
                target
            )));
        }
        if self.bit_depth.is_compressed() {
            return Err(Error::unsupported(format!(
                "Cannot rescale compressed {} audio; decode it first",
                self.bit_depth
            )));
        }
        if self.bit_depth == target {
            return Ok(());
        }
        tracing::debug!(from = %self.bit_depth, to = %target, "bit depth conversion");
        let mut samples = self.samples_f64()?;
        bitdepth::convert(
            &mut samples,
            &self.bit_depth.to_string(),
            &target.to_string(),
        )?;
        let (channels, rate) = self.audio_params()?;
        self.rebuild_audio(channels, rate, target, &samples)
    }

    /// Compand to 8-bit A-law, converting to 16-bit PCM first if needed.
    pub fn to_a_law(&mut self) -> Result<()> {
        let samples = self.samples_i16()?;
        let encoded = to_f64(&g711::alaw::encode(&samples));
        let (channels, rate) = self.audio_params()?;
        self.rebuild_audio(channels, rate, BitDepth::ALaw, &encoded)
    }

    /// Expand A-law data back to 16-bit PCM.
    pub fn from_a_law(&mut self) -> Result<()> {
        if self.bit_depth != BitDepth::ALaw {
            return Err(Error::codec("File does not contain A-law audio"));
        }
        let decoded = to_f64(&g711::alaw::decode(&self.data));
        let (channels, rate) = self.audio_params()?;
        self.rebuild_audio(channels, rate, BitDepth::Pcm(16), &decoded)
    }

    /// Compand to 8-bit mu-law, converting to 16-bit PCM first if needed.
    pub fn to_mu_law(&mut self) -> Result<()> {
        let samples = self.samples_i16()?;
        let encoded = to_f64(&g711::mulaw::encode(&samples));
        let (channels, rate) = self.audio_params()?;
        self.rebuild_audio(channels, rate, BitDepth::MuLaw, &encoded)
    }

    /// Expand mu-law data back to 16-bit PCM.
    pub fn from_mu_law(&mut self) -> Result<()> {
        if self.bit_depth != BitDepth::MuLaw {
            return Err(Error::codec("File does not contain mu-law audio"));
        }
        let decoded = to_f64(&g711::mulaw::decode(&self.data));
        let (channels, rate) = self.audio_params()?;
        self.rebuild_audio(channels, rate, BitDepth::Pcm(16), &decoded)
    }

    /// Compress to IMA ADPCM. Only mono 8000 Hz audio can be compressed.
    pub fn to_ima_adpcm(&mut self) -> Result<()> {
        let fmt = self.fmt_ref()?;
        if fmt.sample_rate != 8000 {
            return Err(Error::codec(
                "Only 8000 Hz audio can be compressed as IMA ADPCM",
            ));
        }
        if fmt.num_channels != 1 {
            return Err(Error::codec(
                "Only mono audio can be compressed as IMA ADPCM",
            ));
        }
        let samples = self.samples_i16()?;
        let encoded = to_f64(&AdpcmEncoder::default().encode(&samples));
        let (channels, rate) = self.audio_params()?;
        self.rebuild_audio(channels, rate, BitDepth::Adpcm, &encoded)
    }

    /// Decompress IMA ADPCM data to 16-bit PCM.
    pub fn from_ima_adpcm(&mut self) -> Result<()> {
        if self.bit_depth != BitDepth::Adpcm {
            return Err(Error::codec("File does not contain IMA ADPCM audio"));
        }
        let block_align = usize::from(self.fmt_ref()?.block_align);
        let decoded = to_f64(&AdpcmDecoder::default().decode(&self.data, block_align));
        let (channels, rate) = self.audio_params()?;
        self.rebuild_audio(channels, rate, BitDepth::Pcm(16), &decoded)
    }

    /// Move to the little-endian RIFF container.
    pub fn to_riff(&mut self) -> Result<()> {
        self.to_container(Container::Riff)
    }

    /// Move to the big-endian RIFX container.
    pub fn to_rifx(&mut self) -> Result<()> {
        self.to_container(Container::Rifx)
    }

    /// Move to the RF64 container, creating its ds64 chunk.
    pub fn to_rf64(&mut self) -> Result<()> {
        self.to_container(Container::Rf64)
    }

    fn to_container(&mut self, container: Container) -> Result<()> {
        if self.container == container {
            return Ok(());
        }
        // Unpack in the old byte order, repack in the new one
        let samples = self.samples_f64()?;
        let (channels, rate) = self.audio_params()?;
        self.container = container;
        self.rebuild_audio(channels, rate, self.bit_depth, &samples)
    }

    fn audio_params(&self) -> Result<(u16, u32)> {
        let fmt = self.fmt_ref()?;
        Ok((fmt.num_channels, fmt.sample_rate))
    }

    /// The samples as 16-bit PCM, rescaling linear audio when needed.
    fn samples_i16(&mut self) -> Result<Vec<i16>> {
        if self.bit_depth != BitDepth::Pcm(16) {
            self.to_bit_depth(BitDepth::Pcm(16))?;
        }
        Ok(self
            .samples_f64()?
            .into_iter()
            .map(|sample| sample as i16)
            .collect())
    }
}

fn to_f64<T: Copy + Into<f64>>(values: &[T]) -> Vec<f64> {
    values.iter().map(|&value| value.into()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pcm16(rate: u32, samples: &[f64]) -> WaveFile {
        WaveFile::from_scratch(1, rate, BitDepth::Pcm(16), samples).unwrap()
    }

    #[test]
    fn test_bit_depth_conversion_rescales() {
        let mut wav = pcm16(8000, &[0.0, 32767.0, -32768.0, -256.0]);
        wav.to_bit_depth(BitDepth::Pcm(24)).unwrap();
        assert_eq!(wav.bit_depth, BitDepth::Pcm(24));
        assert_eq!(wav.fmt.as_ref().unwrap().bits_per_sample, 24);
        assert_eq!(
            wav.samples_f64().unwrap(),
            vec![0.0, 8388607.0, -8388608.0, -65536.0]
        );
    }

    #[test]
    fn test_bit_depth_conversion_rejects_compressed() {
        let mut wav = pcm16(8000, &[0.0]);
        assert!(wav.to_bit_depth(BitDepth::ALaw).is_err());
        wav.to_mu_law().unwrap();
        assert!(wav.to_bit_depth(BitDepth::Pcm(24)).is_err());
    }

    #[test]
    fn test_a_law_round_trip() {
        let mut wav = pcm16(8000, &[0.0, 1000.0, -1000.0]);
        wav.to_a_law().unwrap();
        assert_eq!(wav.bit_depth, BitDepth::ALaw);
        assert_eq!(wav.fmt.as_ref().unwrap().audio_format, 6);
        assert_eq!(wav.fact.as_ref().unwrap().dw_sample_length, 3);
        wav.from_a_law().unwrap();
        assert_eq!(wav.bit_depth, BitDepth::Pcm(16));
        let samples = wav.samples_f64().unwrap();
        assert_eq!(samples[0], 8.0);
        assert!((samples[1] - 1000.0).abs() <= 64.0);
        assert!((samples[2] + 1000.0).abs() <= 64.0);
    }

    #[test]
    fn test_mu_law_round_trip() {
        let mut wav = pcm16(8000, &[0.0, 1000.0, -1000.0]);
        wav.to_mu_law().unwrap();
        assert_eq!(wav.fmt.as_ref().unwrap().audio_format, 7);
        wav.from_mu_law().unwrap();
        let samples = wav.samples_f64().unwrap();
        assert_eq!(samples[0], 0.0);
        assert!((samples[1] - 1000.0).abs() <= 32.0);
    }

    #[test]
    fn test_from_companded_requires_matching_depth() {
        let mut wav = pcm16(8000, &[0.0]);
        assert!(wav.from_a_law().is_err());
        assert!(wav.from_mu_law().is_err());
        assert!(wav.from_ima_adpcm().is_err());
    }

    #[test]
    fn test_adpcm_requires_mono_8khz() {
        let mut stereo =
            WaveFile::from_scratch(2, 8000, BitDepth::Pcm(16), &[0.0, 0.0]).unwrap();
        assert!(stereo.to_ima_adpcm().is_err());
        let mut fast = pcm16(44100, &[0.0]);
        assert!(fast.to_ima_adpcm().is_err());
    }

    #[test]
    fn test_adpcm_round_trip_headers() {
        let samples: Vec<f64> = (0..505).map(|n| f64::from((n % 64) * 100 - 3200)).collect();
        let mut wav = pcm16(8000, &samples);
        wav.to_ima_adpcm().unwrap();
        assert_eq!(wav.bit_depth, BitDepth::Adpcm);
        let fmt = wav.fmt.as_ref().unwrap();
        assert_eq!(fmt.audio_format, 17);
        assert_eq!(fmt.block_align, 256);
        assert_eq!(wav.data.len(), 256);
        wav.from_ima_adpcm().unwrap();
        assert_eq!(wav.bit_depth, BitDepth::Pcm(16));
        assert_eq!(wav.fmt.as_ref().unwrap().bits_per_sample, 16);
        assert_eq!(wav.sample_count(), 506);
    }

    #[test]
    fn test_compand_from_float_source() {
        let mut wav = WaveFile::from_scratch(1, 8000, BitDepth::Float32, &[0.5, -0.25]).unwrap();
        wav.to_mu_law().unwrap();
        assert_eq!(wav.bit_depth, BitDepth::MuLaw);
        wav.from_mu_law().unwrap();
        let samples = wav.samples_f64().unwrap();
        assert!((samples[0] - 16383.0).abs() <= 512.0);
    }

    #[test]
    fn test_container_moves_repack_samples() {
        let mut wav = pcm16(8000, &[258.0, -2.0]);
        let le_data = wav.data.clone();
        wav.to_rifx().unwrap();
        assert_eq!(wav.container, Container::Rifx);
        assert_eq!(wav.data, vec![0x01, 0x02, 0xff, 0xfe]);
        assert_eq!(wav.samples_f64().unwrap(), vec![258.0, -2.0]);
        wav.to_riff().unwrap();
        assert_eq!(wav.data, le_data);
    }

    #[test]
    fn test_metadata_survives_conversion() {
        let mut wav = pcm16(8000, &[0.0, 100.0]);
        wav.set_tag("ICMT", "keep me").unwrap();
        wav.to_a_law().unwrap();
        wav.from_a_law().unwrap();
        assert_eq!(wav.get_tag("ICMT"), Some("keep me".to_string()));
    }

    #[test]
    fn test_rf64_conversion_creates_ds64() {
        let mut wav = pcm16(8000, &[0.0]);
        wav.to_rf64().unwrap();
        assert!(wav.ds64.is_some());
        wav.to_riff().unwrap();
        assert!(wav.ds64.is_none());
    }
}
