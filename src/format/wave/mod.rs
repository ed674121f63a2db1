//! WAVE file model
//!
//! [`WaveFile`] is the mutable in-memory representation of a WAVE file's
//! chunks, built on the generic RIFF walker/writer. It is populated either
//! by parsing a buffer (`from_bytes`) or from scratch out of a numeric
//! sample array (`from_scratch`); conversion operations rebuild the audio
//! chunks (`fmt`/`fact`/`data`, plus `ds64` for RF64) through the
//! from-scratch path while leaving metadata chunks untouched.

pub mod builder;
pub mod chunks;
pub mod convert;
pub mod meta;
pub mod parser;
pub mod writer;

use std::path::Path;

pub use meta::CueEntry;

pub use chunks::{
    BextChunk, BitDepth, CueChunk, CuePoint, Ds64Chunk, FactChunk, FmtChunk, JunkChunk,
    ListChunk, ListFormat, ListItem, SampleLoop, SmplChunk, TextChunk,
};

use crate::error::{Error, Result};
use crate::format::riff::Container;
use crate::util::ValueCodec;

/// A WAVE file's chunks and raw sample bytes
///
/// `fmt` and `data` are mandatory in any serializable file; every other
/// chunk is optional and absent by default.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveFile {
    /// Container flavor; decides byte order of every integer field
    pub container: Container,
    /// Bit-depth code of the samples in `data`
    pub bit_depth: BitDepth,
    pub fmt: Option<FmtChunk>,
    pub fact: Option<FactChunk>,
    pub cue: Option<CueChunk>,
    pub smpl: Option<SmplChunk>,
    pub bext: Option<BextChunk>,
    pub ds64: Option<Ds64Chunk>,
    pub ixml: Option<TextChunk>,
    pub pmx: Option<TextChunk>,
    pub junk: Option<JunkChunk>,
    /// LIST chunks in file order
    pub lists: Vec<ListChunk>,
    /// Raw (packed) sample bytes of the data chunk
    pub data: Vec<u8>,
}

impl Default for WaveFile {
    fn default() -> Self {
        WaveFile {
            container: Container::Riff,
            bit_depth: BitDepth::Pcm(16),
            fmt: None,
            fact: None,
            cue: None,
            smpl: None,
            bext: None,
            ds64: None,
            ixml: None,
            pmx: None,
            junk: None,
            lists: Vec::new(),
            data: Vec::new(),
        }
    }
}

impl WaveFile {
    /// Read and parse a WAVE file from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let buf = std::fs::read(path)?;
        Self::from_bytes(&buf)
    }

    /// Serialize and write this file to disk.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// The format chunk, which any playable file must carry.
    pub fn fmt_ref(&self) -> Result<&FmtChunk> {
        self.fmt
            .as_ref()
            .ok_or_else(|| Error::format("File has no fmt chunk"))
    }

    /// Value codec for the current bit depth and container byte order.
    pub(crate) fn sample_codec(&self) -> Result<ValueCodec> {
        ValueCodec::new(self.bit_depth.sample_type(), self.container.is_big_endian())
    }

    /// Number of stored sample values (all channels interleaved).
    pub fn sample_count(&self) -> usize {
        self.data.len() / usize::from(self.bit_depth.storage_bytes())
    }

    /// Read one interleaved sample value by index.
    pub fn get_sample(&self, index: usize) -> Result<f64> {
        let len = self.sample_count();
        if index >= len {
            return Err(Error::OutOfRange { index, len });
        }
        let codec = self.sample_codec()?;
        codec.read_at(&self.data, index * codec.bytes_per_value())
    }

    /// Overwrite one interleaved sample value by index.
    pub fn set_sample(&mut self, index: usize, value: f64) -> Result<()> {
        let len = self.sample_count();
        if index >= len {
            return Err(Error::OutOfRange { index, len });
        }
        let codec = self.sample_codec()?;
        codec.write_at(&mut self.data, index * codec.bytes_per_value(), value)
    }

    /// Unpack every sample value to a numeric array.
    pub fn samples_f64(&self) -> Result<Vec<f64>> {
        Ok(self.sample_codec()?.unpack_all(&self.data))
    }
}
