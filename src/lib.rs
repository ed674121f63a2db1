//! WAVE audio file reading, writing and conversion.
//!
//! Parse RIFF, RIFX and RF64 containers into a typed [`WaveFile`],
//! edit its chunks and samples, convert between bit depths and codecs,
//! and serialize back out:
//!
//! ```
//! use riffwave::{BitDepth, WaveFile};
//!
//! # fn main() -> riffwave::Result<()> {
//! let mut wav = WaveFile::from_scratch(1, 8000, BitDepth::Pcm(16), &[0.0, 256.0, -256.0])?;
//! wav.set_tag("ICMT", "a short beep")?;
//! wav.to_bit_depth(BitDepth::Pcm(24))?;
//! let bytes = wav.to_bytes()?;
//! let back = WaveFile::from_bytes(&bytes)?;
//! assert_eq!(back.bit_depth, BitDepth::Pcm(24));
//! # Ok(())
//! # }
//! ```
//!
//! Module map:
//!
//! - [`format::riff`]: generic chunk walker and writer
//! - [`format::wave`]: the typed WAVE file model and its operations
//! - [`codec`]: bit-depth rescaling, IMA ADPCM and G.711 companding
//! - [`util`]: packed value codec for 1 to 53 bit integers and floats

pub mod codec;
pub mod error;
pub mod format;
pub mod util;

pub use error::{Error, Result};
pub use format::riff::Container;
pub use format::wave::{BitDepth, CueEntry, WaveFile};

/// Library version, from the crate manifest.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
