//! Audio sample codecs
//!
//! Sample-level transforms used by the WAVE conversion entry points:
//!
//! - `bitdepth`: linear PCM rescaling between bit depths
//! - `adpcm`: IMA ADPCM 4-bit adaptive differential coding
//! - `g711`: A-law and mu-law logarithmic companding

pub mod adpcm;
pub mod bitdepth;
pub mod g711;

pub use adpcm::{AdpcmDecoder, AdpcmEncoder};
