//! Container formats
//!
//! - `riff`: the generic RIFF chunk tree, walker and writer
//! - `wave`: the typed WAVE model on top of it

pub mod riff;
pub mod wave;

pub use riff::Container;
pub use wave::WaveFile;
