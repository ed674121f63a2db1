//! Generic RIFF chunked-container support
//!
//! RIFF files are a sequence of tagged, length-prefixed chunks after a
//! 12-byte container header. `LIST` chunks nest recursively. This module
//! holds the shared chunk tree types; `reader` walks a byte buffer into
//! that tree and `writer` emits chunks back out with correct padding.

pub mod reader;
pub mod writer;

pub use reader::{ChunkNode, RiffIndex};
pub use writer::ChunkWriter;

use crate::error::{Error, Result};

/// RIFF container magic numbers
pub const RIFF_MAGIC: &[u8; 4] = b"RIFF";
pub const RIFX_MAGIC: &[u8; 4] = b"RIFX";
pub const RF64_MAGIC: &[u8; 4] = b"RF64";
pub const WAVE_MAGIC: &[u8; 4] = b"WAVE";
pub const LIST_CHUNK: &[u8; 4] = b"LIST";

/// RIFF container flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Container {
    /// Classic little-endian RIFF
    #[default]
    Riff,
    /// Big-endian RIFX
    Rifx,
    /// 64-bit size extension (little-endian, requires a ds64 chunk)
    Rf64,
}

impl Container {
    /// Parse a container tag.
    pub fn from_tag(tag: &[u8]) -> Result<Self> {
        match tag {
            t if t == RIFF_MAGIC => Ok(Container::Riff),
            t if t == RIFX_MAGIC => Ok(Container::Rifx),
            t if t == RF64_MAGIC => Ok(Container::Rf64),
            _ => Err(Error::format(format!(
                "Unsupported container tag {:?}",
                String::from_utf8_lossy(tag)
            ))),
        }
    }

    /// The on-disk container tag.
    pub fn tag(self) -> &'static [u8; 4] {
        match self {
            Container::Riff => RIFF_MAGIC,
            Container::Rifx => RIFX_MAGIC,
            Container::Rf64 => RF64_MAGIC,
        }
    }

    /// Integer fields are big-endian only for RIFX.
    pub fn is_big_endian(self) -> bool {
        self == Container::Rifx
    }
}

/// Render a FourCC for diagnostics.
pub(crate) fn fourcc(id: [u8; 4]) -> String {
    String::from_utf8_lossy(&id).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_tags() {
        assert_eq!(Container::from_tag(b"RIFF").unwrap(), Container::Riff);
        assert_eq!(Container::from_tag(b"RIFX").unwrap(), Container::Rifx);
        assert_eq!(Container::from_tag(b"RF64").unwrap(), Container::Rf64);
        assert!(Container::from_tag(b"FORM").is_err());
        assert!(Container::Rifx.is_big_endian());
        assert!(!Container::Rf64.is_big_endian());
    }
}
