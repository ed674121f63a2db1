//! Low-level RIFF chunk writer
//!
//! Builds chunk byte sequences with the container's byte order and the
//! mandatory even-byte alignment: any chunk whose payload has odd length
//! gets exactly one zero pad byte, applied per chunk at every nesting
//! level. The declared size field always reflects the unpadded length.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// Byte-sequence builder for chunk payloads and whole chunks
#[derive(Debug, Default)]
pub struct ChunkWriter {
    out: Vec<u8>,
    be: bool,
}

impl ChunkWriter {
    /// Create a writer for the given byte order.
    pub fn new(big_endian: bool) -> Self {
        ChunkWriter {
            out: Vec::new(),
            be: big_endian,
        }
    }

    /// Consume the writer, returning the built bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.out
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.out.len()
    }

    /// True if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    /// Write a FourCC tag (endianness never applies to tags).
    pub fn tag(&mut self, tag: &[u8; 4]) {
        self.out.extend_from_slice(tag);
    }

    /// Write raw bytes verbatim.
    pub fn raw(&mut self, bytes: &[u8]) {
        self.out.extend_from_slice(bytes);
    }

    /// Write a u16 in the container byte order.
    pub fn u16(&mut self, value: u16) {
        let mut tmp = [0u8; 2];
        if self.be {
            BigEndian::write_u16(&mut tmp, value);
        } else {
            LittleEndian::write_u16(&mut tmp, value);
        }
        self.out.extend_from_slice(&tmp);
    }

    /// Write a u32 in the container byte order.
    pub fn u32(&mut self, value: u32) {
        let mut tmp = [0u8; 4];
        if self.be {
            BigEndian::write_u32(&mut tmp, value);
        } else {
            LittleEndian::write_u32(&mut tmp, value);
        }
        self.out.extend_from_slice(&tmp);
    }

    /// Write a string into a fixed-width field, truncated or zero-padded.
    pub fn fixed_text(&mut self, text: &str, width: usize) {
        let bytes = text.as_bytes();
        let take = bytes.len().min(width);
        self.out.extend_from_slice(&bytes[..take]);
        self.out.resize(self.out.len() + (width - take), 0);
    }

    /// Write a complete chunk: id, unpadded size, payload, pad byte.
    pub fn chunk(&mut self, id: &[u8; 4], payload: &[u8]) {
        self.tag(id);
        self.u32(payload.len() as u32);
        self.raw(payload);
        if payload.len() % 2 == 1 {
            self.out.push(0);
        }
    }
}
