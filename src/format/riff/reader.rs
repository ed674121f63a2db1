//! RIFF chunk walker
//!
//! Parses a byte buffer into a tree of chunk descriptors without copying
//! payloads: each leaf records the byte range of its payload in the source
//! buffer. `LIST` chunks carry a 4-byte format tag and recurse.

use std::ops::Range;

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use super::{fourcc, Container, LIST_CHUNK, WAVE_MAGIC};
use crate::error::{Error, Result};

/// One parsed chunk descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkNode {
    /// A plain chunk: payload is `range` in the source buffer
    Leaf {
        id: [u8; 4],
        size: u32,
        range: Range<usize>,
    },
    /// A `LIST` chunk with its format tag and parsed children
    List {
        id: [u8; 4],
        size: u32,
        format: [u8; 4],
        children: Vec<ChunkNode>,
    },
}

impl ChunkNode {
    /// The chunk id of this node.
    pub fn id(&self) -> [u8; 4] {
        match self {
            ChunkNode::Leaf { id, .. } | ChunkNode::List { id, .. } => *id,
        }
    }

    /// The declared (unpadded) payload size.
    pub fn size(&self) -> u32 {
        match self {
            ChunkNode::Leaf { size, .. } | ChunkNode::List { size, .. } => *size,
        }
    }
}

/// Parsed view of a RIFF file: container header plus top-level chunk tree
#[derive(Debug, Clone)]
pub struct RiffIndex {
    /// Container flavor (decides integer endianness for all chunk fields)
    pub container: Container,
    /// Declared size from the container header
    pub declared_size: u32,
    /// Top-level chunks in file order
    pub chunks: Vec<ChunkNode>,
}

impl RiffIndex {
    /// Parse a buffer into a chunk index.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        if buf.len() < 12 {
            return Err(Error::format("Buffer too small for a RIFF header"));
        }
        let container = Container::from_tag(&buf[0..4])?;
        let be = container.is_big_endian();
        let declared_size = read_u32(&buf[4..8], be);
        if &buf[8..12] != WAVE_MAGIC {
            return Err(Error::format(format!(
                "Expected WAVE format tag, got {:?}",
                String::from_utf8_lossy(&buf[8..12])
            )));
        }
        tracing::debug!(
            container = ?container,
            declared_size,
            len = buf.len(),
            "parsing RIFF chunk tree"
        );
        let chunks = walk(buf, 12, buf.len(), be)?;
        Ok(RiffIndex {
            container,
            declared_size,
            chunks,
        })
    }

    /// Find the first top-level chunk with the given id.
    pub fn find(&self, id: &[u8; 4]) -> Option<&ChunkNode> {
        self.chunks.iter().find(|chunk| &chunk.id() == id)
    }

    /// All top-level `LIST` chunks, in file order.
    pub fn lists(&self) -> Vec<&ChunkNode> {
        self.chunks
            .iter()
            .filter(|chunk| matches!(chunk, ChunkNode::List { .. }))
            .collect()
    }
}

fn read_u32(window: &[u8], be: bool) -> u32 {
    if be {
        BigEndian::read_u32(window)
    } else {
        LittleEndian::read_u32(window)
    }
}

/// Walk chunks over `buf[pos..end]`.
///
/// Chunks are disk-aligned to even byte boundaries: a chunk with an odd
/// declared size is followed by one pad byte that is not part of any
/// chunk's payload.
fn walk(buf: &[u8], mut pos: usize, end: usize, be: bool) -> Result<Vec<ChunkNode>> {
    let mut chunks = Vec::new();
    while pos + 8 <= end {
        let mut id = [0u8; 4];
        id.copy_from_slice(&buf[pos..pos + 4]);
        let size = read_u32(&buf[pos + 4..pos + 8], be);
        let payload_start = pos + 8;
        let payload_end = payload_start
            .checked_add(size as usize)
            .ok_or_else(|| Error::format("Chunk size overflows the buffer"))?;

        if &id == LIST_CHUNK && size >= 4 {
            if payload_start + 4 > end {
                return Err(Error::format("Truncated LIST chunk"));
            }
            let mut format = [0u8; 4];
            format.copy_from_slice(&buf[payload_start..payload_start + 4]);
            let children = walk(buf, payload_start + 4, payload_end.min(end), be)?;
            tracing::trace!(format = %fourcc(format), size, "LIST chunk");
            chunks.push(ChunkNode::List {
                id,
                size,
                format,
                children,
            });
        } else {
            tracing::trace!(id = %fourcc(id), size, "chunk");
            chunks.push(ChunkNode::Leaf {
                id,
                size,
                range: payload_start..payload_end.min(end),
            });
        }

        pos = payload_end;
        if size % 2 == 1 {
            pos += 1;
        }
    }
    Ok(chunks)
}
