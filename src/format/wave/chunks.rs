//! Typed WAVE chunk structures
//!
//! In-memory representations of the chunks a WAVE file may carry. Field
//! names follow the on-disk field names of the format specification.
//! Optional chunks are absent from [`super::WaveFile`] entirely rather
//! than carrying sentinel values.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::util::SampleType;

/// Audio bit-depth code
///
/// Mirrors the string codes used by the conversion API: `"4"` (IMA
/// ADPCM), `"8a"` (A-law), `"8m"` (mu-law), `"8"`..`"53"` (linear PCM),
/// `"32f"` and `"64"` (IEEE float).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitDepth {
    /// IMA ADPCM, 4 bits per sample
    Adpcm,
    /// G.711 A-law, 8 bits per sample
    ALaw,
    /// G.711 mu-law, 8 bits per sample
    MuLaw,
    /// Linear PCM at 8 to 53 bits (8-bit is unsigned-with-bias)
    Pcm(u8),
    /// IEEE single-precision float
    Float32,
    /// IEEE double-precision float
    Float64,
}

impl BitDepth {
    /// Nominal bits per sample.
    pub fn bits(self) -> u16 {
        match self {
            BitDepth::Adpcm => 4,
            BitDepth::ALaw | BitDepth::MuLaw => 8,
            BitDepth::Pcm(bits) => u16::from(bits),
            BitDepth::Float32 => 32,
            BitDepth::Float64 => 64,
        }
    }

    /// Bytes one stored sample occupies.
    pub fn storage_bytes(self) -> u16 {
        match self {
            // ADPCM payload is manipulated as raw bytes
            BitDepth::Adpcm => 1,
            other => (other.bits() + 7) / 8,
        }
    }

    /// True for the ADPCM/companding codes.
    pub fn is_compressed(self) -> bool {
        matches!(self, BitDepth::Adpcm | BitDepth::ALaw | BitDepth::MuLaw)
    }

    /// True for the depths a plain 16-byte fmt chunk can describe.
    pub(crate) fn is_standard(self) -> bool {
        matches!(
            self,
            BitDepth::Pcm(8 | 16 | 24 | 32) | BitDepth::Float32 | BitDepth::Float64
        )
    }

    /// The WAVE audio format code for this depth.
    pub fn audio_format(self) -> u16 {
        match self {
            BitDepth::Adpcm => 17,
            BitDepth::ALaw => 6,
            BitDepth::MuLaw => 7,
            BitDepth::Pcm(_) => 1,
            BitDepth::Float32 | BitDepth::Float64 => 3,
        }
    }

    /// The value type samples are packed as in the data chunk.
    pub(crate) fn sample_type(self) -> SampleType {
        match self {
            BitDepth::Adpcm | BitDepth::ALaw | BitDepth::MuLaw | BitDepth::Pcm(8) => {
                SampleType::Int { bits: 8, signed: false }
            }
            BitDepth::Pcm(bits) => SampleType::Int { bits, signed: true },
            BitDepth::Float32 => SampleType::Float { bits: 32 },
            BitDepth::Float64 => SampleType::Float { bits: 64 },
        }
    }
}

impl FromStr for BitDepth {
    type Err = Error;

    fn from_str(code: &str) -> Result<Self> {
        match code {
            "4" => Ok(BitDepth::Adpcm),
            "8a" => Ok(BitDepth::ALaw),
            "8m" => Ok(BitDepth::MuLaw),
            "32f" => Ok(BitDepth::Float32),
            "64" => Ok(BitDepth::Float64),
            _ => match code.parse::<u8>() {
                Ok(bits) if (8..=53).contains(&bits) => Ok(BitDepth::Pcm(bits)),
                _ => Err(Error::validation(format!("Invalid bit depth code {:?}", code))),
            },
        }
    }
}

impl fmt::Display for BitDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitDepth::Adpcm => write!(f, "4"),
            BitDepth::ALaw => write!(f, "8a"),
            BitDepth::MuLaw => write!(f, "8m"),
            BitDepth::Pcm(bits) => write!(f, "{}", bits),
            BitDepth::Float32 => write!(f, "32f"),
            BitDepth::Float64 => write!(f, "64"),
        }
    }
}

/// `fmt ` chunk: audio encoding parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FmtChunk {
    /// Declared chunk size; gates which extension fields exist on disk
    pub chunk_size: u32,
    pub audio_format: u16,
    pub num_channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    /// Extension byte count (chunk size > 16)
    pub cb_size: u16,
    /// Real sample width for extensible formats (chunk size > 18)
    pub valid_bits_per_sample: u16,
    /// Speaker position mask (chunk size > 20)
    pub channel_mask: u32,
    /// Sub-format GUID as four little-endian u32 words (chunk size > 24)
    pub sub_format: [u32; 4],
}

/// `fact` chunk: per-channel sample length for compressed formats
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactChunk {
    pub dw_sample_length: u32,
}

/// One `cue ` chunk marker
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CuePoint {
    pub dw_name: u32,
    pub dw_position: u32,
    pub fcc_chunk: [u8; 4],
    pub dw_chunk_start: u32,
    pub dw_block_start: u32,
    pub dw_sample_offset: u32,
}

/// `cue ` chunk: ordered cue point list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CueChunk {
    pub points: Vec<CuePoint>,
}

/// One `smpl` chunk loop descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleLoop {
    pub dw_name: u32,
    pub dw_type: u32,
    pub dw_start: u32,
    pub dw_end: u32,
    pub dw_fraction: u32,
    pub dw_play_count: u32,
}

/// `smpl` chunk: sampler metadata plus loop points
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SmplChunk {
    pub dw_manufacturer: u32,
    pub dw_product: u32,
    pub dw_sample_period: u32,
    pub dw_midi_unity_note: u32,
    pub dw_midi_pitch_fraction: u32,
    pub dw_smpte_format: u32,
    pub dw_smpte_offset: u32,
    pub dw_sampler_data: u32,
    pub loops: Vec<SampleLoop>,
}

/// `bext` chunk: Broadcast Wave Format metadata (EBU extension)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BextChunk {
    /// Free description, 256 bytes on disk
    pub description: String,
    /// Originator name, 32 bytes
    pub originator: String,
    /// Originator reference, 32 bytes
    pub originator_reference: String,
    /// yyyy-mm-dd, 10 bytes
    pub origination_date: String,
    /// hh:mm:ss, 8 bytes
    pub origination_time: String,
    /// First-sample timecode as (low, high) u32 pair
    pub time_reference: [u32; 2],
    pub version: u16,
    /// SMPTE UMID, 64 bytes
    pub umid: Vec<u8>,
    pub loudness_value: u16,
    pub loudness_range: u16,
    pub max_true_peak_level: u16,
    pub max_momentary_loudness: u16,
    pub max_short_term_loudness: u16,
    /// Reserved area, 180 bytes
    pub reserved: Vec<u8>,
    /// Variable-length coding history text
    pub coding_history: String,
}

impl Default for BextChunk {
    fn default() -> Self {
        BextChunk {
            description: String::new(),
            originator: String::new(),
            originator_reference: String::new(),
            origination_date: String::new(),
            origination_time: String::new(),
            time_reference: [0, 0],
            version: 0,
            umid: vec![0; 64],
            loudness_value: 0,
            loudness_range: 0,
            max_true_peak_level: 0,
            max_momentary_loudness: 0,
            max_short_term_loudness: 0,
            reserved: vec![0; 180],
            coding_history: String::new(),
        }
    }
}

impl BextChunk {
    /// True when every field still has its default value, in which case
    /// the chunk is skipped at serialization time.
    pub fn is_empty(&self) -> bool {
        self.description.is_empty()
            && self.originator.is_empty()
            && self.originator_reference.is_empty()
            && self.origination_date.is_empty()
            && self.origination_time.is_empty()
            && self.time_reference == [0, 0]
            && self.version == 0
            && self.umid.iter().all(|&byte| byte == 0)
            && self.loudness_value == 0
            && self.loudness_range == 0
            && self.max_true_peak_level == 0
            && self.max_momentary_loudness == 0
            && self.max_short_term_loudness == 0
            && self.coding_history.is_empty()
    }
}

/// `ds64` chunk: 64-bit size extension for RF64
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ds64Chunk {
    pub riff_size_high: u32,
    pub riff_size_low: u32,
    pub data_size_high: u32,
    pub data_size_low: u32,
    pub origination_time: u32,
    pub sample_count_high: u32,
    pub sample_count_low: u32,
    /// Raw trailing chunk-size table, carried through unparsed
    pub table: Vec<u8>,
}

/// Free-text chunk payload (`iXML`, `_PMX`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextChunk {
    pub value: String,
}

/// `junk` chunk: opaque filler bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JunkChunk {
    /// On-disk chunk id; both the `junk` and `JUNK` spellings occur and
    /// the parsed spelling is kept for re-serialization
    pub id: [u8; 4],
    pub data: Vec<u8>,
}

impl Default for JunkChunk {
    fn default() -> Self {
        JunkChunk {
            id: *b"junk",
            data: Vec::new(),
        }
    }
}

/// LIST chunk format tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    /// Free-text tags (`INFO`)
    Info,
    /// Cue-point annotations (`adtl`)
    Adtl,
    /// Anything else, carried through verbatim
    Other([u8; 4]),
}

impl ListFormat {
    pub fn from_tag(tag: [u8; 4]) -> Self {
        match &tag {
            b"INFO" => ListFormat::Info,
            b"adtl" => ListFormat::Adtl,
            _ => ListFormat::Other(tag),
        }
    }

    pub fn tag(self) -> [u8; 4] {
        match self {
            ListFormat::Info => *b"INFO",
            ListFormat::Adtl => *b"adtl",
            ListFormat::Other(tag) => tag,
        }
    }
}

/// One sub-chunk of a LIST chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListItem {
    /// INFO tag: 4-character tag id plus text value
    Info { tag: String, text: String },
    /// adtl `labl`: cue point label
    Label { cue_id: u32, text: String },
    /// adtl `note`: cue point note
    Note { cue_id: u32, text: String },
    /// adtl `ltxt`: cue region annotation
    LabeledText {
        cue_id: u32,
        dw_sample_length: u32,
        dw_purpose_id: u32,
        dw_country: u16,
        dw_language: u16,
        dw_dialect: u16,
        dw_code_page: u16,
        text: String,
    },
    /// Unknown sub-chunk, carried through verbatim
    Raw { id: [u8; 4], data: Vec<u8> },
}

/// A `LIST` chunk with its format tag and sub-chunks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListChunk {
    pub format: ListFormat,
    pub items: Vec<ListItem>,
}
