//! WAVE chunk parsing
//!
//! Turns the generic RIFF chunk index into typed chunk structures on a
//! [`WaveFile`]. Integer fields honor the container byte order; text
//! fields are fixed-width or null-terminated byte runs decoded as lossy
//! UTF-8.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use super::chunks::{
    BextChunk, BitDepth, CueChunk, CuePoint, Ds64Chunk, FactChunk, FmtChunk, JunkChunk,
    ListChunk, ListFormat, ListItem, SampleLoop, SmplChunk, TextChunk,
};
use super::WaveFile;
use crate::error::{Error, Result};
use crate::format::riff::{fourcc, ChunkNode, Container, RiffIndex};

/// Cursor over one chunk payload
struct FieldReader<'a> {
    buf: &'a [u8],
    pos: usize,
    be: bool,
}

impl<'a> FieldReader<'a> {
    fn new(buf: &'a [u8], be: bool) -> Self {
        FieldReader { buf, pos: 0, be }
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::format("Chunk payload is truncated"));
        }
        let window = &self.buf[self.pos..self.pos + count];
        self.pos += count;
        Ok(window)
    }

    fn u16(&mut self) -> Result<u16> {
        let window = self.bytes(2)?;
        Ok(if self.be {
            BigEndian::read_u16(window)
        } else {
            LittleEndian::read_u16(window)
        })
    }

    fn u32(&mut self) -> Result<u32> {
        let window = self.bytes(4)?;
        Ok(if self.be {
            BigEndian::read_u32(window)
        } else {
            LittleEndian::read_u32(window)
        })
    }

    fn fourcc(&mut self) -> Result<[u8; 4]> {
        let window = self.bytes(4)?;
        let mut id = [0u8; 4];
        id.copy_from_slice(window);
        Ok(id)
    }

    /// Fixed-width text field, trailing NULs stripped.
    fn text(&mut self, width: usize) -> Result<String> {
        let window = self.bytes(width)?;
        Ok(trim_text(window))
    }

    /// Everything left in the payload as text.
    fn rest_text(&mut self) -> String {
        let window = &self.buf[self.pos..];
        self.pos = self.buf.len();
        trim_text(window)
    }
}

fn trim_text(window: &[u8]) -> String {
    let end = window
        .iter()
        .position(|&byte| byte == 0)
        .unwrap_or(window.len());
    String::from_utf8_lossy(&window[..end]).into_owned()
}

fn leaf_payload<'a>(buf: &'a [u8], node: &ChunkNode) -> &'a [u8] {
    match node {
        ChunkNode::Leaf { range, .. } => &buf[range.clone()],
        ChunkNode::List { .. } => &[],
    }
}

impl WaveFile {
    /// Parse a complete WAVE file from a byte buffer.
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        let index = RiffIndex::parse(buf)?;
        let be = index.container.is_big_endian();
        let mut wav = WaveFile {
            container: index.container,
            ..WaveFile::default()
        };
        // A zero-length data chunk is valid, so presence is tracked
        // separately from the payload.
        let mut saw_data = false;

        for node in &index.chunks {
            let payload = leaf_payload(buf, node);
            match &node.id() {
                b"fmt " => {
                    wav.fmt = Some(parse_fmt(payload, node.size(), be)?);
                }
                b"fact" => {
                    let mut fields = FieldReader::new(payload, be);
                    wav.fact = Some(FactChunk {
                        dw_sample_length: fields.u32()?,
                    });
                }
                b"data" => {
                    saw_data = true;
                    wav.data = payload.to_vec();
                }
                b"cue " => {
                    wav.cue = Some(parse_cue(payload, be)?);
                }
                b"smpl" => {
                    wav.smpl = Some(parse_smpl(payload, be)?);
                }
                b"bext" => {
                    wav.bext = Some(parse_bext(payload, be)?);
                }
                b"ds64" => {
                    wav.ds64 = Some(parse_ds64(payload, be)?);
                }
                b"iXML" => {
                    wav.ixml = Some(TextChunk {
                        value: trim_text(payload),
                    });
                }
                b"_PMX" => {
                    wav.pmx = Some(TextChunk {
                        value: trim_text(payload),
                    });
                }
                b"junk" | b"JUNK" => {
                    wav.junk = Some(JunkChunk {
                        id: node.id(),
                        data: payload.to_vec(),
                    });
                }
                b"LIST" => {
                    if let ChunkNode::List {
                        format, children, ..
                    } = node
                    {
                        wav.lists.push(parse_list(buf, *format, children, be)?);
                    }
                }
                other => {
                    tracing::debug!(id = %fourcc(*other), size = node.size(), "skipping chunk");
                }
            }
        }

        if wav.fmt.is_none() {
            return Err(Error::format("File has no fmt chunk"));
        }
        if !saw_data {
            return Err(Error::format("File has no data chunk"));
        }
        if wav.container == Container::Rf64 && wav.ds64.is_none() {
            return Err(Error::format("RF64 file has no ds64 chunk"));
        }

        // An RF64 data chunk declares 0xFFFFFFFF and carries its real
        // size in ds64; trim the clamped payload down to it.
        if let (Some(node), Some(ds64)) = (index.find(b"data"), &wav.ds64) {
            if node.size() == u32::MAX {
                let real = ds64.data_size_low as usize;
                if real < wav.data.len() {
                    wav.data.truncate(real);
                }
            }
        }

        wav.bit_depth = detect_bit_depth(wav.fmt_ref()?)?;
        tracing::debug!(
            bit_depth = %wav.bit_depth,
            data_len = wav.data.len(),
            lists = wav.lists.len(),
            "parsed WAVE file"
        );
        Ok(wav)
    }
}

/// Map the fmt chunk onto a bit-depth code.
fn detect_bit_depth(fmt: &FmtChunk) -> Result<BitDepth> {
    let (audio_format, bits) = if fmt.audio_format == super::builder::WAVE_FORMAT_EXTENSIBLE {
        let bits = if fmt.valid_bits_per_sample > 0 {
            fmt.valid_bits_per_sample
        } else {
            fmt.bits_per_sample
        };
        ((fmt.sub_format[0] & 0xffff) as u16, bits)
    } else {
        (fmt.audio_format, fmt.bits_per_sample)
    };

    match audio_format {
        17 => Ok(BitDepth::Adpcm),
        6 => Ok(BitDepth::ALaw),
        7 => Ok(BitDepth::MuLaw),
        3 if bits == 64 => Ok(BitDepth::Float64),
        3 => Ok(BitDepth::Float32),
        1 | 0xfffe => match bits {
            8..=53 => Ok(BitDepth::Pcm(bits as u8)),
            _ => Err(Error::unsupported(format!(
                "Unsupported PCM sample width {}",
                bits
            ))),
        },
        other => Err(Error::unsupported(format!(
            "Unsupported audio format code {}",
            other
        ))),
    }
}

fn parse_fmt(payload: &[u8], chunk_size: u32, be: bool) -> Result<FmtChunk> {
    let mut fields = FieldReader::new(payload, be);
    let mut fmt = FmtChunk {
        chunk_size,
        audio_format: fields.u16()?,
        num_channels: fields.u16()?,
        sample_rate: fields.u32()?,
        byte_rate: fields.u32()?,
        block_align: fields.u16()?,
        bits_per_sample: fields.u16()?,
        ..FmtChunk::default()
    };
    if chunk_size > 16 {
        fmt.cb_size = fields.u16()?;
    }
    if chunk_size > 18 {
        fmt.valid_bits_per_sample = fields.u16()?;
    }
    if chunk_size > 20 {
        fmt.channel_mask = fields.u32()?;
    }
    if chunk_size > 24 {
        for word in fmt.sub_format.iter_mut() {
            *word = fields.u32()?;
        }
    }
    Ok(fmt)
}

fn parse_cue(payload: &[u8], be: bool) -> Result<CueChunk> {
    let mut fields = FieldReader::new(payload, be);
    let count = fields.u32()?;
    let mut points = Vec::with_capacity(count.min(1 << 16) as usize);
    for _ in 0..count {
        points.push(CuePoint {
            dw_name: fields.u32()?,
            dw_position: fields.u32()?,
            fcc_chunk: fields.fourcc()?,
            dw_chunk_start: fields.u32()?,
            dw_block_start: fields.u32()?,
            dw_sample_offset: fields.u32()?,
        });
    }
    Ok(CueChunk { points })
}

fn parse_smpl(payload: &[u8], be: bool) -> Result<SmplChunk> {
    let mut fields = FieldReader::new(payload, be);
    let mut smpl = SmplChunk {
        dw_manufacturer: fields.u32()?,
        dw_product: fields.u32()?,
        dw_sample_period: fields.u32()?,
        dw_midi_unity_note: fields.u32()?,
        dw_midi_pitch_fraction: fields.u32()?,
        dw_smpte_format: fields.u32()?,
        dw_smpte_offset: fields.u32()?,
        ..SmplChunk::default()
    };
    let num_loops = fields.u32()?;
    smpl.dw_sampler_data = fields.u32()?;
    for _ in 0..num_loops {
        smpl.loops.push(SampleLoop {
            dw_name: fields.u32()?,
            dw_type: fields.u32()?,
            dw_start: fields.u32()?,
            dw_end: fields.u32()?,
            dw_fraction: fields.u32()?,
            dw_play_count: fields.u32()?,
        });
    }
    Ok(smpl)
}

fn parse_bext(payload: &[u8], be: bool) -> Result<BextChunk> {
    let mut fields = FieldReader::new(payload, be);
    let mut bext = BextChunk {
        description: fields.text(256)?,
        originator: fields.text(32)?,
        originator_reference: fields.text(32)?,
        origination_date: fields.text(10)?,
        origination_time: fields.text(8)?,
        ..BextChunk::default()
    };
    bext.time_reference = [fields.u32()?, fields.u32()?];
    bext.version = fields.u16()?;
    bext.umid = fields.bytes(64)?.to_vec();
    bext.loudness_value = fields.u16()?;
    bext.loudness_range = fields.u16()?;
    bext.max_true_peak_level = fields.u16()?;
    bext.max_momentary_loudness = fields.u16()?;
    bext.max_short_term_loudness = fields.u16()?;
    bext.reserved = fields.bytes(180)?.to_vec();
    bext.coding_history = fields.rest_text();
    Ok(bext)
}

fn parse_ds64(payload: &[u8], be: bool) -> Result<Ds64Chunk> {
    let mut fields = FieldReader::new(payload, be);
    let chunk = Ds64Chunk {
        riff_size_low: fields.u32()?,
        riff_size_high: fields.u32()?,
        data_size_low: fields.u32()?,
        data_size_high: fields.u32()?,
        origination_time: fields.u32()?,
        sample_count_low: fields.u32()?,
        sample_count_high: fields.u32()?,
        table: payload[fields.pos..].to_vec(),
    };
    Ok(chunk)
}

fn parse_list(
    buf: &[u8],
    format_tag: [u8; 4],
    children: &[ChunkNode],
    be: bool,
) -> Result<ListChunk> {
    let format = ListFormat::from_tag(format_tag);
    let mut items = Vec::with_capacity(children.len());
    for child in children {
        let payload = leaf_payload(buf, child);
        let item = match (format, &child.id()) {
            (ListFormat::Info, id) => ListItem::Info {
                tag: String::from_utf8_lossy(id).into_owned(),
                text: trim_text(payload),
            },
            (ListFormat::Adtl, b"labl") => {
                let mut fields = FieldReader::new(payload, be);
                ListItem::Label {
                    cue_id: fields.u32()?,
                    text: fields.rest_text(),
                }
            }
            (ListFormat::Adtl, b"note") => {
                let mut fields = FieldReader::new(payload, be);
                ListItem::Note {
                    cue_id: fields.u32()?,
                    text: fields.rest_text(),
                }
            }
            (ListFormat::Adtl, b"ltxt") => {
                let mut fields = FieldReader::new(payload, be);
                ListItem::LabeledText {
                    cue_id: fields.u32()?,
                    dw_sample_length: fields.u32()?,
                    dw_purpose_id: fields.u32()?,
                    dw_country: fields.u16()?,
                    dw_language: fields.u16()?,
                    dw_dialect: fields.u16()?,
                    dw_code_page: fields.u16()?,
                    text: fields.rest_text(),
                }
            }
            (_, id) => ListItem::Raw {
                id: *id,
                data: payload.to_vec(),
            },
        };
        items.push(item);
    }
    Ok(ListChunk { format, items })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: &[u8; 4], payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(id);
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(payload);
        if payload.len() % 2 == 1 {
            out.push(0);
        }
        out
    }

    fn riff(chunks: &[Vec<u8>]) -> Vec<u8> {
        let body: Vec<u8> = chunks.concat();
        let mut out = Vec::new();
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&((body.len() + 4) as u32).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(&body);
        out
    }

    fn fmt_payload(audio_format: u16, channels: u16, rate: u32, bits: u16) -> Vec<u8> {
        let block_align = channels * bits.div_ceil(8);
        let mut out = Vec::new();
        out.extend_from_slice(&audio_format.to_le_bytes());
        out.extend_from_slice(&channels.to_le_bytes());
        out.extend_from_slice(&rate.to_le_bytes());
        out.extend_from_slice(&(rate * u32::from(block_align)).to_le_bytes());
        out.extend_from_slice(&block_align.to_le_bytes());
        out.extend_from_slice(&bits.to_le_bytes());
        out
    }

    #[test]
    fn test_parses_minimal_pcm_file() {
        let buf = riff(&[
            chunk(b"fmt ", &fmt_payload(1, 1, 8000, 16)),
            chunk(b"data", &[0x01, 0x00, 0xff, 0x7f]),
        ]);
        let wav = WaveFile::from_bytes(&buf).unwrap();
        assert_eq!(wav.bit_depth, BitDepth::Pcm(16));
        let fmt = wav.fmt.as_ref().unwrap();
        assert_eq!(fmt.chunk_size, 16);
        assert_eq!(fmt.sample_rate, 8000);
        assert_eq!(wav.samples_f64().unwrap(), vec![1.0, 32767.0]);
    }

    #[test]
    fn test_missing_fmt_is_an_error() {
        let buf = riff(&[chunk(b"data", &[0, 0])]);
        assert!(WaveFile::from_bytes(&buf).is_err());
    }

    #[test]
    fn test_missing_data_is_an_error() {
        let buf = riff(&[chunk(b"fmt ", &fmt_payload(1, 1, 8000, 16))]);
        assert!(matches!(WaveFile::from_bytes(&buf), Err(Error::Format(_))));
        // An empty data chunk still counts as present
        let buf = riff(&[chunk(b"fmt ", &fmt_payload(1, 1, 8000, 16)), chunk(b"data", &[])]);
        let wav = WaveFile::from_bytes(&buf).unwrap();
        assert_eq!(wav.sample_count(), 0);
    }

    #[test]
    fn test_detects_companded_formats() {
        for (code, expected) in [(6u16, BitDepth::ALaw), (7, BitDepth::MuLaw)] {
            let buf = riff(&[
                chunk(b"fmt ", &fmt_payload(code, 1, 8000, 8)),
                chunk(b"data", &[0x55, 0xd5]),
            ]);
            let wav = WaveFile::from_bytes(&buf).unwrap();
            assert_eq!(wav.bit_depth, expected);
        }
    }

    #[test]
    fn test_detects_float_and_extensible() {
        let buf = riff(&[
            chunk(b"fmt ", &fmt_payload(3, 1, 8000, 32)),
            chunk(b"data", &1.0f32.to_le_bytes().to_vec()),
        ]);
        assert_eq!(WaveFile::from_bytes(&buf).unwrap().bit_depth, BitDepth::Float32);

        let mut ext = fmt_payload(0xfffe, 1, 8000, 16);
        ext.extend_from_slice(&22u16.to_le_bytes());
        ext.extend_from_slice(&11u16.to_le_bytes());
        ext.extend_from_slice(&0x4u32.to_le_bytes());
        for word in [1u32, 0x0010_0000, 0xAA00_0080, 0x719B_3800] {
            ext.extend_from_slice(&word.to_le_bytes());
        }
        let buf = riff(&[chunk(b"fmt ", &ext), chunk(b"data", &[0, 0])]);
        let wav = WaveFile::from_bytes(&buf).unwrap();
        assert_eq!(wav.bit_depth, BitDepth::Pcm(11));
        assert_eq!(wav.fmt.as_ref().unwrap().channel_mask, 0x4);
    }

    #[test]
    fn test_unknown_format_code_is_unsupported() {
        let buf = riff(&[
            chunk(b"fmt ", &fmt_payload(2, 1, 8000, 4)),
            chunk(b"data", &[0; 4]),
        ]);
        assert!(matches!(
            WaveFile::from_bytes(&buf),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn test_parses_cue_and_adtl_labels() {
        let mut cue = Vec::new();
        cue.extend_from_slice(&1u32.to_le_bytes());
        cue.extend_from_slice(&1u32.to_le_bytes()); // dw_name
        cue.extend_from_slice(&8000u32.to_le_bytes()); // dw_position
        cue.extend_from_slice(b"data");
        cue.extend_from_slice(&[0; 12]); // chunk/block start, sample offset

        let mut labl = 1u32.to_le_bytes().to_vec();
        labl.extend_from_slice(b"intro\0");
        let mut adtl = b"adtl".to_vec();
        adtl.extend_from_slice(&chunk(b"labl", &labl));

        let buf = riff(&[
            chunk(b"fmt ", &fmt_payload(1, 1, 8000, 16)),
            chunk(b"data", &[0, 0]),
            chunk(b"cue ", &cue),
            chunk(b"LIST", &adtl),
        ]);
        let wav = WaveFile::from_bytes(&buf).unwrap();
        let points = &wav.cue.as_ref().unwrap().points;
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].dw_name, 1);
        assert_eq!(points[0].fcc_chunk, *b"data");
        assert_eq!(points[0].dw_sample_offset, 0);
        assert_eq!(
            wav.lists[0].items[0],
            ListItem::Label {
                cue_id: 1,
                text: "intro".to_string()
            }
        );
    }

    #[test]
    fn test_parses_info_list() {
        let mut info = b"INFO".to_vec();
        info.extend_from_slice(&chunk(b"IART", b"someone\0"));
        info.extend_from_slice(&chunk(b"ICMT", b"a comment\0"));
        let buf = riff(&[
            chunk(b"fmt ", &fmt_payload(1, 1, 8000, 16)),
            chunk(b"data", &[0, 0]),
            chunk(b"LIST", &info),
        ]);
        let wav = WaveFile::from_bytes(&buf).unwrap();
        assert_eq!(wav.lists.len(), 1);
        assert_eq!(wav.lists[0].format, ListFormat::Info);
        assert_eq!(
            wav.lists[0].items[0],
            ListItem::Info {
                tag: "IART".to_string(),
                text: "someone".to_string()
            }
        );
    }

    #[test]
    fn test_rf64_requires_ds64() {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"RF64");
        buf.extend_from_slice(&u32::MAX.to_le_bytes());
        buf.extend_from_slice(b"WAVE");
        buf.extend_from_slice(&chunk(b"fmt ", &fmt_payload(1, 1, 8000, 16)));
        buf.extend_from_slice(&chunk(b"data", &[0, 0]));
        assert!(WaveFile::from_bytes(&buf).is_err());
    }

    #[test]
    fn test_junk_is_kept() {
        let buf = riff(&[
            chunk(b"JUNK", &[1, 2, 3]),
            chunk(b"fmt ", &fmt_payload(1, 1, 8000, 16)),
            chunk(b"data", &[0, 0]),
        ]);
        let wav = WaveFile::from_bytes(&buf).unwrap();
        let junk = wav.junk.as_ref().unwrap();
        assert_eq!(junk.id, *b"JUNK");
        assert_eq!(junk.data, vec![1, 2, 3]);
    }

    #[test]
    fn test_smpl_loops() {
        let mut smpl = Vec::new();
        for word in [0u32, 0, 125000, 60, 0, 0, 0] {
            smpl.extend_from_slice(&word.to_le_bytes());
        }
        smpl.extend_from_slice(&1u32.to_le_bytes()); // loop count
        smpl.extend_from_slice(&0u32.to_le_bytes()); // sampler data
        for word in [13u32, 0, 100, 200, 0, 0] {
            smpl.extend_from_slice(&word.to_le_bytes());
        }
        let buf = riff(&[
            chunk(b"fmt ", &fmt_payload(1, 1, 8000, 16)),
            chunk(b"data", &[0, 0]),
            chunk(b"smpl", &smpl),
        ]);
        let wav = WaveFile::from_bytes(&buf).unwrap();
        let smpl = wav.smpl.as_ref().unwrap();
        assert_eq!(smpl.dw_sample_period, 125000);
        assert_eq!(smpl.loops.len(), 1);
        assert_eq!(smpl.loops[0].dw_start, 100);
        assert_eq!(smpl.loops[0].dw_end, 200);
    }
}
