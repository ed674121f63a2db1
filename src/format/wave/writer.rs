//! WAVE serialization
//!
//! Emits the chunks of a [`WaveFile`] in canonical order: junk, ds64
//! (RF64 only), bext, iXML, fmt, fact, data, cue, smpl, LIST chunks and
//! _PMX. Every chunk is even-aligned with the declared size holding the
//! unpadded payload length. The RF64 container header declares the
//! 0xFFFFFFFF sentinel and carries its real sizes in ds64.

use byteorder::{ByteOrder, LittleEndian};

use super::builder::validate_block_limits;
use super::chunks::{BextChunk, CueChunk, Ds64Chunk, FmtChunk, ListChunk, ListItem, SmplChunk};
use super::WaveFile;
use crate::error::Result;
use crate::format::riff::{ChunkWriter, Container, WAVE_MAGIC};

impl WaveFile {
    /// Serialize to a complete RIFF/RIFX/RF64 byte buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let fmt = self.fmt_ref()?;
        validate_block_limits(fmt.num_channels, fmt.sample_rate, self.bit_depth)?;
        let be = self.container.is_big_endian();
        let mut body = ChunkWriter::new(be);

        if let Some(junk) = &self.junk {
            body.chunk(&junk.id, &junk.data);
        }
        let mut ds64_pos = None;
        if self.container == Container::Rf64 {
            ds64_pos = Some(body.len());
            let ds64 = self.filled_ds64();
            body.chunk(b"ds64", &ds64_payload(&ds64, be));
        }
        if let Some(bext) = &self.bext {
            if !bext.is_empty() {
                body.chunk(b"bext", &bext_payload(bext, be));
            }
        }
        if let Some(ixml) = &self.ixml {
            body.chunk(b"iXML", ixml.value.as_bytes());
        }
        body.chunk(b"fmt ", &fmt_payload(fmt, be));
        if let Some(fact) = &self.fact {
            let mut payload = ChunkWriter::new(be);
            payload.u32(fact.dw_sample_length);
            body.chunk(b"fact", &payload.into_bytes());
        }
        body.chunk(b"data", &self.data);
        if let Some(cue) = &self.cue {
            body.chunk(b"cue ", &cue_payload(cue, be));
        }
        if let Some(smpl) = &self.smpl {
            body.chunk(b"smpl", &smpl_payload(smpl, be));
        }
        for list in &self.lists {
            body.chunk(b"LIST", &list_payload(list, be));
        }
        if let Some(pmx) = &self.pmx {
            body.chunk(b"_PMX", pmx.value.as_bytes());
        }

        let mut body = body.into_bytes();
        // The full RIFF size is only known once the body is assembled
        if let Some(pos) = ds64_pos {
            let riff_size = (body.len() + 4) as u64;
            LittleEndian::write_u32(&mut body[pos + 8..pos + 12], riff_size as u32);
            LittleEndian::write_u32(&mut body[pos + 12..pos + 16], (riff_size >> 32) as u32);
        }

        let declared = if self.container == Container::Rf64 {
            u32::MAX
        } else {
            (body.len() + 4) as u32
        };
        let mut out = ChunkWriter::new(be);
        out.tag(self.container.tag());
        out.u32(declared);
        out.tag(WAVE_MAGIC);
        out.raw(&body);
        tracing::debug!(
            container = ?self.container,
            len = out.len(),
            "serialized WAVE file"
        );
        Ok(out.into_bytes())
    }

    /// The ds64 chunk with sizes derived from the current data, keeping
    /// any caller-set fields that are not size-related.
    fn filled_ds64(&self) -> Ds64Chunk {
        let mut ds64 = self.ds64.clone().unwrap_or_default();
        let data_size = self.data.len() as u64;
        ds64.data_size_low = data_size as u32;
        ds64.data_size_high = (data_size >> 32) as u32;
        let sample_count = self.sample_count() as u64;
        ds64.sample_count_low = sample_count as u32;
        ds64.sample_count_high = (sample_count >> 32) as u32;
        // riff_size is patched after the body is assembled
        ds64
    }
}

fn fmt_payload(fmt: &FmtChunk, be: bool) -> Vec<u8> {
    let mut out = ChunkWriter::new(be);
    out.u16(fmt.audio_format);
    out.u16(fmt.num_channels);
    out.u32(fmt.sample_rate);
    out.u32(fmt.byte_rate);
    out.u16(fmt.block_align);
    out.u16(fmt.bits_per_sample);
    if fmt.chunk_size > 16 {
        out.u16(fmt.cb_size);
    }
    if fmt.chunk_size > 18 {
        out.u16(fmt.valid_bits_per_sample);
    }
    if fmt.chunk_size > 20 {
        out.u32(fmt.channel_mask);
    }
    if fmt.chunk_size > 24 {
        for word in fmt.sub_format {
            out.u32(word);
        }
    }
    out.into_bytes()
}

fn ds64_payload(ds64: &Ds64Chunk, be: bool) -> Vec<u8> {
    let mut out = ChunkWriter::new(be);
    out.u32(ds64.riff_size_low);
    out.u32(ds64.riff_size_high);
    out.u32(ds64.data_size_low);
    out.u32(ds64.data_size_high);
    out.u32(ds64.origination_time);
    out.u32(ds64.sample_count_low);
    out.u32(ds64.sample_count_high);
    out.raw(&ds64.table);
    out.into_bytes()
}

fn bext_payload(bext: &BextChunk, be: bool) -> Vec<u8> {
    let mut out = ChunkWriter::new(be);
    out.fixed_text(&bext.description, 256);
    out.fixed_text(&bext.originator, 32);
    out.fixed_text(&bext.originator_reference, 32);
    out.fixed_text(&bext.origination_date, 10);
    out.fixed_text(&bext.origination_time, 8);
    out.u32(bext.time_reference[0]);
    out.u32(bext.time_reference[1]);
    out.u16(bext.version);
    fixed_bytes(&mut out, &bext.umid, 64);
    out.u16(bext.loudness_value);
    out.u16(bext.loudness_range);
    out.u16(bext.max_true_peak_level);
    out.u16(bext.max_momentary_loudness);
    out.u16(bext.max_short_term_loudness);
    fixed_bytes(&mut out, &bext.reserved, 180);
    out.raw(bext.coding_history.as_bytes());
    out.into_bytes()
}

fn fixed_bytes(out: &mut ChunkWriter, bytes: &[u8], width: usize) {
    let take = bytes.len().min(width);
    out.raw(&bytes[..take]);
    out.raw(&vec![0u8; width - take]);
}

fn cue_payload(cue: &CueChunk, be: bool) -> Vec<u8> {
    let mut out = ChunkWriter::new(be);
    out.u32(cue.points.len() as u32);
    for point in &cue.points {
        out.u32(point.dw_name);
        out.u32(point.dw_position);
        out.tag(&point.fcc_chunk);
        out.u32(point.dw_chunk_start);
        out.u32(point.dw_block_start);
        out.u32(point.dw_sample_offset);
    }
    out.into_bytes()
}

fn smpl_payload(smpl: &SmplChunk, be: bool) -> Vec<u8> {
    let mut out = ChunkWriter::new(be);
    out.u32(smpl.dw_manufacturer);
    out.u32(smpl.dw_product);
    out.u32(smpl.dw_sample_period);
    out.u32(smpl.dw_midi_unity_note);
    out.u32(smpl.dw_midi_pitch_fraction);
    out.u32(smpl.dw_smpte_format);
    out.u32(smpl.dw_smpte_offset);
    out.u32(smpl.loops.len() as u32);
    out.u32(smpl.dw_sampler_data);
    for sample_loop in &smpl.loops {
        out.u32(sample_loop.dw_name);
        out.u32(sample_loop.dw_type);
        out.u32(sample_loop.dw_start);
        out.u32(sample_loop.dw_end);
        out.u32(sample_loop.dw_fraction);
        out.u32(sample_loop.dw_play_count);
    }
    out.into_bytes()
}

fn list_payload(list: &ListChunk, be: bool) -> Vec<u8> {
    let mut out = ChunkWriter::new(be);
    out.tag(&list.format.tag());
    for item in &list.items {
        match item {
            ListItem::Info { tag, text } => {
                let mut id = [b' '; 4];
                for (slot, byte) in id.iter_mut().zip(tag.bytes()) {
                    *slot = byte;
                }
                out.chunk(&id, &terminated(text));
            }
            ListItem::Label { cue_id, text } => {
                let mut payload = ChunkWriter::new(be);
                payload.u32(*cue_id);
                payload.raw(&terminated(text));
                out.chunk(b"labl", &payload.into_bytes());
            }
            ListItem::Note { cue_id, text } => {
                let mut payload = ChunkWriter::new(be);
                payload.u32(*cue_id);
                payload.raw(&terminated(text));
                out.chunk(b"note", &payload.into_bytes());
            }
            ListItem::LabeledText {
                cue_id,
                dw_sample_length,
                dw_purpose_id,
                dw_country,
                dw_language,
                dw_dialect,
                dw_code_page,
                text,
            } => {
                let mut payload = ChunkWriter::new(be);
                payload.u32(*cue_id);
                payload.u32(*dw_sample_length);
                payload.u32(*dw_purpose_id);
                payload.u16(*dw_country);
                payload.u16(*dw_language);
                payload.u16(*dw_dialect);
                payload.u16(*dw_code_page);
                payload.raw(&terminated(text));
                out.chunk(b"ltxt", &payload.into_bytes());
            }
            ListItem::Raw { id, data } => {
                out.chunk(id, data);
            }
        }
    }
    out.into_bytes()
}

fn terminated(text: &str) -> Vec<u8> {
    let mut bytes = text.as_bytes().to_vec();
    bytes.push(0);
    bytes
}
