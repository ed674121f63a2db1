//! Binary value packing and unpacking
//!
//! This module implements the bit-exact value codec used for WAVE sample
//! payloads: signed and unsigned integers at any width from 1 to 53 bits
//! and IEEE floats of 16, 32 and 64 bits, in either byte order.
//!
//! Values narrower than a byte, or not a multiple of 8 bits, occupy the
//! next byte boundary on disk. Unused high bits are zeroed on write and
//! sign-extended on read for signed types.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};
use crate::util::half;

/// Numeric type descriptor for packed sample values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    /// Two's-complement (or unsigned) integer, 1 to 53 bits wide
    Int { bits: u8, signed: bool },
    /// IEEE float, 16, 32 or 64 bits wide
    Float { bits: u8 },
}

/// Packer/unpacker for one numeric type at a fixed byte order.
///
/// All multi-byte values are packed little-endian first; big-endian output
/// reverses the per-value byte window, matching RIFX convention.
#[derive(Debug, Clone)]
pub struct ValueCodec {
    bits: u8,
    signed: bool,
    float: bool,
    be: bool,
    bytes: usize,
    min: f64,
    max: f64,
}

impl ValueCodec {
    /// Create a codec for the given type and byte order.
    pub fn new(ty: SampleType, big_endian: bool) -> Result<Self> {
        let (bits, signed, float) = match ty {
            SampleType::Int { bits, signed } => {
                if !(1..=53).contains(&bits) {
                    return Err(Error::validation(format!(
                        "Integer bit width must be 1-53, got {}",
                        bits
                    )));
                }
                (bits, signed, false)
            }
            SampleType::Float { bits } => {
                if !matches!(bits, 16 | 32 | 64) {
                    return Err(Error::validation(format!(
                        "Float bit width must be 16, 32 or 64, got {}",
                        bits
                    )));
                }
                (bits, true, true)
            }
        };

        let (min, max) = if float {
            (f64::MIN, f64::MAX)
        } else if signed {
            (-(2f64.powi(i32::from(bits) - 1)), 2f64.powi(i32::from(bits) - 1) - 1.0)
        } else {
            (0.0, 2f64.powi(i32::from(bits)) - 1.0)
        };

        Ok(ValueCodec {
            bits,
            signed,
            float,
            be: big_endian,
            bytes: (usize::from(bits) + 7) / 8,
            min,
            max,
        })
    }

    /// Storage width of one value in bytes
    pub fn bytes_per_value(&self) -> usize {
        self.bytes
    }

    /// Smallest value representable at this width
    pub fn min_value(&self) -> f64 {
        self.min
    }

    /// Largest value representable at this width
    pub fn max_value(&self) -> f64 {
        self.max
    }

    fn decode(&self, window: &[u8]) -> f64 {
        let mut tmp = [0u8; 8];
        tmp[..self.bytes].copy_from_slice(window);
        if self.be {
            tmp[..self.bytes].reverse();
        }
        if self.float {
            return match self.bits {
                16 => half::unpack(LittleEndian::read_u16(&tmp)),
                32 => f64::from(f32::from_bits(LittleEndian::read_u32(&tmp))),
                _ => f64::from_bits(LittleEndian::read_u64(&tmp)),
            };
        }
        let raw = LittleEndian::read_u64(&tmp) & ((1u64 << self.bits) - 1);
        if self.signed && (raw >> (self.bits - 1)) & 1 == 1 {
            (raw as i64 - (1i64 << self.bits)) as f64
        } else {
            raw as f64
        }
    }

    fn encode(&self, value: f64, out: &mut [u8; 8]) -> Result<()> {
        if self.float {
            match self.bits {
                16 => LittleEndian::write_u16(out, half::pack(value)),
                32 => LittleEndian::write_u32(out, (value as f32).to_bits()),
                _ => LittleEndian::write_u64(out, value.to_bits()),
            }
        } else {
            // Strict range check; clamping belongs to the bit-depth
            // converter, not this layer. NaN also lands here.
            if !(value >= self.min && value <= self.max) {
                return Err(Error::Overflow {
                    value,
                    bits: self.bits,
                });
            }
            let raw = (value.trunc() as i64 as u64) & ((1u64 << self.bits) - 1);
            LittleEndian::write_u64(out, raw);
        }
        if self.be {
            out[..self.bytes].reverse();
        }
        Ok(())
    }

    /// Read one value at a byte offset.
    pub fn read_at(&self, buf: &[u8], offset: usize) -> Result<f64> {
        let end = offset
            .checked_add(self.bytes)
            .filter(|&end| end <= buf.len())
            .ok_or_else(|| {
                Error::format(format!(
                    "Unexpected end of buffer reading {} bytes at offset {}",
                    self.bytes, offset
                ))
            })?;
        Ok(self.decode(&buf[offset..end]))
    }

    /// Write one value in place at a byte offset.
    pub fn write_at(&self, buf: &mut [u8], offset: usize, value: f64) -> Result<()> {
        let end = offset
            .checked_add(self.bytes)
            .filter(|&end| end <= buf.len())
            .ok_or_else(|| {
                Error::format(format!(
                    "Unexpected end of buffer writing {} bytes at offset {}",
                    self.bytes, offset
                ))
            })?;
        let mut tmp = [0u8; 8];
        self.encode(value, &mut tmp)?;
        buf[offset..end].copy_from_slice(&tmp[..self.bytes]);
        Ok(())
    }

    /// Append one value to an output buffer.
    pub fn write_to(&self, out: &mut Vec<u8>, value: f64) -> Result<()> {
        let mut tmp = [0u8; 8];
        self.encode(value, &mut tmp)?;
        out.extend_from_slice(&tmp[..self.bytes]);
        Ok(())
    }

    /// Pack a contiguous run of values.
    pub fn pack_all(&self, values: &[f64]) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(values.len() * self.bytes);
        for &value in values {
            self.write_to(&mut out, value)?;
        }
        Ok(out)
    }

    /// Unpack every whole value in a buffer.
    ///
    /// A trailing partial element (buffer length not a multiple of the
    /// value width) is silently dropped. This truncation is intentional.
    pub fn unpack_all(&self, buf: &[u8]) -> Vec<f64> {
        buf.chunks_exact(self.bytes)
            .map(|window| self.decode(window))
            .collect()
    }
}
