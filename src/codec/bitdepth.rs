//! Sample bit-depth conversion
//!
//! Rescales sample values between bit depths. Integer targets use the
//! two's-complement range of the depth and truncate toward zero; float
//! sources are clamped to `[-1.0, 1.0]` before conversion. 8-bit audio is
//! an offset (unsigned-with-bias) format, handled by shifting 128 out on
//! input and back in on output.
//!
//! Valid depth codes here are `"32f"`, `"64"` and integer strings in
//! `8..=53`. Companding/ADPCM codes never reach this converter; those
//! conversions decode to 16-bit PCM first.

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Depth {
    Int(u8),
    Float(u8),
}

impl Depth {
    fn parse(code: &str) -> Result<Self> {
        match code {
            "32f" => Ok(Depth::Float(32)),
            "64" => Ok(Depth::Float(64)),
            _ => match code.parse::<u8>() {
                Ok(bits) if (8..=53).contains(&bits) => Ok(Depth::Int(bits)),
                _ => Err(Error::validation(format!("Invalid bit depth code {:?}", code))),
            },
        }
    }

    fn is_float(self) -> bool {
        matches!(self, Depth::Float(_))
    }

    fn bits(self) -> u8 {
        match self {
            Depth::Int(bits) | Depth::Float(bits) => bits,
        }
    }
}

/// Convert samples in place from one depth code to another.
pub fn convert(samples: &mut [f64], original: &str, target: &str) -> Result<()> {
    let from = Depth::parse(original)?;
    let to = Depth::parse(target)?;

    // Positive and negative halves of the two's-complement ranges; the
    // mins are kept as positive magnitudes and applied as divisors or
    // multipliers on the non-positive half.
    let old_min = 2f64.powi(i32::from(from.bits()) - 1);
    let old_max = old_min - 1.0;
    let new_min = 2f64.powi(i32::from(to.bits()) - 1);
    let new_max = new_min - 1.0;

    if from == Depth::Int(8) {
        for sample in samples.iter_mut() {
            *sample -= 128.0;
        }
    }
    if from.is_float() {
        for sample in samples.iter_mut() {
            *sample = sample.clamp(-1.0, 1.0);
        }
    }

    if from != to {
        match (from.is_float(), to.is_float()) {
            (true, true) => {}
            (true, false) => {
                for sample in samples.iter_mut() {
                    *sample = if *sample > 0.0 {
                        (*sample * new_max).trunc()
                    } else {
                        (*sample * new_min).trunc()
                    };
                }
            }
            (false, true) => {
                for sample in samples.iter_mut() {
                    *sample = if *sample > 0.0 {
                        *sample / old_max
                    } else {
                        *sample / old_min
                    };
                }
            }
            (false, false) => {
                for sample in samples.iter_mut() {
                    *sample = if *sample > 0.0 {
                        (*sample / old_max * new_max).trunc()
                    } else {
                        (*sample / old_min * new_min).trunc()
                    };
                }
            }
        }
    }

    if to == Depth::Int(8) {
        for sample in samples.iter_mut() {
            *sample += 128.0;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_codes_rejected() {
        let mut samples = [0.0];
        assert!(convert(&mut samples, "1", "16").is_err());
        assert!(convert(&mut samples, "16", "54").is_err());
        assert!(convert(&mut samples, "16f", "16").is_err());
        assert!(convert(&mut samples, "4", "16").is_err());
        assert!(convert(&mut samples, "8a", "16").is_err());
    }

    #[test]
    fn test_16_to_24_scales_extremes() {
        let mut samples = [32767.0, -32768.0, 0.0, 1.0];
        convert(&mut samples, "16", "24").unwrap();
        assert_eq!(samples, [8388607.0, -8388608.0, 0.0, 256.0]);
    }

    #[test]
    fn test_truncates_toward_zero() {
        let mut samples = [1.0, -1.0];
        convert(&mut samples, "24", "16").unwrap();
        assert_eq!(samples, [0.0, -0.0]);
    }

    #[test]
    fn test_8_bit_offset_handling() {
        let mut samples = [128.0, 255.0, 0.0];
        convert(&mut samples, "8", "16").unwrap();
        assert_eq!(samples, [0.0, 32767.0, -32768.0]);

        let mut samples = [0.0, 32767.0, -32768.0];
        convert(&mut samples, "16", "8").unwrap();
        assert_eq!(samples, [128.0, 255.0, 0.0]);
    }

    #[test]
    fn test_float_to_int_and_back() {
        let mut samples = [1.0, -1.0, 0.5];
        convert(&mut samples, "32f", "16").unwrap();
        assert_eq!(samples, [32767.0, -32768.0, 16383.0]);

        let mut samples = [32767.0, -32768.0];
        convert(&mut samples, "16", "32f").unwrap();
        assert_eq!(samples, [1.0, -1.0]);
    }

    #[test]
    fn test_float_source_is_clamped() {
        let mut samples = [2.5, -3.0];
        convert(&mut samples, "32f", "16").unwrap();
        assert_eq!(samples, [32767.0, -32768.0]);

        let mut samples = [2.5, -3.0];
        convert(&mut samples, "64", "32f").unwrap();
        assert_eq!(samples, [1.0, -1.0]);
    }

    #[test]
    fn test_round_trip_within_one_step() {
        let original = [0.0, 1.0, -1.0, 1000.0, -1000.0, 32767.0, -32768.0];
        let mut samples = original;
        convert(&mut samples, "16", "24").unwrap();
        convert(&mut samples, "24", "16").unwrap();
        for (a, b) in original.iter().zip(samples.iter()) {
            assert!((a - b).abs() <= 1.0, "{} -> {}", a, b);
        }
    }
}
