//! IEEE 754 half-precision (binary16) conversion
//!
//! WAVE files never store 16-bit floats themselves, but the binary value
//! codec supports them so that callers can pack arbitrary sample buffers.
//! The conversion goes through the single-precision bit pattern.

/// Encode a value as half-precision bits.
///
/// Values outside the representable range become signed infinity; values
/// too small for a subnormal flush to signed zero. Rounds to nearest.
pub fn pack(value: f64) -> u16 {
    let bits = (value as f32).to_bits();
    let sign = ((bits >> 16) & 0x8000) as u16;
    let exponent = ((bits >> 23) & 0xff) as i32;
    let mantissa = bits & 0x007f_ffff;

    // Inf/NaN propagate, keeping a payload bit for NaN
    if exponent == 255 {
        return sign | 0x7c00 | if mantissa != 0 { 0x0200 } else { 0 };
    }

    let exponent = exponent - 127 + 15;
    if exponent >= 31 {
        return sign | 0x7c00;
    }
    if exponent <= 0 {
        if exponent < -10 {
            return sign;
        }
        // Subnormal: shift the implicit leading bit into the mantissa
        let mantissa = mantissa | 0x0080_0000;
        let shift = 14 - exponent;
        let half = (mantissa >> shift) as u16;
        let round = (mantissa >> (shift - 1)) & 1;
        return sign | (half + round as u16);
    }

    let half = sign | ((exponent as u16) << 10) | ((mantissa >> 13) as u16);
    // Round to nearest; a mantissa carry correctly overflows into the exponent
    if mantissa & 0x1000 != 0 {
        half + 1
    } else {
        half
    }
}

/// Decode half-precision bits to a value.
pub fn unpack(half: u16) -> f64 {
    let sign = if half & 0x8000 != 0 { -1.0 } else { 1.0 };
    let exponent = (half >> 10) & 0x1f;
    let mantissa = f64::from(half & 0x03ff);
    match exponent {
        0 => sign * mantissa * 2f64.powi(-24),
        31 => {
            if mantissa == 0.0 {
                sign * f64::INFINITY
            } else {
                f64::NAN
            }
        }
        _ => sign * (1.0 + mantissa / 1024.0) * 2f64.powi(i32::from(exponent) - 15),
    }
}
