//! NaN-preserving narrowing and widening between binary64 and binary32.
//!
//! The paired-single format stores slot 0 as a binary64 whose value must
//! also be expressible as a widened binary32. Host `as` conversions are
//! permitted to quiet a signalling NaN, so every path that must preserve a
//! signalling payload routes through the bit-level pair
//! [`truncate_double_bits`] / [`extend_float_nan_bits`] instead:
//!
//! - **Truncation** ([`truncate_double`]): sign, the top two exponent bits,
//!   and the next 30 bits of exponent-low/mantissa are kept; trailing
//!   mantissa bits are chopped, never rounded. This is the narrowing the
//!   hardware applies when a double is reinterpreted as a single.
//! - **Widening** ([`extend_float`]): value-exact for non-NaN input; a NaN
//!   payload is placed in the high bits of the binary64 mantissa with the
//!   exponent forced to all ones, so narrowing it again restores the
//!   original single.

/// Canonical quiet NaN bit pattern for binary32 (sign 0, quiet bit set, zero payload).
pub const QNAN_F32: u32 = 0x7FC0_0000;

/// Canonical quiet NaN bit pattern for binary64.
pub const QNAN_F64: u64 = 0x7FF8_0000_0000_0000;

/// Quiet bit of a binary32 mantissa.
const F32_QUIET_BIT: u32 = 0x0040_0000;

/// Quiet bit of a binary64 mantissa.
const F64_QUIET_BIT: u64 = 0x0008_0000_0000_0000;

/// Returns the canonical binary32 quiet NaN.
#[inline(always)]
pub fn quiet_nan_f32() -> f32 {
    f32::from_bits(QNAN_F32)
}

/// Checks whether a double is a signalling NaN.
///
/// Exponent all ones, non-zero mantissa, quiet bit clear. Bit-level so the
/// host cannot quiet the value on the way through.
#[inline(always)]
pub fn is_signalling_nan(v: f64) -> bool {
    let bits = v.to_bits();
    let exp = (bits >> 52) & 0x7FF;
    let mantissa = bits & 0x000F_FFFF_FFFF_FFFF;
    exp == 0x7FF && mantissa != 0 && (bits & F64_QUIET_BIT) == 0
}

/// Narrows a binary64 bit pattern to binary32 by truncation.
///
/// Keeps the sign, the top two exponent bits, and the following 30 bits
/// (low exponent bits plus the top 23 mantissa bits). Payload bits below
/// mantissa bit 29 of the double are discarded. Only meaningful for values
/// whose exponent fits the binary32 range, which holds on every path that
/// reaches it: NaN propagation and slot-1 mantissa-truncating inserts.
#[inline(always)]
pub fn truncate_double_bits(bits: u64) -> u32 {
    (((bits >> 32) & 0xC000_0000) | ((bits >> 29) & 0x3FFF_FFFF)) as u32
}

/// Narrows a double to a single by bit truncation (see [`truncate_double_bits`]).
#[inline(always)]
pub fn truncate_double(v: f64) -> f32 {
    f32::from_bits(truncate_double_bits(v.to_bits()))
}

/// Widens a binary32 NaN bit pattern to binary64.
///
/// Sign preserved, exponent forced to all ones, the 23-bit mantissa placed
/// in the high bits of the binary64 mantissa and zero-extended, so that
/// [`truncate_double_bits`] recovers the original pattern.
#[inline(always)]
pub fn extend_float_nan_bits(bits: u32) -> u64 {
    (((bits & 0x8000_0000) as u64) << 32)
        | (0x7FF_u64 << 52)
        | (((bits & 0x007F_FFFF) as u64) << 29)
}

/// Widens a single to a double losslessly.
///
/// Non-NaN input converts by value; NaN input goes through
/// [`extend_float_nan_bits`] so quiet/signalling state and payload survive.
#[inline(always)]
pub fn extend_float(v: f32) -> f64 {
    if v.is_nan() {
        f64::from_bits(extend_float_nan_bits(v.to_bits()))
    } else {
        v as f64
    }
}

/// Quiets a binary32 NaN by setting the mantissa quiet bit.
///
/// Sign and remaining payload bits are untouched. Harmless on non-NaN
/// input, but only ever called on NaNs.
#[inline(always)]
pub fn make_quiet(v: f32) -> f32 {
    f32::from_bits(v.to_bits() | F32_QUIET_BIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snan_detection() {
        assert!(is_signalling_nan(f64::from_bits(0x7FF0_0000_2000_0000)));
        assert!(!is_signalling_nan(f64::from_bits(QNAN_F64)));
        assert!(!is_signalling_nan(f64::INFINITY));
        assert!(!is_signalling_nan(1.0));
        assert!(is_signalling_nan(f64::from_bits(0xFFF0_0000_2000_0000)));
    }

    #[test]
    fn test_truncate_extend_roundtrip_on_snan() {
        // Payload sits in the high mantissa bits so truncation keeps it.
        let snan32 = 0x7F80_0001u32;
        let wide = extend_float_nan_bits(snan32);
        assert!(is_signalling_nan(f64::from_bits(wide)));
        assert_eq!(truncate_double_bits(wide), snan32);
    }

    #[test]
    fn test_extend_float_value_exact() {
        assert_eq!(extend_float(1.5), 1.5);
        assert_eq!(extend_float(-0.0).to_bits(), (-0.0f64).to_bits());
        assert_eq!(extend_float(f32::INFINITY), f64::INFINITY);
        // Subnormal singles widen by value, not by bit shuffling.
        let tiny = f32::from_bits(1);
        assert_eq!(extend_float(tiny), tiny as f64);
    }

    #[test]
    fn test_extend_float_preserves_nan_payload() {
        let qnan32 = 0xFFC1_2345u32;
        let wide = extend_float(f32::from_bits(qnan32));
        assert!(wide.is_nan());
        assert_eq!(truncate_double_bits(wide.to_bits()), qnan32);
    }

    #[test]
    fn test_truncate_chops_mantissa() {
        // 1 + 2^-30 is representable in binary64 only; truncation drops the
        // tail instead of rounding.
        let v = 1.0 + (2.0f64).powi(-30);
        assert_eq!(truncate_double(v), 1.0);
    }

    #[test]
    fn test_make_quiet_preserves_payload_and_sign() {
        let snan = f32::from_bits(0x7F80_0001);
        let quiet = make_quiet(snan);
        assert_eq!(quiet.to_bits(), 0x7FC0_0001);
        let neg = make_quiet(f32::from_bits(0xFF80_0001));
        assert_eq!(neg.to_bits(), 0xFFC0_0001);
    }
}
