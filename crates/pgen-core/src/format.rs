//! # Value Formatting
//!
//! Parameters store one signed integer. The display value is
//! `stored × 10^exponent`:
//!
//! - `exponent >= 0` renders as a plain signed decimal integer.
//! - `exponent < 0` renders as a fixed-point decimal with `|exponent|`
//!   fractional digits, e.g. `1337000` with exponent `-6` is `"1.337000"`.
//!
//! Rendering is exact integer arithmetic; no floating point is involved, so
//! parsing the rendered string as a decimal always reconstructs the scaled
//! value.

/// Largest supported `|exponent|`. Keeps `i32::MAX × 10^9` inside `i64`.
pub const MAX_EXPONENT: i32 = 9;

/// Render `value × 10^exponent`.
///
/// `exponent` is clamped to `±MAX_EXPONENT`; the validator rejects schemas
/// outside that range so the clamp never changes a compiled parameter.
pub fn format_scaled(value: i32, exponent: i32) -> String {
    let exponent = exponent.clamp(-MAX_EXPONENT, MAX_EXPONENT);
    let scale = 10i64.pow(exponent.unsigned_abs());

    if exponent >= 0 {
        return (i64::from(value) * scale).to_string();
    }

    let digits = exponent.unsigned_abs() as usize;
    let magnitude = i64::from(value).unsigned_abs();
    let scale = scale as u64;
    let sign = if value < 0 { "-" } else { "" };
    format!(
        "{sign}{}.{:0digits$}",
        magnitude / scale,
        magnitude % scale,
        digits = digits
    )
}

/// Width of the longest rendering of any value in `[min, max]`.
///
/// Rendering width grows with magnitude, so the extremes are sufficient.
pub fn max_rendered_len(min: i32, max: i32, exponent: i32) -> usize {
    format_scaled(min, exponent)
        .len()
        .max(format_scaled(max, exponent).len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_integer() {
        assert_eq!(format_scaled(0, 0), "0");
        assert_eq!(format_scaled(123, 0), "123");
        assert_eq!(format_scaled(-45, 0), "-45");
    }

    #[test]
    fn test_positive_exponent_scales() {
        assert_eq!(format_scaled(15, 2), "1500");
        assert_eq!(format_scaled(-3, 1), "-30");
    }

    #[test]
    fn test_negative_exponent_fixed_point() {
        assert_eq!(format_scaled(1337000, -6), "1.337000");
        assert_eq!(format_scaled(1000000, -6), "1.000000");
        assert_eq!(format_scaled(2000000, -6), "2.000000");
        assert_eq!(format_scaled(5, -1), "0.5");
        assert_eq!(format_scaled(7, -3), "0.007");
    }

    #[test]
    fn test_negative_values_keep_sign_below_one() {
        assert_eq!(format_scaled(-5, -1), "-0.5");
        assert_eq!(format_scaled(-1234, -2), "-12.34");
    }

    #[test]
    fn test_extremes_do_not_overflow() {
        assert_eq!(format_scaled(i32::MIN, -9), "-2.147483648");
        assert_eq!(format_scaled(i32::MAX, 9), "2147483647000000000");
    }

    #[test]
    fn test_max_rendered_len() {
        assert_eq!(max_rendered_len(-5, 100, 0), 3);
        assert_eq!(max_rendered_len(-500, 10, -1), 5); // "-50.0"
    }
}
