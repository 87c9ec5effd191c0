//! Rounding and text formatting for design values.
//!
//! Onsets, durations and amplitudes are rounded half-to-even after scaling by
//! `10^decimals`, which is the convention the downstream modeling tools were
//! validated against. Motion files use C-style `%g` formatting.

/// Significant digits used by `%g`.
const G_PRECISION: i32 = 6;

/// Rounds `value` to `decimals` places, resolving ties to the even neighbour.
///
/// Non-finite inputs, and values whose scaled form overflows, are returned
/// unchanged.
///
/// # Examples
///
/// ```
/// use fmri_common::round_decimals;
///
/// assert_eq!(round_decimals(12.34567, 3), 12.346);
/// assert_eq!(round_decimals(2.5, 0), 2.0);
/// ```
pub fn round_decimals(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals.min(i32::MAX as u32) as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round_ties_even() / factor
}

/// Formats a number the way C's `printf("%g")` does.
///
/// Six significant digits, trailing zeros removed, scientific notation when
/// the decimal exponent is below -4 or at least 6.
///
/// # Examples
///
/// ```
/// use fmri_common::format_g;
///
/// assert_eq!(format_g(0.5), "0.5");
/// assert_eq!(format_g(1234567.0), "1.23457e+06");
/// assert_eq!(format_g(0.00001), "1e-05");
/// ```
pub fn format_g(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let scientific = format!("{:.*e}", (G_PRECISION - 1) as usize, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= G_PRECISION {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{sign}{:02}",
            trim_fraction(mantissa),
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (G_PRECISION - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{value:.decimals$}"))
    }
}

fn trim_fraction(text: &str) -> String {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_configured_precision() {
        assert_eq!(round_decimals(12.34567, 3), 12.346);
        assert_eq!(round_decimals(12.34567, 1), 12.3);
        assert_eq!(round_decimals(7.0, 3), 7.0);
        assert_eq!(round_decimals(-1.23456, 2), -1.23);
    }

    #[test]
    fn rounding_ties_go_to_even() {
        assert_eq!(round_decimals(0.5, 0), 0.0);
        assert_eq!(round_decimals(1.5, 0), 2.0);
        assert_eq!(round_decimals(2.5, 0), 2.0);
        assert_eq!(round_decimals(-2.5, 0), -2.0);
    }

    #[test]
    fn rounding_leaves_non_finite_values() {
        assert!(round_decimals(f64::NAN, 3).is_nan());
        assert_eq!(round_decimals(f64::INFINITY, 3), f64::INFINITY);
        assert_eq!(round_decimals(1e308, 10), 1e308);
    }

    #[test]
    fn format_g_fixed_notation() {
        assert_eq!(format_g(1.0), "1");
        assert_eq!(format_g(-0.0123), "-0.0123");
        assert_eq!(format_g(123456.0), "123456");
        assert_eq!(format_g(0.000123456789), "0.000123457");
        assert_eq!(format_g(0.1), "0.1");
        assert_eq!(format_g(99.99999), "100");
    }

    #[test]
    fn format_g_scientific_notation() {
        assert_eq!(format_g(1234567.0), "1.23457e+06");
        assert_eq!(format_g(0.00001), "1e-05");
        assert_eq!(format_g(-2.5e-7), "-2.5e-07");
        assert_eq!(format_g(1e100), "1e+100");
    }

    #[test]
    fn format_g_special_values() {
        assert_eq!(format_g(0.0), "0");
        assert_eq!(format_g(-0.0), "-0");
        assert_eq!(format_g(f64::NAN), "nan");
        assert_eq!(format_g(f64::NEG_INFINITY), "-inf");
    }
}
