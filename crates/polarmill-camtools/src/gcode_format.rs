//! Compact controller number notation
//!
//! Values are rounded to three decimals. Whole numbers keep a trailing
//! decimal point (`12.`), fractions drop trailing zeros (`12.34`).

use std::fmt;

/// A value rounded to whole thousandths, rendered in controller notation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GcodeNumber {
    thousandths: i64,
}

impl GcodeNumber {
    /// Round `value` to the nearest thousandth; non-finite input becomes zero
    pub fn new(value: f64) -> Self {
        let scaled = (value * 1000.0).round();
        let thousandths = if scaled.is_finite() { scaled as i64 } else { 0 };
        Self { thousandths }
    }
}

impl fmt::Display for GcodeNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.thousandths.unsigned_abs();
        let sign = if self.thousandths < 0 { "-" } else { "" };
        let whole = magnitude / 1000;
        let mut fraction = magnitude % 1000;

        if fraction == 0 {
            return write!(f, "{}{}.", sign, whole);
        }

        let mut digits = 3;
        while fraction % 10 == 0 {
            fraction /= 10;
            digits -= 1;
        }
        write!(f, "{}{}.{:0width$}", sign, whole, fraction, width = digits)
    }
}

/// Render a value for a G-code word
pub fn format_gcode_number(value: f64) -> String {
    GcodeNumber::new(value).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers_keep_decimal_point() {
        assert_eq!(format_gcode_number(12.0), "12.");
        assert_eq!(format_gcode_number(12.000), "12.");
        assert_eq!(format_gcode_number(-10.0), "-10.");
        assert_eq!(format_gcode_number(11.9996), "12.");
    }

    #[test]
    fn test_fractions_drop_trailing_zeros() {
        assert_eq!(format_gcode_number(12.5), "12.5");
        assert_eq!(format_gcode_number(12.340), "12.34");
        assert_eq!(format_gcode_number(46.18), "46.18");
        assert_eq!(format_gcode_number(0.05), "0.05");
        assert_eq!(format_gcode_number(1.0005), "1.001");
        assert_eq!(format_gcode_number(3.007), "3.007");
    }

    #[test]
    fn test_small_and_negative_values() {
        assert_eq!(format_gcode_number(-0.0005), "-0.001");
        assert_eq!(format_gcode_number(-0.25), "-0.25");
        assert_eq!(format_gcode_number(-0.0), "0.");
        assert_eq!(format_gcode_number(0.0004), "0.");
        assert_eq!(format_gcode_number(-0.0004), "0.");
    }

    #[test]
    fn test_non_finite_values() {
        assert_eq!(format_gcode_number(f64::NAN), "0.");
        assert_eq!(format_gcode_number(f64::INFINITY), "0.");
    }

    #[test]
    fn test_gcode_number_rounds_to_thousandths() {
        assert_eq!(GcodeNumber::new(12.3456), GcodeNumber::new(12.346));
        assert_eq!(GcodeNumber::new(12.3456).to_string(), "12.346");
    }
}
