//! Speeds and feeds
//!
//! Closed-form relations between tool diameter, spindle speed, cutting
//! speed and feed, plus the stock diameter a polygon is milled from.

use std::f64::consts::PI;

use polarmill_core::MachiningParameters;

/// Cutting speed (m/min) for a tool diameter (mm) and spindle speed,
/// rounded to a whole m/min.
///
/// Returns `None` when either input is not positive.
pub fn cutting_speed_for(tool_diameter: f64, spindle_rpm: u32) -> Option<f64> {
    if !(tool_diameter > 0.0) || spindle_rpm == 0 {
        return None;
    }
    Some((PI * tool_diameter * f64::from(spindle_rpm) / 1000.0).round())
}

/// Spindle speed for a tool diameter (mm) and cutting speed (m/min),
/// rounded to a whole RPM.
///
/// Returns `None` when either input is not positive or the result rounds to zero.
pub fn spindle_rpm_for(tool_diameter: f64, cutting_speed: f64) -> Option<u32> {
    if !(tool_diameter > 0.0) || !(cutting_speed > 0.0) {
        return None;
    }
    let rpm = (cutting_speed * 1000.0 / (PI * tool_diameter)).round();
    if rpm < 1.0 {
        return None;
    }
    // float to int casts saturate at u32::MAX
    Some(rpm as u32)
}

/// Feed rate in mm/min: `round(RPM * Fz * Z)`
pub fn feed_rate(spindle_rpm: u32, feed_per_tooth: f64, flute_count: u32) -> u32 {
    let feed = (f64::from(spindle_rpm) * feed_per_tooth * f64::from(flute_count)).round();
    if feed > 0.0 {
        feed as u32
    } else {
        0
    }
}

/// Feed rate for a parameter snapshot
pub fn compute_feed_rate(params: &MachiningParameters) -> u32 {
    feed_rate(
        params.spindle_rpm,
        params.feed_per_tooth,
        params.flute_count,
    )
}

/// Smallest round stock that contains the finished feature.
///
/// Two flats leave the original diameter untouched, so the stock equals the
/// across-flats size. Polygons need the corner-to-corner diameter.
pub fn stock_diameter(sides: u32, across_flats: f64) -> f64 {
    if sides == 2 {
        across_flats
    } else {
        across_flats / (PI / f64::from(sides)).cos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cutting_speed_for() {
        // pi * 12 * 2000 / 1000 = 75.398
        assert_eq!(cutting_speed_for(12.0, 2000), Some(75.0));
        assert_eq!(cutting_speed_for(10.0, 3000), Some(94.0));
        assert_eq!(cutting_speed_for(0.0, 2000), None);
        assert_eq!(cutting_speed_for(12.0, 0), None);
        assert_eq!(cutting_speed_for(f64::NAN, 2000), None);
    }

    #[test]
    fn test_spindle_rpm_for() {
        // 75 * 1000 / (pi * 12) = 1989.4
        assert_eq!(spindle_rpm_for(12.0, 75.0), Some(1989));
        assert_eq!(spindle_rpm_for(12.0, 0.0), None);
        assert_eq!(spindle_rpm_for(-1.0, 75.0), None);
        assert_eq!(spindle_rpm_for(1.0e9, 0.001), None);
    }

    #[test]
    fn test_feed_rate() {
        assert_eq!(feed_rate(2000, 0.05, 4), 400);
        assert_eq!(feed_rate(1989, 0.05, 3), 298);
        assert_eq!(feed_rate(2000, -0.05, 4), 0);
        assert_eq!(compute_feed_rate(&MachiningParameters::default()), 400);
    }

    #[test]
    fn test_stock_diameter() {
        assert!((stock_diameter(6, 27.0) - 31.1769).abs() < 1e-4);
        assert!((stock_diameter(4, 20.0) - 28.2843).abs() < 1e-4);
        assert_eq!(stock_diameter(2, 20.0), 20.0);
    }
}
