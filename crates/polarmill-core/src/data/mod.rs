//! Data models for the machining plane and part parameters
//!
//! This module provides:
//! - Planar points in the polar-interpolation (X/C) plane
//! - The machining parameter record edited by the operator
//! - Shape and milling direction selectors

pub mod machining;

pub use machining::{MachiningParameters, MillingDirection, ShapeKind};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in the machining plane
///
/// `x` is the radial coordinate (radius, not diameter) and `y` the
/// tangential coordinate the controller maps onto the C axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Radial coordinate
    pub x: f64,
    /// Tangential coordinate
    pub y: f64,
}

impl Point {
    /// Create a new point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point at `radius` along `angle` (radians) from `self`
    pub fn offset_polar(&self, radius: f64, angle: f64) -> Self {
        Self {
            x: self.x + radius * angle.cos(),
            y: self.y + radius * angle.sin(),
        }
    }

    /// Point at `radius` along `angle` (radians) from the origin
    pub fn from_polar(radius: f64, angle: f64) -> Self {
        Self::default().offset_polar(radius, angle)
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_from_polar() {
        let p = Point::from_polar(2.0, FRAC_PI_2);
        assert!(p.x.abs() < 1e-12);
        assert!((p.y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_offset_polar() {
        let center = Point::new(1.0, 1.0);
        let p = center.offset_polar(3.0, PI);
        assert!((p.x + 2.0).abs() < 1e-12);
        assert!((center.distance_to(&p) - 3.0).abs() < 1e-12);
        assert!((p.y - 1.0).abs() < 1e-12);
    }
}
