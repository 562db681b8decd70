//! Machining parameter record
//!
//! Holds everything the operator enters for a polygon or flats job: part
//! geometry, cutter, direction and the linked spindle/cutting speeds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParameterError;

/// Shape of the milled feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    /// Six faces
    #[default]
    Hex,
    /// Four faces
    Square,
    /// Two opposing flats
    TwoFlat,
    /// Regular polygon with a user supplied side count
    Custom,
}

impl ShapeKind {
    /// Face count implied by the shape, `None` for [`ShapeKind::Custom`]
    pub fn fixed_sides(&self) -> Option<u32> {
        match self {
            Self::Hex => Some(6),
            Self::Square => Some(4),
            Self::TwoFlat => Some(2),
            Self::Custom => None,
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hex => write!(f, "Hexagon"),
            Self::Square => write!(f, "Square"),
            Self::TwoFlat => write!(f, "Two flats"),
            Self::Custom => write!(f, "Custom (N)"),
        }
    }
}

impl FromStr for ShapeKind {
    type Err = String;

    /// Accepts the selector values `6`, `4`, `2` and `custom` as well as names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "6" | "hex" | "hexagon" => Ok(Self::Hex),
            "4" | "square" => Ok(Self::Square),
            "2" | "two-flat" | "two_flat" | "flats" => Ok(Self::TwoFlat),
            "custom" | "n" => Ok(Self::Custom),
            _ => Err(format!("Unknown shape: {}", s)),
        }
    }
}

/// Cutting direction relative to feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MillingDirection {
    /// Climb milling: counter-clockwise traversal, G03 arcs
    #[default]
    Climb,
    /// Conventional milling: clockwise traversal, G02 arcs
    Conventional,
}

impl MillingDirection {
    /// `+1.0` for climb, `-1.0` for conventional
    pub fn sign(&self) -> f64 {
        match self {
            Self::Climb => 1.0,
            Self::Conventional => -1.0,
        }
    }

    /// Whether arcs in this direction sweep counter-clockwise
    pub fn is_counter_clockwise(&self) -> bool {
        matches!(self, Self::Climb)
    }
}

impl fmt::Display for MillingDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Climb => write!(f, "climb"),
            Self::Conventional => write!(f, "conventional"),
        }
    }
}

impl FromStr for MillingDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "climb" => Ok(Self::Climb),
            "conv" | "conventional" => Ok(Self::Conventional),
            _ => Err(format!("Unknown milling direction: {}", s)),
        }
    }
}

/// Parameters for a polygon / flats milling job
///
/// Lengths are in millimetres, cutting speed in m/min.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachiningParameters {
    /// Feature shape
    pub shape: ShapeKind,
    /// Side count, only used when `shape` is [`ShapeKind::Custom`]
    pub sides: u32,
    /// Across-flats dimension (S)
    pub across_flats: f64,
    /// Corner radius (R); values up to 0.001 mean a sharp corner
    pub corner_radius: f64,
    /// Axial depth of cut
    pub depth: f64,
    /// Cutter diameter (D)
    pub tool_diameter: f64,
    /// Number of flutes (Z)
    pub flute_count: u32,
    /// Milling direction
    pub direction: MillingDirection,
    /// Spindle speed (RPM)
    pub spindle_rpm: u32,
    /// Cutting speed (Vc)
    pub cutting_speed: f64,
    /// Feed per tooth (Fz)
    pub feed_per_tooth: f64,
}

impl Default for MachiningParameters {
    fn default() -> Self {
        Self {
            shape: ShapeKind::Hex,
            sides: 5,
            across_flats: 27.0,
            corner_radius: 0.5,
            depth: 10.0,
            tool_diameter: 12.0,
            flute_count: 4,
            direction: MillingDirection::Climb,
            spindle_rpm: 2000,
            cutting_speed: 75.0,
            feed_per_tooth: 0.05,
        }
    }
}

impl MachiningParameters {
    /// Number of faces the toolpath walks around
    pub fn side_count(&self) -> u32 {
        self.shape.fixed_sides().unwrap_or(self.sides)
    }

    /// Check the inputs the toolpath geometry depends on
    pub fn validate_shape(&self) -> Result<(), ParameterError> {
        let sides = self.side_count();
        if sides < 2 {
            return Err(ParameterError::OutOfRange {
                name: "sides".to_string(),
                value: f64::from(sides),
                min: 2.0,
                max: f64::from(u32::MAX),
            });
        }
        // Written as !(x > 0) so NaN is rejected too
        if !(self.across_flats > 0.0) {
            return Err(ParameterError::InvalidDimensions(format!(
                "across flats must be positive, got {}",
                self.across_flats
            )));
        }
        if !(self.tool_diameter > 0.0) {
            return Err(ParameterError::InvalidDimensions(format!(
                "tool diameter must be positive, got {}",
                self.tool_diameter
            )));
        }
        Ok(())
    }
}
