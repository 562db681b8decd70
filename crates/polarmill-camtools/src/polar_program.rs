//! Polar interpolation program emitter
//!
//! Renders a computed [`ToolpathPath`] as a lathe program using G12.1 polar
//! interpolation. The radial word (X) is programmed as a diameter, so every
//! X value is twice the path coordinate; the angular word (C) carries y.

use polarmill_core::MachiningParameters;
use serde::{Deserialize, Serialize};

use crate::gcode_format::format_gcode_number as fmt;
use crate::polygon_toolpath::{ToolpathPath, ToolpathSegment};
use crate::speeds_feeds::stock_diameter;

/// Radial clearance added to stock and tool for the approach move (mm)
pub const SAFE_CLEARANCE: f64 = 3.0;
/// Feed for the axial plunge (mm/min)
pub const PLUNGE_FEED: u32 = 1000;
/// Z for the rapid approach (mm)
pub const APPROACH_Z: f64 = 2.0;
/// Z for the final retract (mm)
pub const RETRACT_Z: f64 = 10.0;

/// Options that do not come from the machining parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramOptions {
    /// Program number written as `O0001`
    pub program_number: u32,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self { program_number: 1 }
    }
}

/// Stock diameter rounded to 0.01 mm, as shown to the operator
pub fn display_stock_diameter(params: &MachiningParameters) -> f64 {
    (stock_diameter(params.side_count(), params.across_flats) * 100.0).round() / 100.0
}

/// Diameter of the rapid approach move
pub fn safe_approach_diameter(params: &MachiningParameters) -> f64 {
    display_stock_diameter(params) + params.tool_diameter + SAFE_CLEARANCE
}

/// Generator for polar interpolation programs
#[derive(Debug, Clone, Default)]
pub struct PolarProgramEmitter {
    options: ProgramOptions,
}

impl PolarProgramEmitter {
    pub fn new(options: ProgramOptions) -> Self {
        Self { options }
    }

    /// Render the complete program.
    ///
    /// The output is newline separated, starts and ends with `%` and depends
    /// only on the inputs.
    pub fn emit(&self, params: &MachiningParameters, path: &ToolpathPath, feed_rate: u32) -> String {
        let mut gcode = String::new();
        let p = params;

        // Header
        gcode.push_str("%\n");
        gcode.push_str(&format!(
            "O{:04}(N{} S{} D{} R{})\n",
            self.options.program_number,
            p.side_count(),
            p.across_flats,
            p.tool_diameter,
            p.corner_radius
        ));
        gcode.push_str("G0 G40 G97 G98\n");
        gcode.push_str(&format!("T0101 M5 (MILL D{})\n", p.tool_diameter));
        gcode.push_str("(C AXIS ON)\n");
        gcode.push_str("G28 H0.\n");
        gcode.push_str(&format!("M3 S{}\n", p.spindle_rpm));

        // Approach and plunge
        gcode.push_str(&format!(
            "G0 X{} Z{} C0.\n",
            fmt(safe_approach_diameter(p)),
            fmt(APPROACH_Z)
        ));
        gcode.push_str(&format!("G1 Z{} F{}\n", fmt(-p.depth), PLUNGE_FEED));

        gcode.push_str("G12.1 (POLAR-ON)\n");
        self.emit_moves(path, feed_rate, &mut gcode);
        gcode.push_str("G13.1 (POLAR-OFF)\n");

        // Retract and end
        gcode.push_str(&format!("G0 Z{} M5\n", fmt(RETRACT_Z)));
        gcode.push_str("(C AXIS OFF)\n");
        gcode.push_str("M9\n");
        gcode.push_str("G99\n");
        gcode.push_str("G28 U0.\n");
        gcode.push_str("G28 W0.\n");
        gcode.push_str("M30\n");
        gcode.push('%');

        gcode
    }

    fn emit_moves(&self, path: &ToolpathPath, feed_rate: u32, gcode: &mut String) {
        let last = path.len().saturating_sub(1);
        let mut feed_pending = true;

        for (index, segment) in path.segments().iter().enumerate() {
            let end = segment.end_point();
            let target = format!("X{} C{}", fmt(2.0 * end.x), fmt(end.y));
            match segment {
                ToolpathSegment::Line { .. } => {
                    gcode.push_str("G01 ");
                    gcode.push_str(&target);
                    if feed_pending {
                        gcode.push_str(&format!(" F{}", feed_rate));
                        feed_pending = false;
                    }
                    if index == last {
                        gcode.push_str(" (CLOSE PROFILE)");
                    }
                }
                ToolpathSegment::Arc { radius, sweep, .. } => {
                    gcode.push_str(&format!("{} {} R{}", sweep.gcode(), target, fmt(*radius)));
                }
            }
            gcode.push('\n');
        }
    }
}

/// Render a program with default options
pub fn emit_program(params: &MachiningParameters, path: &ToolpathPath, feed_rate: u32) -> String {
    PolarProgramEmitter::default().emit(params, path, feed_rate)
}
