//! Polygon toolpath generator
//!
//! Walks the faces of a regular polygon (or the two faces of a flats job)
//! and emits the tool-centre path in the polar-interpolation plane.
//!
//! Face `i` starts at `angle = dir * i * step` where `step = 2pi / sides` and
//! `dir` is `+1` for climb and `-1` for conventional milling, so the
//! traversal order reverses together with the arc winding.

use std::f64::consts::PI;

use polarmill_core::{MachiningParameters, Point};
use tracing::debug;

use super::segment::{ArcSweep, ToolpathPath, ToolpathSegment};
use crate::error::CamToolResult;

/// Corner radii and path radii at or below this are treated as zero
pub const SHARP_CORNER_THRESHOLD: f64 = 0.001;

/// Tangential arc centre shift for two flats, as a multiple of S
pub const TWO_FLAT_TANGENT_SHIFT_FACTOR: f64 = 1.5;

/// Angular layout shared by every face
#[derive(Debug, Clone, Copy)]
struct FaceLayout {
    sides: u32,
    step: f64,
    half_step: f64,
    dir: f64,
    sweep: ArcSweep,
}

impl FaceLayout {
    fn face_angle(&self, index: u32) -> f64 {
        self.dir * f64::from(index) * self.step
    }
}

/// How a single face is turned into segments, chosen once per path
#[derive(Debug, Clone, Copy)]
enum FaceStrategy {
    /// No corner rounding: one line to the offset vertex per face
    SharpPolygon { vertex_distance: f64 },
    /// Line to the arc start, then a corner arc around the rounded vertex
    RoundedPolygon {
        center_distance: f64,
        path_radius: f64,
    },
    /// Two opposing flats joined by half-turn arcs
    TwoFlat {
        normal_offset: f64,
        tangent_shift: f64,
        path_radius: f64,
    },
}

impl FaceStrategy {
    fn select(params: &MachiningParameters, layout: &FaceLayout) -> Self {
        let r_in = params.across_flats / 2.0;
        let r_tool = params.tool_diameter / 2.0;
        let corner_radius = params.corner_radius;
        let path_radius = corner_radius + r_tool;

        if layout.sides == 2 {
            Self::TwoFlat {
                normal_offset: r_in - corner_radius,
                tangent_shift: params.across_flats * TWO_FLAT_TANGENT_SHIFT_FACTOR,
                path_radius,
            }
        } else if corner_radius <= SHARP_CORNER_THRESHOLD {
            Self::SharpPolygon {
                vertex_distance: (r_in + r_tool) / layout.half_step.cos(),
            }
        } else {
            Self::RoundedPolygon {
                center_distance: (r_in - corner_radius) / layout.half_step.cos(),
                path_radius,
            }
        }
    }

    fn push_face(&self, layout: &FaceLayout, index: u32, path: &mut ToolpathPath) {
        let angle = layout.face_angle(index);
        let vertex_angle = angle + layout.dir * layout.half_step;

        match *self {
            Self::SharpPolygon { vertex_distance } => {
                path.push(ToolpathSegment::Line {
                    point: Point::from_polar(vertex_distance, vertex_angle),
                });
            }
            Self::RoundedPolygon {
                center_distance,
                path_radius,
            } => {
                let center = Point::from_polar(center_distance, vertex_angle);
                let end_angle = angle + layout.dir * layout.step;
                push_corner(path, center, path_radius, angle, end_angle, layout.sweep);
            }
            Self::TwoFlat {
                normal_offset,
                tangent_shift,
                path_radius,
            } => {
                let (ny, nx) = angle.sin_cos();
                let (tx, ty) = (-ny * layout.dir, nx * layout.dir);
                let center = Point::new(
                    normal_offset * nx + tangent_shift * tx,
                    normal_offset * ny + tangent_shift * ty,
                );
                push_corner(path, center, path_radius, angle, angle + PI, layout.sweep);
            }
        }
    }

    fn segments_per_face(&self) -> usize {
        match self {
            Self::SharpPolygon { .. } => 1,
            _ => 2,
        }
    }
}

fn push_corner(
    path: &mut ToolpathPath,
    center: Point,
    radius: f64,
    start_angle: f64,
    end_angle: f64,
    sweep: ArcSweep,
) {
    path.push(ToolpathSegment::Line {
        point: center.offset_polar(radius, start_angle),
    });
    if radius > SHARP_CORNER_THRESHOLD {
        path.push(ToolpathSegment::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            sweep,
        });
    }
}

/// Generator for polar polygon toolpaths
pub struct PolygonToolpathGenerator<'a> {
    params: &'a MachiningParameters,
}

impl<'a> PolygonToolpathGenerator<'a> {
    /// Create a new generator for the given parameters
    pub fn new(params: &'a MachiningParameters) -> Self {
        Self { params }
    }

    /// Compute the closed tool-centre path.
    ///
    /// Fails when the side count is below two or the across-flats size or
    /// tool diameter is not positive.
    pub fn generate(&self) -> CamToolResult<ToolpathPath> {
        let p = self.params;
        p.validate_shape()?;

        let sides = p.side_count();
        let step = 2.0 * PI / f64::from(sides);
        let layout = FaceLayout {
            sides,
            step,
            half_step: step / 2.0,
            dir: p.direction.sign(),
            sweep: ArcSweep::for_direction(p.direction),
        };
        let strategy = FaceStrategy::select(p, &layout);

        let capacity = (sides as usize)
            .saturating_mul(strategy.segments_per_face())
            .saturating_add(1);
        let mut path = ToolpathPath::with_capacity(capacity);
        for index in 0..sides {
            strategy.push_face(&layout, index, &mut path);
        }
        path.close();

        debug!(
            sides,
            direction = %p.direction,
            strategy = ?strategy,
            segments = path.len(),
            "Computed polygon toolpath"
        );
        Ok(path)
    }
}

/// Compute the toolpath for a parameter snapshot
pub fn compute_path(params: &MachiningParameters) -> CamToolResult<ToolpathPath> {
    PolygonToolpathGenerator::new(params).generate()
}
