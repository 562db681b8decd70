//! Path Sampler
//!
//! Flattens a polar toolpath into a point sequence for display. Lines
//! contribute their end point; arcs are split into a fixed number of steps.

use std::f64::consts::PI;

use polarmill_core::{MachiningParameters, Point};
use serde::Serialize;

use crate::polygon_toolpath::{ArcSweep, ToolpathPath, ToolpathSegment};

/// A point of the flattened path
pub type SampledPoint = Point;

/// Sampling configuration
#[derive(Debug, Clone)]
pub struct PathSamplerConfig {
    /// Number of points each arc is split into
    pub arc_steps: usize,
}

impl Default for PathSamplerConfig {
    fn default() -> Self {
        Self { arc_steps: 8 }
    }
}

/// Converts toolpath segments to display points
#[derive(Debug, Default)]
pub struct PathSampler {
    config: PathSamplerConfig,
}

impl PathSampler {
    pub fn new(config: PathSamplerConfig) -> Self {
        Self { config }
    }

    /// Flatten every segment of `path` in order
    pub fn sample(&self, path: &ToolpathPath) -> Vec<SampledPoint> {
        let arcs = path.arc_count();
        let mut points =
            Vec::with_capacity(path.line_count() + arcs * self.config.arc_steps.max(1));

        for segment in path {
            match *segment {
                ToolpathSegment::Line { point } => points.push(point),
                ToolpathSegment::Arc {
                    center,
                    radius,
                    start_angle,
                    end_angle,
                    sweep,
                } => self.expand_arc(center, radius, start_angle, end_angle, sweep, &mut points),
            }
        }
        points
    }

    fn expand_arc(
        &self,
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        sweep: ArcSweep,
        out: &mut Vec<SampledPoint>,
    ) {
        let start = start_angle.sin().atan2(start_angle.cos());
        let mut end = end_angle.sin().atan2(end_angle.cos());

        // Unwrap the end angle so the sweep runs in the arc's direction
        match sweep {
            ArcSweep::CounterClockwise if end <= start => end += 2.0 * PI,
            ArcSweep::Clockwise if end >= start => end -= 2.0 * PI,
            _ => {}
        }

        let steps = self.config.arc_steps.max(1);
        for i in 1..=steps {
            let fraction = i as f64 / steps as f64;
            let angle = start + (end - start) * fraction;
            out.push(center.offset_polar(radius, angle));
        }
    }
}

/// Everything a viewer needs to draw one computed path
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationFrame {
    pub points: Vec<SampledPoint>,
    pub sides: u32,
    pub across_flats: f64,
    pub tool_diameter: f64,
}

impl SimulationFrame {
    /// Sample `path` with the default resolution
    pub fn new(params: &MachiningParameters, path: &ToolpathPath) -> Self {
        Self {
            points: PathSampler::default().sample(path),
            sides: params.side_count(),
            across_flats: params.across_flats,
            tool_diameter: params.tool_diameter,
        }
    }

    /// Corners of the finished part, for drawing under the tool path.
    ///
    /// Two flats are drawn as two lines as long as the across-flats size.
    pub fn part_outline(&self) -> Vec<Point> {
        let r_in = self.across_flats / 2.0;
        if self.sides == 2 {
            return vec![
                Point::new(r_in, -r_in),
                Point::new(r_in, r_in),
                Point::new(-r_in, r_in),
                Point::new(-r_in, -r_in),
            ];
        }

        let half_step = PI / f64::from(self.sides);
        let r_out = r_in / half_step.cos();
        (0..self.sides)
            .map(|i| Point::from_polar(r_out, half_step * (2 * i + 1) as f64))
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon_toolpath::compute_path;
    use polarmill_core::MillingDirection;

    #[test]
    fn test_lines_and_arcs_counts() {
        let params = MachiningParameters::default();
        let path = compute_path(&params).unwrap();
        let points = PathSampler::default().sample(&path);
        // 7 lines + 6 arcs * 8 steps
        assert_eq!(points.len(), 7 + 48);
    }

    #[test]
    fn test_arc_samples_end_at_arc_end() {
        let params = MachiningParameters::default();
        let path = compute_path(&params).unwrap();
        let points = PathSampler::default().sample(&path);

        let arc_end = path.segments()[1].end_point();
        let sampled = points[8];
        assert!((sampled.x - arc_end.x).abs() < 1e-9);
        assert!((sampled.y - arc_end.y).abs() < 1e-9);
    }

    #[test]
    fn test_clockwise_arc_sweeps_negative() {
        let sampler = PathSampler::new(PathSamplerConfig { arc_steps: 4 });
        let mut out = Vec::new();
        sampler.expand_arc(
            Point::default(),
            1.0,
            0.0,
            -PI / 2.0,
            ArcSweep::Clockwise,
            &mut out,
        );
        assert_eq!(out.len(), 4);
        // Every intermediate point is below the X axis
        assert!(out[..3].iter().all(|p| p.y < 0.0));
        assert!((out[3].y + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_half_turn_unwraps() {
        let sampler = PathSampler::default();
        let mut out = Vec::new();
        sampler.expand_arc(
            Point::default(),
            1.0,
            PI / 2.0,
            PI / 2.0 + PI,
            ArcSweep::CounterClockwise,
            &mut out,
        );
        // Passes through (-1, 0) on the way round
        assert!((out[3].x + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_frame_carries_scale() {
        let params = MachiningParameters {
            direction: MillingDirection::Conventional,
            ..MachiningParameters::default()
        };
        let path = compute_path(&params).unwrap();
        let frame = SimulationFrame::new(&params, &path);
        assert_eq!(frame.sides, 6);
        assert_eq!(frame.across_flats, 27.0);
        assert_eq!(frame.tool_diameter, 12.0);
        assert_eq!(frame.part_outline().len(), 6);

        let json = frame.to_json().unwrap();
        assert!(json.contains("\"across_flats\":27.0"));
    }
}
