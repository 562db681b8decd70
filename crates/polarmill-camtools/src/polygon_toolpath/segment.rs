//! Toolpath segment types and data structures.

use serde::{Deserialize, Serialize};

use polarmill_core::{MillingDirection, Point};

/// Winding of a circular move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArcSweep {
    /// G02
    Clockwise,
    /// G03
    CounterClockwise,
}

impl ArcSweep {
    /// Sweep used for corner arcs in the given milling direction
    pub fn for_direction(direction: MillingDirection) -> Self {
        if direction.is_counter_clockwise() {
            Self::CounterClockwise
        } else {
            Self::Clockwise
        }
    }

    /// Controller code for a circular move with this sweep
    pub fn gcode(&self) -> &'static str {
        match self {
            Self::Clockwise => "G02",
            Self::CounterClockwise => "G03",
        }
    }
}

/// A single segment of a polar toolpath.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolpathSegment {
    /// Linear move to `point`
    Line { point: Point },
    /// Circular move around `center` from `start_angle` to `end_angle`
    Arc {
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        sweep: ArcSweep,
    },
}

impl ToolpathSegment {
    /// Where the tool is after this segment
    pub fn end_point(&self) -> Point {
        match self {
            Self::Line { point } => *point,
            Self::Arc {
                center,
                radius,
                end_angle,
                ..
            } => center.offset_polar(*radius, *end_angle),
        }
    }

    /// Where an arc starts; lines start wherever the previous segment ended
    pub fn arc_start_point(&self) -> Option<Point> {
        match self {
            Self::Line { .. } => None,
            Self::Arc {
                center,
                radius,
                start_angle,
                ..
            } => Some(center.offset_polar(*radius, *start_angle)),
        }
    }

    pub fn is_arc(&self) -> bool {
        matches!(self, Self::Arc { .. })
    }
}

/// An ordered, closed sequence of segments
///
/// The last segment is a line back to the first point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolpathPath {
    segments: Vec<ToolpathSegment>,
}

impl ToolpathPath {
    /// Creates an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            segments: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, segment: ToolpathSegment) {
        self.segments.push(segment);
    }

    /// Append a line back to the first point
    pub(crate) fn close(&mut self) {
        if let Some(first) = self.first_point() {
            self.segments.push(ToolpathSegment::Line { point: first });
        }
    }

    pub fn segments(&self) -> &[ToolpathSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// First point the path visits
    pub fn first_point(&self) -> Option<Point> {
        self.segments.first().map(ToolpathSegment::end_point)
    }

    /// Last point the path visits
    pub fn last_point(&self) -> Option<Point> {
        self.segments.last().map(ToolpathSegment::end_point)
    }

    /// Whether the path ends exactly where it starts
    pub fn is_closed(&self) -> bool {
        match (self.first_point(), self.last_point()) {
            (Some(first), Some(last)) => self.len() > 1 && first == last,
            _ => false,
        }
    }

    pub fn line_count(&self) -> usize {
        self.segments.iter().filter(|s| !s.is_arc()).count()
    }

    pub fn arc_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_arc()).count()
    }
}

impl<'a> IntoIterator for &'a ToolpathPath {
    type Item = &'a ToolpathSegment;
    type IntoIter = std::slice::Iter<'a, ToolpathSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_arc_endpoints() {
        let arc = ToolpathSegment::Arc {
            center: Point::new(1.0, 0.0),
            radius: 2.0,
            start_angle: 0.0,
            end_angle: PI,
            sweep: ArcSweep::CounterClockwise,
        };
        let start = arc.arc_start_point().unwrap();
        assert!((start.x - 3.0).abs() < 1e-12);
        let end = arc.end_point();
        assert!((end.x + 1.0).abs() < 1e-12);
        assert!(end.y.abs() < 1e-12);
    }

    #[test]
    fn test_close_repeats_first_point() {
        let mut path = ToolpathPath::new();
        assert!(!path.is_closed());
        path.push(ToolpathSegment::Line {
            point: Point::new(1.0, 2.0),
        });
        path.push(ToolpathSegment::Line {
            point: Point::new(3.0, 4.0),
        });
        path.close();

        assert_eq!(path.len(), 3);
        assert!(path.is_closed());
        assert_eq!(path.last_point(), Some(Point::new(1.0, 2.0)));
        assert_eq!(path.line_count(), 3);
        assert_eq!(path.arc_count(), 0);
    }

    #[test]
    fn test_sweep_codes() {
        assert_eq!(
            ArcSweep::for_direction(MillingDirection::Climb).gcode(),
            "G03"
        );
        assert_eq!(
            ArcSweep::for_direction(MillingDirection::Conventional).gcode(),
            "G02"
        );
    }
}
