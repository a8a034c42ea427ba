//! Road segments and their builders.
//!
//! A [`Segment`] is one road section: a midline, two boundary curves offset
//! from it, the footprint polygon between them and, once scanned, the
//! classified lane markings. Builders:
//!
//! - [`linear`]: one baseline, boundaries offset from the midline.
//! - [`intersection`]: one arm per baseline, point order canonicalized first.
//! - [`parallel`]: one baseline extended across the image, boundaries running
//!   to the image edges.

pub mod intersection;
pub mod linear;
pub mod parallel;

use crate::angle::{is_horizontal_deg, is_vertical_deg};
use crate::classify::{build_lanes, Lane, Line};
use crate::error::{LaneError, Stage};
use crate::geometry::{Footprint, Polyline};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SegmentKind {
    Linear,
    IntersectionArm,
    Parallel,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: usize,
    pub kind: SegmentKind,
    pub midline: Polyline,
    pub left_boundary: Polyline,
    pub right_boundary: Polyline,
    /// Full road width (px).
    pub width: f32,
    pub is_horizontal: bool,
    pub is_vertical: bool,
    pub polygon: Footprint,
    /// Rotation applied while scanning, set together with `lines`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle: Option<f32>,
    pub lines: Vec<Line>,
}

impl Segment {
    /// Assembles a segment from prepared curves, rejecting self-intersecting
    /// or unequal boundaries.
    pub fn from_parts(
        id: usize,
        kind: SegmentKind,
        midline: Polyline,
        left_boundary: Polyline,
        right_boundary: Polyline,
        width: f32,
    ) -> Result<Self, LaneError> {
        if left_boundary.len() != right_boundary.len() {
            return Err(LaneError::degenerate(
                id,
                Stage::Build,
                format!(
                    "boundary point counts differ ({} vs {})",
                    left_boundary.len(),
                    right_boundary.len()
                ),
            ));
        }
        if !left_boundary.is_simple() {
            return Err(LaneError::degenerate(id, Stage::Build, "left boundary self-intersects"));
        }
        if !right_boundary.is_simple() {
            return Err(LaneError::degenerate(id, Stage::Build, "right boundary self-intersects"));
        }
        let theta = midline.endpoint_angle_deg();
        let polygon = Footprint::from_boundaries(&left_boundary, &right_boundary);
        Ok(Self {
            id,
            kind,
            midline,
            left_boundary,
            right_boundary,
            width,
            is_horizontal: is_horizontal_deg(theta),
            is_vertical: is_vertical_deg(theta),
            polygon,
            angle: None,
            lines: Vec::new(),
        })
    }

    /// Builds boundaries as left/right offsets of `midline` by
    /// `ceil(half_width + epsilon)`.
    pub fn offset_from_midline(
        id: usize,
        kind: SegmentKind,
        midline: Polyline,
        half_width: f32,
        epsilon: f32,
    ) -> Result<Self, LaneError> {
        let distance = offset_distance(half_width, epsilon).ok_or_else(|| {
            LaneError::degenerate(
                id,
                Stage::Build,
                format!("zero-length offset for half-width {half_width}"),
            )
        })?;
        let left = midline.shift_left(distance);
        let right = midline.shift_right(distance);
        Self::from_parts(id, kind, midline, left, right, 2.0 * half_width)
    }

    /// Stores the scan rotation and classified lines. Called once per segment.
    pub fn attach_lines(&mut self, angle: f32, lines: Vec<Line>) {
        debug_assert!(self.lines.is_empty(), "segment lines are written once");
        self.angle = Some(angle);
        self.lines = lines;
    }

    /// Materialized line curves in a `y`-up frame of the given image height,
    /// the convention simulators expect.
    pub fn flipped_curves(&self, image_height: usize) -> Vec<Polyline> {
        let h = image_height as f32;
        self.lines
            .iter()
            .filter_map(|line| line.curve.as_ref())
            .map(|curve| curve.map(|p| [p[0], h - p[1]]))
            .collect()
    }

    /// Lanes bounded by consecutive materialized lines.
    pub fn lanes(&self) -> Vec<Lane> {
        build_lanes(&self.lines)
    }
}

/// `ceil(half_width + epsilon)`, `None` unless strictly positive and finite.
pub(crate) fn offset_distance(half_width: f32, epsilon: f32) -> Option<f32> {
    let d = (half_width + epsilon).ceil();
    (d.is_finite() && d > 0.0).then_some(d)
}

pub(crate) fn baseline_polyline(
    baseline: &crate::roads::Baseline,
) -> Result<Polyline, LaneError> {
    baseline.polyline().ok_or_else(|| {
        LaneError::degenerate(
            baseline.id,
            Stage::Build,
            "baseline has fewer than two distinct points",
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_distance_rounds_up_and_rejects_degenerate() {
        assert_eq!(offset_distance(10.0, 1e-3), Some(11.0));
        assert_eq!(offset_distance(0.0, 1e-3), Some(1.0));
        assert_eq!(offset_distance(-3.0, 1e-3), None);
        assert_eq!(offset_distance(f32::NAN, 1e-3), None);
    }

    #[test]
    fn vertical_midline_sets_flags_and_footprint() {
        let mid = Polyline::new(vec![[50.0, 0.0], [50.0, 119.0]]).unwrap();
        let seg = Segment::offset_from_midline(0, SegmentKind::Linear, mid, 10.0, 1e-3).unwrap();
        assert!(seg.is_vertical && !seg.is_horizontal);
        assert_eq!(seg.left_boundary.len(), seg.right_boundary.len());
        assert_eq!(seg.left_boundary.first(), [39.0, 0.0]);
        assert_eq!(seg.right_boundary.first(), [61.0, 0.0]);
        assert!(seg.polygon.contains([50.0, 60.0]));
        assert_eq!(seg.width, 20.0);
    }

    #[test]
    fn flipped_curves_mirror_y() {
        let mid = Polyline::new(vec![[10.0, 0.0], [10.0, 30.0]]).unwrap();
        let mut seg = Segment::offset_from_midline(3, SegmentKind::Linear, mid, 2.0, 1e-3).unwrap();
        let curve = Polyline::new(vec![[8.0, 5.0], [8.0, 25.0]]).unwrap();
        seg.attach_lines(
            0.0,
            vec![Line {
                keys: vec![1],
                num: crate::classify::LineNum::Single,
                pattern: crate::scan::MarkPattern::Solid,
                peak: 1,
                curve: Some(curve),
            }],
        );
        let flipped = seg.flipped_curves(40);
        assert_eq!(flipped.len(), 1);
        assert_eq!(flipped[0].points(), &[[8.0, 35.0], [8.0, 15.0]]);
    }
}
