//! Parallel two-lane road spanning the image.
//!
//! The road's extent is the image, not the baseline: a short baseline is
//! first extrapolated across the image along its dominant axis, and the
//! boundaries are run out to the image edges.
use super::{baseline_polyline, offset_distance, Segment, SegmentKind};
use crate::error::{LaneError, Stage};
use crate::geometry::{extend_quadratic, fit::runs_along_x, Polyline};
use crate::params::GeometryParams;
use crate::roads::Baseline;
use log::debug;

pub fn build(
    baseline: &Baseline,
    params: &GeometryParams,
    (width, height): (usize, usize),
) -> Result<Segment, LaneError> {
    let base = baseline_polyline(baseline)?;
    let along_x = runs_along_x(&base);
    let dim = if along_x { width } else { height } as f32;
    let v = base.endpoint_vector();
    let span = if along_x { v[0].abs() } else { v[1].abs() };

    let midline = if span < params.extrapolation_trigger * dim {
        debug!(
            "parallel::build segment={} span={:.1} < {:.0}% of {:.0}, extrapolating",
            baseline.id,
            span,
            params.extrapolation_trigger * 100.0,
            dim
        );
        extend_quadratic(&base, width, height, params.extrapolation_step).ok_or_else(|| {
            LaneError::degenerate(baseline.id, Stage::Build, "baseline extrapolation failed")
        })?
    } else {
        base
    };
    let midline = midline.extend_to_bounds(width, height);

    let (left, right) = find_boundaries(
        baseline.id,
        &midline,
        baseline.half_width,
        params.offset_epsilon,
        (width, height),
    )?;
    Segment::from_parts(
        baseline.id,
        SegmentKind::Parallel,
        midline,
        left,
        right,
        2.0 * baseline.half_width,
    )
}

/// Boundaries of a parallel road: the midline offset by the half-width on
/// each side, both ends extrapolated along their end tangents to the image
/// rectangle.
pub fn find_boundaries(
    id: usize,
    midline: &Polyline,
    half_width: f32,
    epsilon: f32,
    (width, height): (usize, usize),
) -> Result<(Polyline, Polyline), LaneError> {
    let d = offset_distance(half_width, epsilon).ok_or_else(|| {
        LaneError::degenerate(
            id,
            Stage::Build,
            format!("zero-length offset for half-width {half_width}"),
        )
    })?;
    let left = midline.shift_left(d).extend_to_bounds(width, height);
    let right = midline.shift_right(d).extend_to_bounds(width, height);
    Ok((left, right))
}
