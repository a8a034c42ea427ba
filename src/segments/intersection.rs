//! Intersection arms: one independent segment per baseline.
use super::{Segment, SegmentKind};
use crate::angle::{direction_deg, is_horizontal_deg};
use crate::error::{LaneError, Stage};
use crate::geometry::{polyline::dist, Polyline};
use crate::params::GeometryParams;
use crate::roads::Baseline;
use log::debug;

pub fn build_arms(
    baselines: &[Baseline],
    params: &GeometryParams,
) -> Vec<Result<Segment, LaneError>> {
    baselines.iter().map(|b| build_arm(b, params)).collect()
}

fn build_arm(baseline: &Baseline, params: &GeometryParams) -> Result<Segment, LaneError> {
    let ordered = orient(&baseline.points);
    let midline = Polyline::new(ordered).ok_or_else(|| {
        LaneError::degenerate(
            baseline.id,
            Stage::Build,
            "baseline has fewer than two distinct points",
        )
    })?;
    debug!(
        "intersection::build_arm segment={} start={:?} end={:?}",
        baseline.id,
        midline.first(),
        midline.last()
    );
    Segment::offset_from_midline(
        baseline.id,
        SegmentKind::IntersectionArm,
        midline,
        baseline.half_width,
        params.offset_epsilon,
    )
}

/// Canonical point order for a skeleton extracted in arbitrary order.
///
/// Starts at the point farthest from the centroid (an extremity), chains
/// greedily to the nearest unvisited point, then orients the chain so it
/// runs `+x` when mostly horizontal and `+y` otherwise.
pub fn orient(points: &[[f32; 2]]) -> Vec<[f32; 2]> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let n = points.len() as f32;
    let centroid = points
        .iter()
        .fold([0.0f32, 0.0], |acc, p| [acc[0] + p[0] / n, acc[1] + p[1] / n]);

    let mut remaining: Vec<[f32; 2]> = points.to_vec();
    let start = farthest_index(&remaining, centroid);
    let mut chain = Vec::with_capacity(points.len());
    chain.push(remaining.swap_remove(start));
    while !remaining.is_empty() {
        let cur = chain[chain.len() - 1];
        let next = nearest_index(&remaining, cur);
        chain.push(remaining.remove(next));
    }

    let (first, last) = (chain[0], chain[chain.len() - 1]);
    let theta = direction_deg(first, last);
    let backwards = if is_horizontal_deg(theta) {
        last[0] < first[0]
    } else {
        last[1] < first[1]
    };
    if backwards {
        chain.reverse();
    }
    chain
}

fn farthest_index(points: &[[f32; 2]], from: [f32; 2]) -> usize {
    let mut best = 0;
    let mut best_d = f32::NEG_INFINITY;
    for (i, p) in points.iter().enumerate() {
        let d = dist(*p, from);
        if d > best_d {
            best_d = d;
            best = i;
        }
    }
    best
}

fn nearest_index(points: &[[f32; 2]], from: [f32; 2]) -> usize {
    let mut best = 0;
    let mut best_d = f32::INFINITY;
    for (i, p) in points.iter().enumerate() {
        let d = dist(*p, from);
        if d < best_d {
            best_d = d;
            best = i;
        }
    }
    best
}
