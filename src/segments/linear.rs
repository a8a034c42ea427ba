//! Single straight or curved road.
use super::{baseline_polyline, Segment, SegmentKind};
use crate::error::LaneError;
use crate::params::GeometryParams;
use crate::roads::Baseline;
use log::debug;

pub fn build(baseline: &Baseline, params: &GeometryParams) -> Result<Segment, LaneError> {
    let midline = baseline_polyline(baseline)?;
    let seg = Segment::offset_from_midline(
        baseline.id,
        SegmentKind::Linear,
        midline,
        baseline.half_width,
        params.offset_epsilon,
    )?;
    debug!(
        "linear::build segment={} points={} width={:.1}",
        seg.id,
        seg.midline.len(),
        seg.width
    );
    Ok(seg)
}
