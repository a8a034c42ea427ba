//! Turns classified lines into curves in image coordinates.
//!
//! Work happens in the scan canvas, where the road runs down `+y` and column
//! ids are `x` positions, then every curve is mapped back through the scan
//! frame.
use super::Line;
use crate::error::{LaneError, Stage};
use crate::geometry::Polyline;
use crate::scan::ColumnScan;
use crate::segments::{Segment, SegmentKind};
use log::debug;

pub fn materialize(
    segment: &Segment,
    scan: &ColumnScan,
    lines: &mut [Line],
    curve_points: usize,
) -> Result<(), LaneError> {
    let Some(first_peak) = lines.first().map(|l| l.peak) else {
        return Ok(());
    };
    let frame = &scan.frame;

    match segment.kind {
        SegmentKind::Parallel => {
            for line in lines.iter_mut() {
                let rotated = scan
                    .rotated_midline
                    .translate_to([line.peak as f32 + 0.5, scan.origin_y + 0.5])
                    .resample(curve_points);
                line.curve = Some(rotated.map(|q| frame.to_image(q)));
            }
        }
        SegmentKind::Linear | SegmentKind::IntersectionArm => {
            let source = nearer_boundary(segment, scan)
                .ok_or_else(|| {
                    LaneError::degenerate(
                        segment.id,
                        Stage::Classify,
                        "boundary collapsed in scan frame",
                    )
                })?
                .resample(curve_points);
            for line in lines.iter_mut() {
                // Columns grow along +x, the right-hand side of a +y curve.
                let offset = line.peak as f32 - first_peak as f32;
                let rotated = source.shift_right(offset);
                line.curve = Some(rotated.map(|q| frame.to_image(q)));
            }
        }
    }
    debug!(
        "materialize segment={} kind={:?} lines={} points={}",
        segment.id,
        segment.kind,
        lines.len(),
        curve_points
    );
    Ok(())
}

/// The boundary closer to the canvas' left edge, in canvas coordinates.
fn nearer_boundary(segment: &Segment, scan: &ColumnScan) -> Option<Polyline> {
    let to_canvas = |b: &Polyline| {
        Polyline::new(
            b.points()
                .iter()
                .map(|&p| scan.frame.to_rotated(p))
                .collect(),
        )
    };
    let left = to_canvas(&segment.left_boundary)?;
    let right = to_canvas(&segment.right_boundary)?;
    if mean_x(&right) < mean_x(&left) {
        Some(right)
    } else {
        Some(left)
    }
}

fn mean_x(pl: &Polyline) -> f32 {
    pl.points().iter().map(|p| p[0]).sum::<f32>() / pl.len() as f32
}
