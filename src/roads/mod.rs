//! Road topology: input metadata, baselines and dispatch to segment builders.
//!
//! A road arrives as a type code plus one skeleton polyline per baseline.
//! [`RoadClassifier`] validates it, optionally collapses an intersection whose
//! baselines all run side by side into a parallel road, and returns a
//! [`RoadLayout`] that knows how to build its segments.

pub mod refine;

use crate::error::LaneError;
use crate::geometry::{polyline::dist, Polyline};
use crate::params::{GeometryParams, RoadParams};
use crate::segments::{self, Segment};
use log::debug;
use serde::{Deserialize, Serialize};

pub use self::refine::refine_roadlanes;

/// Recognized road topologies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RoadKind {
    /// Straight or curved single road.
    Linear,
    /// Several arms meeting at a junction.
    Intersection,
    /// Two lanes sharing one baseline across the image.
    Parallel,
}

impl TryFrom<i32> for RoadKind {
    type Error = LaneError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(RoadKind::Linear),
            1 => Ok(RoadKind::Intersection),
            2 => Ok(RoadKind::Parallel),
            other => Err(LaneError::configuration(format!(
                "unknown road type code {other}"
            ))),
        }
    }
}

/// Road metadata handed over by the sketch parser.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoadInput {
    /// 0 = linear, 1 = intersection, 2 = parallel.
    pub road_type: i32,
    /// Skeleton polyline per baseline.
    pub roads: Vec<Vec<[f32; 2]>>,
    /// Half road width per baseline (px).
    pub half_widths: Vec<f32>,
    /// Optional nominal length per baseline; empty when unknown.
    pub lengths: Vec<f32>,
}

impl RoadInput {
    pub fn new(road_type: i32, roads: Vec<Vec<[f32; 2]>>, half_widths: Vec<f32>) -> Self {
        Self {
            road_type,
            roads,
            half_widths,
            lengths: Vec::new(),
        }
    }
}

/// One road centerline before its width is applied.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Baseline {
    pub id: usize,
    pub points: Vec<[f32; 2]>,
    pub half_width: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<f32>,
}

impl Baseline {
    /// `last - first`, `None` for fewer than two points.
    pub fn endpoint_vector(&self) -> Option<[f32; 2]> {
        match (self.points.first(), self.points.last()) {
            (Some(a), Some(b)) if self.points.len() >= 2 => Some([b[0] - a[0], b[1] - a[1]]),
            _ => None,
        }
    }

    pub fn arc_length(&self) -> f32 {
        self.points.windows(2).map(|w| dist(w[0], w[1])).sum()
    }

    /// Nominal length when known, arc length otherwise.
    pub fn effective_length(&self) -> f32 {
        self.length.unwrap_or_else(|| self.arc_length())
    }

    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    pub fn polyline(&self) -> Option<Polyline> {
        Polyline::new(self.points.clone())
    }
}

/// Validated road ready for segment construction.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "baselines")]
pub enum RoadLayout {
    Linear(Baseline),
    Intersection(Vec<Baseline>),
    Parallel(Baseline),
}

impl RoadLayout {
    pub fn kind(&self) -> RoadKind {
        match self {
            RoadLayout::Linear(_) => RoadKind::Linear,
            RoadLayout::Intersection(_) => RoadKind::Intersection,
            RoadLayout::Parallel(_) => RoadKind::Parallel,
        }
    }

    pub fn baseline_count(&self) -> usize {
        match self {
            RoadLayout::Linear(_) | RoadLayout::Parallel(_) => 1,
            RoadLayout::Intersection(b) => b.len(),
        }
    }

    /// Builds every segment of the road. Each entry fails independently.
    pub fn build_segments(
        &self,
        params: &GeometryParams,
        dims: (usize, usize),
    ) -> Vec<Result<Segment, LaneError>> {
        match self {
            RoadLayout::Linear(b) => vec![segments::linear::build(b, params)],
            RoadLayout::Intersection(bs) => segments::intersection::build_arms(bs, params),
            RoadLayout::Parallel(b) => vec![segments::parallel::build(b, params, dims)],
        }
    }
}

/// Validates road metadata and dispatches it to the matching builder.
#[derive(Clone, Debug, Default)]
pub struct RoadClassifier {
    params: RoadParams,
}

impl RoadClassifier {
    pub fn new(params: RoadParams) -> Self {
        Self { params }
    }

    pub fn classify(&self, input: &RoadInput) -> Result<RoadLayout, LaneError> {
        let kind = RoadKind::try_from(input.road_type)?;
        let mut baselines = collect_baselines(input)?;

        let layout = match kind {
            RoadKind::Linear => {
                if baselines.len() != 1 {
                    return Err(LaneError::configuration(format!(
                        "linear road expects one baseline, got {}",
                        baselines.len()
                    )));
                }
                RoadLayout::Linear(baselines.remove(0))
            }
            RoadKind::Parallel => RoadLayout::Parallel(refine::representative(baselines)),
            RoadKind::Intersection => {
                if self.params.refine_intersections && baselines.len() >= 2 {
                    refine_roadlanes(baselines, self.params.parallel_tolerance_deg)
                } else {
                    RoadLayout::Intersection(baselines)
                }
            }
        };
        debug!(
            "RoadClassifier::classify code={} -> {:?} ({} baselines)",
            input.road_type,
            layout.kind(),
            layout.baseline_count()
        );
        Ok(layout)
    }
}

fn collect_baselines(input: &RoadInput) -> Result<Vec<Baseline>, LaneError> {
    if input.roads.is_empty() {
        return Err(LaneError::configuration("road has no baselines"));
    }
    if input.half_widths.len() != input.roads.len() {
        return Err(LaneError::configuration(format!(
            "{} baselines but {} half-widths",
            input.roads.len(),
            input.half_widths.len()
        )));
    }
    if !input.lengths.is_empty() && input.lengths.len() != input.roads.len() {
        return Err(LaneError::configuration(format!(
            "{} baselines but {} lengths",
            input.roads.len(),
            input.lengths.len()
        )));
    }
    Ok(input
        .roads
        .iter()
        .zip(&input.half_widths)
        .enumerate()
        .map(|(id, (points, &half_width))| Baseline {
            id,
            points: points.clone(),
            half_width,
            length: input.lengths.get(id).copied(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight(x: f32) -> Vec<[f32; 2]> {
        vec![[x, 0.0], [x, 50.0], [x, 100.0]]
    }

    #[test]
    fn unknown_code_is_configuration_error() {
        let input = RoadInput::new(5, vec![straight(10.0)], vec![5.0]);
        let err = RoadClassifier::default().classify(&input).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn width_count_mismatch_is_rejected() {
        let input = RoadInput::new(1, vec![straight(10.0), straight(40.0)], vec![5.0]);
        assert!(RoadClassifier::default().classify(&input).is_err());
    }

    #[test]
    fn linear_road_dispatches_to_linear_layout() {
        let input = RoadInput::new(0, vec![straight(10.0)], vec![5.0]);
        let layout = RoadClassifier::default().classify(&input).unwrap();
        assert_eq!(layout.kind(), RoadKind::Linear);
    }

    #[test]
    fn crossing_intersection_stays_intersection() {
        let input = RoadInput::new(
            1,
            vec![vec![[0.0, 50.0], [100.0, 50.0]], straight(50.0)],
            vec![8.0, 8.0],
        );
        let layout = RoadClassifier::default().classify(&input).unwrap();
        assert_eq!(layout.kind(), RoadKind::Intersection);
        assert_eq!(layout.baseline_count(), 2);
    }
}
