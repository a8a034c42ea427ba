use super::{SegmentTrace, TimingBreakdown};
use crate::overlap::OverlapFlag;
use crate::pipeline::LaneReport;
use crate::roads::RoadKind;
use serde::Serialize;

/// Result produced by [`LanePipeline::process_with_diagnostics`](crate::LanePipeline).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneDiagnostics {
    pub report: LaneReport,
    pub trace: PipelineTrace,
}

/// End-to-end trace of one road run.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTrace {
    pub input: InputDescriptor,
    pub road: RoadStage,
    pub segments: Vec<SegmentTrace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlap: Option<OverlapStage>,
    pub timings: TimingBreakdown,
}

impl PipelineTrace {
    /// Segment traces that ended in an error.
    pub fn failed_segments(&self) -> impl Iterator<Item = &SegmentTrace> {
        self.segments.iter().filter(|s| s.failure.is_some())
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
    pub road_type: i32,
    pub baselines: usize,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadStage {
    pub kind: RoadKind,
    /// Baselines left after the classifier (after collapsing parallel
    /// intersection arms).
    pub baselines: usize,
    pub segments_built: usize,
    pub elapsed_ms: f64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapStage {
    pub bundles: usize,
    pub clipped_pairs: usize,
    pub flags: Vec<OverlapFlag>,
    pub elapsed_ms: f64,
}
