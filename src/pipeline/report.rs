use crate::error::{LaneError, Stage};
use crate::overlap::OverlapFlag;
use crate::roads::RoadKind;
use crate::segments::Segment;
use serde::Serialize;

/// A segment dropped from the report, with the stage that gave up on it.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentFailure {
    pub segment: usize,
    pub stage: Stage,
    pub error: LaneError,
}

impl SegmentFailure {
    /// `fallback` identifies the segment when the error carries no id.
    pub fn from_error(error: LaneError, fallback: usize, stage: Stage) -> Self {
        Self {
            segment: error.segment().unwrap_or(fallback),
            stage: error.stage().unwrap_or(stage),
            error,
        }
    }
}

/// Lane markings found on one road.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneReport {
    pub kind: RoadKind,
    /// Segments that completed, in build order, with their lines attached.
    pub segments: Vec<Segment>,
    pub failures: Vec<SegmentFailure>,
    /// Curves the overlap resolver could only approximate.
    pub overlap_flags: Vec<OverlapFlag>,
}

impl LaneReport {
    pub fn line_count(&self) -> usize {
        self.segments.iter().map(|s| s.lines.len()).sum()
    }

    pub fn segment(&self, id: usize) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    pub fn is_approximate(&self) -> bool {
        !self.overlap_flags.is_empty()
    }
}
