use crate::classify::{Line, LineNum};
use crate::error::LaneError;
use crate::scan::{ColumnScan, MarkPattern, WindowLine};
use crate::segments::SegmentKind;
use serde::Serialize;

/// Compact view of one accepted scan column.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSample {
    pub id: usize,
    pub total: u32,
    pub zero_ratio: f32,
    pub pattern: MarkPattern,
}

impl From<&WindowLine> for ColumnSample {
    fn from(w: &WindowLine) -> Self {
        Self {
            id: w.id,
            total: w.total,
            zero_ratio: w.zero_ratio,
            pattern: w.pattern,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSummary {
    pub peak: usize,
    pub run_width: usize,
    pub num: LineNum,
    pub pattern: MarkPattern,
}

impl From<&Line> for LineSummary {
    fn from(l: &Line) -> Self {
        Self {
            peak: l.peak,
            run_width: l.run_width(),
            num: l.num,
            pattern: l.pattern,
        }
    }
}

/// What the scan and classification stages saw for one segment.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentTrace {
    pub segment: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<SegmentKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle: Option<f32>,
    pub columns_scanned: usize,
    pub first_column: usize,
    pub fix_column: usize,
    pub starting_color_index: usize,
    pub columns: Vec<ColumnSample>,
    pub lines: Vec<LineSummary>,
    pub scan_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<LaneError>,
}

impl SegmentTrace {
    pub fn from_scan(kind: SegmentKind, scan: &ColumnScan, lines: &[Line]) -> Self {
        Self {
            segment: scan.segment,
            kind: Some(kind),
            angle: Some(scan.frame.angle_deg),
            columns_scanned: scan.columns_scanned,
            first_column: scan.first_column,
            fix_column: scan.fix_column,
            starting_color_index: scan.starting_color_index,
            columns: scan.lines.values().map(ColumnSample::from).collect(),
            lines: lines.iter().map(LineSummary::from).collect(),
            scan_ms: scan.elapsed_ms,
            failure: None,
        }
    }

    /// Trace of a segment that never produced a usable scan.
    pub fn failed(segment: usize, kind: Option<SegmentKind>, error: LaneError) -> Self {
        Self {
            segment,
            kind,
            angle: None,
            columns_scanned: 0,
            first_column: 0,
            fix_column: 0,
            starting_color_index: 0,
            columns: Vec::new(),
            lines: Vec::new(),
            scan_ms: 0.0,
            failure: Some(error),
        }
    }
}
