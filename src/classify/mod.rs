//! LineClassifier: run grouping, pattern vote and curve materialization.

pub mod lane;
pub mod line;
pub mod materialize;
pub mod runs;

pub use self::lane::{build_lanes, Lane};
pub use self::line::{categorize_laneline, Line, LineNum};

use crate::error::LaneError;
use crate::params::{ClassifyParams, GeometryParams, LaneParams};
use crate::scan::ColumnScan;
use crate::segments::Segment;
use log::debug;

pub struct LineClassifier {
    classify: ClassifyParams,
    geometry: GeometryParams,
}

impl LineClassifier {
    pub fn new(params: &LaneParams) -> Self {
        Self {
            classify: params.classify.clone(),
            geometry: params.geometry.clone(),
        }
    }

    /// Groups a scan into lines and materializes their curves.
    pub fn classify(&self, segment: &Segment, scan: &ColumnScan) -> Result<Vec<Line>, LaneError> {
        let mut lines = categorize_laneline(segment.id, &scan.lines, &self.classify)?;
        materialize::materialize(segment, scan, &mut lines, self.geometry.curve_points)?;
        debug!(
            "LineClassifier::classify segment={} lines={} patterns={:?}",
            segment.id,
            lines.len(),
            lines.iter().map(|l| l.pattern).collect::<Vec<_>>()
        );
        Ok(lines)
    }
}
