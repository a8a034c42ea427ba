//! Runs the pipeline over many accident cases.
//!
//! A case that fails (bad metadata, a raster too small for its dimensions) is
//! recorded with its reason and the batch moves on to the next one.
use crate::error::LaneError;
use crate::image::ImageU8;
use crate::pipeline::{LanePipeline, LaneReport};
use crate::roads::RoadInput;
use log::{debug, warn};
use serde::Serialize;

/// One named road with its owned binary raster (row-major, `width * height`).
#[derive(Clone, Debug)]
pub struct BatchCase {
    pub name: String,
    pub input: RoadInput,
    pub width: usize,
    pub height: usize,
    pub raster: Vec<u8>,
}

impl BatchCase {
    pub fn new(
        name: impl Into<String>,
        input: RoadInput,
        width: usize,
        height: usize,
        raster: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            input,
            width,
            height,
            raster,
        }
    }

    pub fn view(&self) -> ImageU8<'_> {
        ImageU8::new(self.width, self.height, &self.raster)
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseOutcome {
    pub name: String,
    pub result: Result<LaneReport, LaneError>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub outcomes: Vec<CaseOutcome>,
}

impl BatchSummary {
    pub fn succeeded(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    /// Name and reason of every failed case.
    pub fn failure_reasons(&self) -> Vec<(&str, String)> {
        self.failed()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.name.as_str(), e.to_string())))
            .collect()
    }
}

pub fn run_batch<I>(pipeline: &LanePipeline, cases: I) -> BatchSummary
where
    I: IntoIterator<Item = BatchCase>,
{
    let mut summary = BatchSummary::default();
    for case in cases {
        let result = pipeline.process(&case.input, case.view());
        match &result {
            Ok(report) => debug!(
                "run_batch case={} segments={} lines={} failures={}",
                case.name,
                report.segments.len(),
                report.line_count(),
                report.failures.len()
            ),
            Err(err) => warn!("run_batch: case {} failed: {}", case.name, err),
        }
        summary.outcomes.push(CaseOutcome {
            name: case.name,
            result,
        });
    }
    debug!(
        "run_batch done cases={} failed={}",
        summary.outcomes.len(),
        summary.failed().count()
    );
    summary
}
