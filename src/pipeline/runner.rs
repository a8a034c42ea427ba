use super::{LaneReport, SegmentFailure};
use crate::classify::LineClassifier;
use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::{
    InputDescriptor, LaneDiagnostics, OverlapStage, PipelineTrace, RoadStage, SegmentTrace,
    TimingBreakdown,
};
use crate::error::{LaneError, Stage};
use crate::image::ImageU8;
use crate::overlap::{CurveBundle, OverlapResolver};
use crate::params::LaneParams;
use crate::roads::{RoadClassifier, RoadInput, RoadKind};
use crate::scan::LineScanner;
use crate::segments::Segment;
use log::{debug, warn};
use std::time::Instant;

/// Outcome of scanning and classifying one segment.
struct Analyzed {
    trace: SegmentTrace,
    result: Result<Segment, SegmentFailure>,
}

pub struct LanePipeline {
    params: LaneParams,
    classifier: RoadClassifier,
    scanner: LineScanner,
    lines: LineClassifier,
    resolver: OverlapResolver,
}

impl Default for LanePipeline {
    fn default() -> Self {
        Self::new(LaneParams::default())
    }
}

impl LanePipeline {
    pub fn new(params: LaneParams) -> Self {
        Self {
            classifier: RoadClassifier::new(params.road.clone()),
            scanner: LineScanner::new(&params),
            lines: LineClassifier::new(&params),
            resolver: OverlapResolver::new(),
            params,
        }
    }

    pub fn params(&self) -> &LaneParams {
        &self.params
    }

    /// Detects the lane markings of one road. Only configuration errors are
    /// returned as `Err`; segment failures are listed in the report.
    pub fn process(&self, input: &RoadInput, raster: ImageU8<'_>) -> Result<LaneReport, LaneError> {
        self.process_with_diagnostics(input, raster)
            .map(|diag| diag.report)
    }

    pub fn process_with_diagnostics(
        &self,
        input: &RoadInput,
        raster: ImageU8<'_>,
    ) -> Result<LaneDiagnostics, LaneError> {
        let total_start = Instant::now();
        debug!(
            "LanePipeline::process start w={} h={} road_type={} baselines={}",
            raster.w,
            raster.h,
            input.road_type,
            input.roads.len()
        );
        check_raster(&raster)?;
        let mut timings = TimingBreakdown::default();

        let classify_start = Instant::now();
        let layout = self.classifier.classify(input)?;
        timings.push_since("classify", classify_start);

        let build_start = Instant::now();
        let mut failures = Vec::new();
        let mut traces = Vec::new();
        let mut built = Vec::new();
        for (idx, res) in layout
            .build_segments(&self.params.geometry, (raster.w, raster.h))
            .into_iter()
            .enumerate()
        {
            match res {
                Ok(segment) => built.push(segment),
                Err(err) => {
                    warn!("LanePipeline: segment {} dropped while building: {}", idx, err);
                    let failure = SegmentFailure::from_error(err, idx, Stage::Build);
                    traces.push(SegmentTrace::failed(failure.segment, None, failure.error.clone()));
                    failures.push(failure);
                }
            }
        }
        let segments_built = built.len();
        timings.push_since("build", build_start);
        let road = RoadStage {
            kind: layout.kind(),
            baselines: layout.baseline_count(),
            segments_built,
            elapsed_ms: elapsed_ms(classify_start),
        };

        let scan_start = Instant::now();
        let mut segments = Vec::with_capacity(built.len());
        for analyzed in self.analyze_all(built, &raster) {
            traces.push(analyzed.trace);
            match analyzed.result {
                Ok(segment) => segments.push(segment),
                Err(failure) => {
                    warn!(
                        "LanePipeline: segment {} failed at {}: {}",
                        failure.segment, failure.stage, failure.error
                    );
                    failures.push(failure);
                }
            }
        }
        traces.sort_by_key(|t| t.segment);
        timings.push_since("scan", scan_start);

        let mut overlap = None;
        let mut overlap_flags = Vec::new();
        if layout.kind() == RoadKind::Intersection && segments.len() >= 2 {
            let overlap_start = Instant::now();
            let bundles: Vec<CurveBundle> = segments.iter().map(CurveBundle::from_segment).collect();
            let outcome = self.resolver.resolve(&bundles);
            for (segment, bundle) in segments.iter_mut().zip(&outcome.bundles) {
                bundle.apply_to(segment);
            }
            overlap_flags = outcome.flags.clone();
            overlap = Some(OverlapStage {
                bundles: bundles.len(),
                clipped_pairs: outcome.clipped_pairs,
                flags: outcome.flags,
                elapsed_ms: outcome.elapsed_ms,
            });
            timings.push_since("overlap", overlap_start);
        }

        timings.total_ms = elapsed_ms(total_start);
        let report = LaneReport {
            kind: layout.kind(),
            segments,
            failures,
            overlap_flags,
        };
        debug!(
            "LanePipeline::process done kind={:?} segments={} lines={} failures={} total={:.3}ms",
            report.kind,
            report.segments.len(),
            report.line_count(),
            report.failures.len(),
            timings.total_ms
        );
        let trace = PipelineTrace {
            input: InputDescriptor {
                width: raster.w,
                height: raster.h,
                road_type: input.road_type,
                baselines: input.roads.len(),
            },
            road,
            segments: traces,
            overlap,
            timings,
        };
        Ok(LaneDiagnostics { report, trace })
    }

    fn analyze_all(&self, segments: Vec<Segment>, raster: &ImageU8<'_>) -> Vec<Analyzed> {
        if self.params.parallel.segments(segments.len()) {
            #[cfg(feature = "parallel")]
            {
                use rayon::prelude::*;
                return segments
                    .into_par_iter()
                    .map(|segment| self.analyze(segment, raster))
                    .collect();
            }
        }
        segments
            .into_iter()
            .map(|segment| self.analyze(segment, raster))
            .collect()
    }

    fn analyze(&self, mut segment: Segment, raster: &ImageU8<'_>) -> Analyzed {
        let (id, kind) = (segment.id, segment.kind);
        let scan = match self.scanner.search_laneline(&segment, raster) {
            Ok(scan) => scan,
            Err(err) => {
                let failure = SegmentFailure::from_error(err, id, Stage::Scan);
                return Analyzed {
                    trace: SegmentTrace::failed(id, Some(kind), failure.error.clone()),
                    result: Err(failure),
                };
            }
        };
        match self.lines.classify(&segment, &scan) {
            Ok(lines) => {
                let trace = SegmentTrace::from_scan(kind, &scan, &lines);
                segment.attach_lines(scan.frame.angle_deg, lines);
                Analyzed {
                    trace,
                    result: Ok(segment),
                }
            }
            Err(err) => {
                let failure = SegmentFailure::from_error(err, id, Stage::Classify);
                let mut trace = SegmentTrace::from_scan(kind, &scan, &[]);
                trace.failure = Some(failure.error.clone());
                Analyzed {
                    trace,
                    result: Err(failure),
                }
            }
        }
    }
}

fn check_raster(raster: &ImageU8<'_>) -> Result<(), LaneError> {
    let needed = match raster.h {
        0 => 0,
        h => raster.stride * (h - 1) + raster.w,
    };
    if raster.w == 0 || raster.h == 0 || raster.stride < raster.w || raster.data.len() < needed {
        return Err(LaneError::configuration(format!(
            "raster of {} bytes does not hold {}x{} pixels (stride {})",
            raster.data.len(),
            raster.w,
            raster.h,
            raster.stride
        )));
    }
    Ok(())
}
