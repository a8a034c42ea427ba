#![doc = include_str!("../README.md")]

// Entry points
pub mod batch;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod params;
pub mod pipeline;

// Stages
pub mod classify;
pub mod overlap;
pub mod roads;
pub mod scan;
pub mod segments;

// Shared building blocks
pub mod angle;
pub mod geometry;
pub mod image;

// --- High-level re-exports -------------------------------------------------

pub use crate::batch::{run_batch, BatchCase, BatchSummary, CaseOutcome};
pub use crate::config::{load_config, ConfigError};
pub use crate::diagnostics::{LaneDiagnostics, PipelineTrace};
pub use crate::error::{LaneError, Stage};
pub use crate::params::LaneParams;
pub use crate::pipeline::{LanePipeline, LaneReport, SegmentFailure};
pub use crate::roads::{RoadInput, RoadKind};

// --- Prelude ---------------------------------------------------------------

/// Everything needed to run the pipeline on one road.
pub mod prelude {
    pub use crate::classify::{Lane, Line, LineNum};
    pub use crate::image::ImageU8;
    pub use crate::scan::MarkPattern;
    pub use crate::segments::{Segment, SegmentKind};
    pub use crate::{LaneError, LaneParams, LanePipeline, LaneReport, RoadInput, RoadKind};
}

// --- Stage-level API (for tools that drive stages one by one) --------------

pub mod stages {
    pub use crate::classify::{categorize_laneline, LineClassifier};
    pub use crate::overlap::{CurveBundle, OverlapOutcome, OverlapResolver};
    pub use crate::roads::{refine_roadlanes, RoadClassifier, RoadLayout};
    pub use crate::scan::{ColumnScan, LineScanner, WindowLine};
}
