//! Diagnostics data model returned next to the lane report.
//!
//! [`LaneDiagnostics`] is the entry point: the [`LaneReport`](crate::pipeline::LaneReport)
//! plus a [`PipelineTrace`] describing what every stage saw. All types
//! serialize to camelCase JSON.

pub mod segments;
pub mod trace;
pub mod timing;

pub use segments::{ColumnSample, LineSummary, SegmentTrace};
pub use timing::{StageTiming, TimingBreakdown};
pub use trace::{InputDescriptor, LaneDiagnostics, OverlapStage, PipelineTrace, RoadStage};
