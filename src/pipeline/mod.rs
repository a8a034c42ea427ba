//! Road-level orchestration.
//!
//! [`LanePipeline`] runs the stages in order:
//! - `RoadClassifier` validates the road metadata and picks a layout. This is
//!   the only stage whose failure aborts the road.
//! - The layout builds its segments. Each one is built independently and a
//!   degenerate segment is recorded as a [`SegmentFailure`].
//! - Every segment is scanned and classified on its own (fanned out with
//!   rayon under the `parallel` feature, results kept in segment order).
//! - Intersections with at least two surviving arms go through the
//!   `OverlapResolver` and the clipped line curves are written back.

mod report;
mod runner;

pub use report::{LaneReport, SegmentFailure};
pub use runner::LanePipeline;
