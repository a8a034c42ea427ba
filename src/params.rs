//! Parameter types configuring the lane pipeline stages.
//!
//! Every threshold the pipeline uses lives here so it can be tuned from a
//! JSON file (see [`crate::config`]) and exercised in tests. Defaults are the
//! reference values the detector was calibrated with on hand-drawn sketches.

use serde::{Deserialize, Serialize};

/// Pipeline-wide parameters grouped per stage.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LaneParams {
    pub geometry: GeometryParams,
    pub scan: ScanParams,
    pub classify: ClassifyParams,
    pub road: RoadParams,
    pub parallel: ParallelOptions,
}

/// Segment construction and curve materialization.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeometryParams {
    /// Added to the half-width before rounding up the boundary offset.
    pub offset_epsilon: f32,
    /// Points per materialized lane-marking curve.
    pub curve_points: usize,
    /// A parallel-road baseline spanning less than this fraction of the image
    /// is extended by quadratic extrapolation first.
    pub extrapolation_trigger: f32,
    /// Sample spacing (px) of an extrapolated baseline.
    pub extrapolation_step: f32,
}

impl Default for GeometryParams {
    fn default() -> Self {
        Self {
            offset_epsilon: 1e-3,
            curve_points: 10,
            extrapolation_trigger: 0.6,
            extrapolation_step: 4.0,
        }
    }
}

/// Column scanning.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScanParams {
    /// Snap tolerance (degrees) of the scan rotation to quarter turns.
    pub snap_tolerance_deg: f32,
    /// Samples per column probe.
    pub num_points: usize,
    /// DBSCAN radius for probe outlier rejection; `<= 0` disables it.
    pub outlier_threshold: f32,
    /// DBSCAN core-point neighbourhood size.
    pub outlier_min_samples: usize,
    /// Spacing (px) of probe samples along the rotated midline.
    pub sample_step: f32,
    /// Zero-ratio at or above which a column counts as background.
    pub background_ratio: f32,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            snap_tolerance_deg: 1.0,
            num_points: 12,
            outlier_threshold: 0.0,
            outlier_min_samples: 3,
            sample_step: 1.0,
            background_ratio: 0.8,
        }
    }
}

/// Per-column pattern thresholds and run grouping.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClassifyParams {
    /// Zero-ratio at or below which a column is solid paint.
    pub solid_max_ratio: f32,
    /// Inclusive zero-ratio band classified as dotted.
    pub dotted_min_ratio: f32,
    pub dotted_max_ratio: f32,
    /// Largest id gap still joining two columns into one run.
    pub run_gap: usize,
    /// `thickness / run_width` above this means a single line.
    pub double_ratio: f32,
    /// Runs narrower than this are always single.
    pub min_double_width: usize,
}

impl Default for ClassifyParams {
    fn default() -> Self {
        Self {
            solid_max_ratio: 0.28,
            dotted_min_ratio: 0.4,
            dotted_max_ratio: 0.6,
            run_gap: 2,
            double_ratio: 1.5,
            min_double_width: 4,
        }
    }
}

/// Road topology refinement.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoadParams {
    /// Baselines within this many degrees of parallel (or anti-parallel) are
    /// merged into a parallel road.
    pub parallel_tolerance_deg: f32,
    /// Run the intersection→parallel reclassification pre-pass.
    pub refine_intersections: bool,
}

impl Default for RoadParams {
    fn default() -> Self {
        Self {
            parallel_tolerance_deg: 5.0,
            refine_intersections: true,
        }
    }
}

/// Runtime toggle for the `parallel` feature's worker fan-out.
///
/// Without the feature every stage runs sequentially and these are ignored.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParallelOptions {
    pub enabled: bool,
    /// Fewest remaining columns worth sharding across workers.
    pub min_columns: usize,
    /// Fewest segments worth scanning concurrently.
    pub min_segments: usize,
}

impl ParallelOptions {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn columns(&self, count: usize) -> bool {
        self.enabled && count >= self.min_columns.max(1)
    }

    pub fn segments(&self, count: usize) -> bool {
        self.enabled && count >= self.min_segments.max(1)
    }
}

impl Default for ParallelOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            min_columns: 64,
            min_segments: 2,
        }
    }
}
