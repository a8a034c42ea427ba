//! Error taxonomy of the lane pipeline.
//!
//! Only [`LaneError::Configuration`] aborts a road. Geometry and scan errors
//! abort the offending segment and are reported with its id and [`Stage`];
//! clip ambiguities are recorded as flags next to a best-effort result.
use serde::Serialize;

/// Pipeline stage an error was raised in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    Build,
    Scan,
    Classify,
    Overlap,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Build => "build",
            Stage::Scan => "scan",
            Stage::Classify => "classify",
            Stage::Overlap => "overlap",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum LaneError {
    /// Unusable road metadata (unknown type code, missing baselines, count
    /// mismatch). Fatal at pipeline entry.
    Configuration { reason: String },
    /// Degenerate geometry: zero-length offset, self-intersecting boundary,
    /// empty ROI or empty run.
    GeometryDegeneracy {
        segment: usize,
        stage: Stage,
        reason: String,
    },
    /// No scanned column ever registered paint.
    ScanExhaustion { segment: usize, columns: usize },
    /// A pairwise clip produced a disjoint multi-part curve.
    OverlapClipAmbiguity { segment: usize, parts: usize },
}

impl LaneError {
    pub fn configuration(reason: impl Into<String>) -> Self {
        LaneError::Configuration {
            reason: reason.into(),
        }
    }

    pub fn degenerate(segment: usize, stage: Stage, reason: impl Into<String>) -> Self {
        LaneError::GeometryDegeneracy {
            segment,
            stage,
            reason: reason.into(),
        }
    }

    /// Segment the error belongs to, if any.
    pub fn segment(&self) -> Option<usize> {
        match self {
            LaneError::Configuration { .. } => None,
            LaneError::GeometryDegeneracy { segment, .. }
            | LaneError::ScanExhaustion { segment, .. }
            | LaneError::OverlapClipAmbiguity { segment, .. } => Some(*segment),
        }
    }

    pub fn stage(&self) -> Option<Stage> {
        match self {
            LaneError::Configuration { .. } => None,
            LaneError::GeometryDegeneracy { stage, .. } => Some(*stage),
            LaneError::ScanExhaustion { .. } => Some(Stage::Scan),
            LaneError::OverlapClipAmbiguity { .. } => Some(Stage::Overlap),
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, LaneError::Configuration { .. })
    }
}

impl std::fmt::Display for LaneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LaneError::Configuration { reason } => write!(f, "configuration error: {reason}"),
            LaneError::GeometryDegeneracy {
                segment,
                stage,
                reason,
            } => write!(f, "degenerate geometry in segment {segment} ({stage}): {reason}"),
            LaneError::ScanExhaustion { segment, columns } => write!(
                f,
                "segment {segment}: no painted column found ({columns} scanned)"
            ),
            LaneError::OverlapClipAmbiguity { segment, parts } => write!(
                f,
                "segment {segment}: clip produced {parts} disjoint parts, kept the longest"
            ),
        }
    }
}

impl std::error::Error for LaneError {}
