//! Per-column scan result.
use crate::params::ClassifyParams;
use serde::Serialize;

/// Marking pattern of a column or a classified line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkPattern {
    Solid,
    Dashed,
    Dotted,
}

impl MarkPattern {
    /// Pattern of a probe with the given paint fraction.
    ///
    /// `zero_ratio <= solid_max` is solid, the inclusive dotted band is
    /// dotted, anything else dashed. A probe without paint has nothing to
    /// interrupt and reads as solid.
    pub fn classify(zero_ratio: f32, total: u32, params: &ClassifyParams) -> Self {
        if total == 0 || zero_ratio <= params.solid_max_ratio {
            MarkPattern::Solid
        } else if zero_ratio >= params.dotted_min_ratio && zero_ratio <= params.dotted_max_ratio {
            MarkPattern::Dotted
        } else {
            MarkPattern::Dashed
        }
    }

    /// Integer encoding used by the per-line vote.
    pub fn code(self) -> u8 {
        match self {
            MarkPattern::Dashed => 0,
            MarkPattern::Solid => 1,
            MarkPattern::Dotted => 2,
        }
    }
}

/// One accepted column: where it sampled, how much paint it saw.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowLine {
    /// Column index in the rotated canvas.
    pub id: usize,
    /// Probe sample positions (rotated canvas).
    pub points: Vec<[f32; 2]>,
    /// Summed intensity over the probe.
    pub total: u32,
    /// Fraction of background samples, in [0, 1].
    pub zero_ratio: f32,
    pub pattern: MarkPattern,
}

impl WindowLine {
    pub fn new(
        id: usize,
        points: Vec<[f32; 2]>,
        total: u32,
        zero_ratio: f32,
        params: &ClassifyParams,
    ) -> Self {
        let zero_ratio = zero_ratio.clamp(0.0, 1.0);
        Self {
            id,
            points,
            total,
            zero_ratio,
            pattern: MarkPattern::classify(zero_ratio, total, params),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_thresholds() {
        let p = ClassifyParams::default();
        assert_eq!(MarkPattern::classify(0.0, 10, &p), MarkPattern::Solid);
        assert_eq!(MarkPattern::classify(0.28, 10, &p), MarkPattern::Solid);
        assert_eq!(MarkPattern::classify(0.3, 10, &p), MarkPattern::Dashed);
        assert_eq!(MarkPattern::classify(0.4, 10, &p), MarkPattern::Dotted);
        assert_eq!(MarkPattern::classify(0.6, 10, &p), MarkPattern::Dotted);
        assert_eq!(MarkPattern::classify(0.7, 10, &p), MarkPattern::Dashed);
        assert_eq!(MarkPattern::classify(0.9, 0, &p), MarkPattern::Solid);
    }

    #[test]
    fn window_line_clamps_ratio() {
        let w = WindowLine::new(3, vec![], 255, 1.5, &ClassifyParams::default());
        assert_eq!(w.zero_ratio, 1.0);
        assert_eq!(w.pattern, MarkPattern::Dashed);
    }
}
