//! Lanes between neighbouring markings.
//!
//! Each pair of consecutive materialized lines bounds one lane. Its midline
//! pairs the two curves point by point at equal arc-length fractions.
use super::Line;
use crate::geometry::polyline::dist;
use crate::geometry::Polyline;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lane {
    /// Index of the bounding lines in `Segment::lines`.
    pub left_line: usize,
    pub right_line: usize,
    pub left: Polyline,
    pub right: Polyline,
    pub mid: Polyline,
    /// Mean distance between paired points of the two curves.
    pub width: f32,
}

impl Lane {
    /// `None` when the curves are too short to pair.
    pub fn between(
        left_line: usize,
        left: &Polyline,
        right_line: usize,
        right: &Polyline,
    ) -> Option<Self> {
        let n = left.len().max(right.len());
        let (l, r) = (left.resample(n), right.resample(n));
        let pairs: Vec<([f32; 2], [f32; 2])> = l
            .points()
            .iter()
            .copied()
            .zip(r.points().iter().copied())
            .collect();
        if pairs.is_empty() {
            return None;
        }
        let width = pairs.iter().map(|&(a, b)| dist(a, b)).sum::<f32>() / pairs.len() as f32;
        let mid = Polyline::new(
            pairs
                .iter()
                .map(|&(a, b)| [(a[0] + b[0]) * 0.5, (a[1] + b[1]) * 0.5])
                .collect(),
        )?;
        Some(Self {
            left_line,
            right_line,
            left: left.clone(),
            right: right.clone(),
            mid,
            width,
        })
    }
}

/// One lane per pair of consecutive lines carrying a curve.
pub fn build_lanes(lines: &[Line]) -> Vec<Lane> {
    let curves: Vec<(usize, &Polyline)> = lines
        .iter()
        .enumerate()
        .filter_map(|(i, l)| l.curve.as_ref().map(|c| (i, c)))
        .collect();
    curves
        .windows(2)
        .filter_map(|w| Lane::between(w[0].0, w[0].1, w[1].0, w[1].1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::LineNum;
    use crate::scan::MarkPattern;

    fn line(curve: Option<Vec<[f32; 2]>>) -> Line {
        Line {
            keys: vec![0],
            num: LineNum::Single,
            pattern: MarkPattern::Solid,
            peak: 0,
            curve: curve.and_then(Polyline::new),
        }
    }

    #[test]
    fn lane_mid_and_width_between_parallel_curves() {
        let left = Polyline::new(vec![[10.0, 0.0], [10.0, 30.0]]).unwrap();
        let right = Polyline::new(vec![
            [20.0, 0.0],
            [20.0, 10.0],
            [20.0, 20.0],
            [20.0, 30.0],
        ])
        .unwrap();
        let lane = Lane::between(0, &left, 1, &right).unwrap();
        assert_eq!(lane.mid.len(), 4);
        assert!(lane.mid.points().iter().all(|p| (p[0] - 15.0).abs() < 1e-4));
        assert!((lane.mid.length() - 30.0).abs() < 1e-3);
        assert!((lane.width - 10.0).abs() < 1e-4);
    }

    #[test]
    fn lanes_skip_lines_without_curves() {
        let lines = vec![
            line(Some(vec![[0.0, 0.0], [0.0, 40.0]])),
            line(None),
            line(Some(vec![[12.0, 0.0], [12.0, 40.0]])),
            line(Some(vec![[20.0, 0.0], [20.0, 40.0]])),
        ];
        let lanes = build_lanes(&lines);
        assert_eq!(lanes.len(), 2);
        assert_eq!((lanes[0].left_line, lanes[0].right_line), (0, 2));
        assert_eq!((lanes[1].left_line, lanes[1].right_line), (2, 3));
        assert!((lanes[0].width - 12.0).abs() < 1e-4);
        assert!((lanes[1].width - 8.0).abs() < 1e-4);
        assert!(build_lanes(&lines[..1]).is_empty());
    }
}
