//! Classified lane markings.
use super::runs::group_runs;
use crate::error::{LaneError, Stage};
use crate::geometry::Polyline;
use crate::params::ClassifyParams;
use crate::scan::{MarkPattern, WindowLine};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LineNum {
    Single,
    Double,
}

/// One physical marking: a run of neighbouring columns.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    /// Column ids of the run, ascending.
    pub keys: Vec<usize>,
    pub num: LineNum,
    pub pattern: MarkPattern,
    /// Representative column: the positional middle of `keys`.
    pub peak: usize,
    /// Marking curve in image coordinates, once materialized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curve: Option<Polyline>,
}

impl Line {
    pub fn run_width(&self) -> usize {
        self.keys.len()
    }
}

/// Majority vote over member patterns.
///
/// Codes are averaged (dashed 0, solid 1, dotted 2): an all-dotted run is
/// dotted, a mean of at least 2/3 is solid, anything lower dashed.
pub fn vote_pattern<'a, I>(members: I) -> MarkPattern
where
    I: IntoIterator<Item = &'a WindowLine>,
{
    let (sum, count) = members
        .into_iter()
        .fold((0u32, 0u32), |(s, c), w| (s + w.pattern.code() as u32, c + 1));
    if count == 0 {
        return MarkPattern::Solid;
    }
    if sum == 2 * count {
        MarkPattern::Dotted
    } else if 3 * sum >= 2 * count {
        MarkPattern::Solid
    } else {
        MarkPattern::Dashed
    }
}

/// SINGLE below `min_double_width` columns, otherwise SINGLE when the widest
/// run dwarfs this one by more than `double_ratio`, else DOUBLE.
pub fn classify_num(run_width: usize, thickness: usize, params: &ClassifyParams) -> LineNum {
    if run_width < params.min_double_width {
        return LineNum::Single;
    }
    if thickness as f32 / run_width as f32 > params.double_ratio {
        LineNum::Single
    } else {
        LineNum::Double
    }
}

/// Groups scanned columns into lines, ordered left to right in the scan
/// frame. The first and last lines are the road's outer boundaries.
pub fn categorize_laneline(
    segment: usize,
    columns: &BTreeMap<usize, WindowLine>,
    params: &ClassifyParams,
) -> Result<Vec<Line>, LaneError> {
    let ids: Vec<usize> = columns.keys().copied().collect();
    let runs = group_runs(&ids, params.run_gap);
    if runs.is_empty() {
        return Err(LaneError::degenerate(segment, Stage::Classify, "no scanned columns"));
    }
    let thickness = runs.iter().map(Vec::len).max().unwrap_or(0);

    let lines = runs
        .into_iter()
        .map(|keys| {
            let pattern = vote_pattern(keys.iter().filter_map(|k| columns.get(k)));
            let num = classify_num(keys.len(), thickness, params);
            let peak = keys[keys.len() / 2];
            Line {
                keys,
                num,
                pattern,
                peak,
                curve: None,
            }
        })
        .collect();
    Ok(lines)
}
