//! Per-segment curve bundle handed to the overlap resolver.
use crate::geometry::Polyline;
use crate::segments::Segment;
use serde::Serialize;

/// Which curve of a bundle a value refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase", tag = "role", content = "index")]
pub enum CurveRole {
    Left,
    Right,
    Center,
    Mark(usize),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurveBundle {
    pub segment: usize,
    pub left: Polyline,
    pub right: Polyline,
    pub center: Polyline,
    /// Inner markings, left to right.
    pub marks: Vec<Polyline>,
}

impl CurveBundle {
    /// Outer lines become the boundaries, inner lines the marks. Missing
    /// curves fall back to the segment's own boundaries.
    pub fn from_segment(segment: &Segment) -> Self {
        let curves: Vec<&Polyline> = segment
            .lines
            .iter()
            .filter_map(|l| l.curve.as_ref())
            .collect();
        let (left, right, marks) = match curves.as_slice() {
            [] | [_] => (
                curves
                    .first()
                    .map(|c| (*c).clone())
                    .unwrap_or_else(|| segment.left_boundary.clone()),
                segment.right_boundary.clone(),
                Vec::new(),
            ),
            [first, inner @ .., last] => (
                (*first).clone(),
                (*last).clone(),
                inner.iter().map(|c| (*c).clone()).collect(),
            ),
        };
        Self {
            segment: segment.id,
            left,
            right,
            center: segment.midline.clone(),
            marks,
        }
    }

    pub fn get(&self, role: CurveRole) -> Option<&Polyline> {
        match role {
            CurveRole::Left => Some(&self.left),
            CurveRole::Right => Some(&self.right),
            CurveRole::Center => Some(&self.center),
            CurveRole::Mark(i) => self.marks.get(i),
        }
    }

    pub fn set(&mut self, role: CurveRole, curve: Polyline) {
        match role {
            CurveRole::Left => self.left = curve,
            CurveRole::Right => self.right = curve,
            CurveRole::Center => self.center = curve,
            CurveRole::Mark(i) => {
                if let Some(slot) = self.marks.get_mut(i) {
                    *slot = curve;
                }
            }
        }
    }

    pub fn roles(&self) -> Vec<CurveRole> {
        let mut roles = vec![CurveRole::Left, CurveRole::Right, CurveRole::Center];
        roles.extend((0..self.marks.len()).map(CurveRole::Mark));
        roles
    }

    /// Writes the line curves back onto the segment they came from. The
    /// midline and the segment boundaries are left untouched.
    pub fn apply_to(&self, segment: &mut Segment) {
        let n = segment.lines.len();
        if n == 0 {
            return;
        }
        let has_curves = segment.lines.iter().all(|l| l.curve.is_some());
        if !has_curves {
            return;
        }
        segment.lines[0].curve = Some(self.left.clone());
        if n >= 2 {
            segment.lines[n - 1].curve = Some(self.right.clone());
            for (line, mark) in segment.lines[1..n - 1].iter_mut().zip(&self.marks) {
                line.curve = Some(mark.clone());
            }
        }
    }
}
