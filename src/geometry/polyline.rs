//! Open polyline in image coordinates.
//!
//! Points are `[x, y]` pixels with `y` down. "Left" is the side reached by
//! turning the travel direction by −90° in this frame, i.e. the normal
//! `(-dy, dx)`, which lands on the smaller-`x` side of a curve running `+y`.
use crate::angle::direction_deg;
use geo::{Coord, LineString};
use serde::Serialize;

const DEDUP_EPS: f32 = 1e-6;
/// Maximum mitre length relative to the offset distance.
const MITER_LIMIT: f32 = 4.0;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Polyline {
    pts: Vec<[f32; 2]>,
}

impl Polyline {
    /// Builds a polyline, dropping non-finite points and consecutive
    /// duplicates. Returns `None` when fewer than two distinct points remain.
    pub fn new(points: Vec<[f32; 2]>) -> Option<Self> {
        let mut pts: Vec<[f32; 2]> = Vec::with_capacity(points.len());
        for p in points {
            if !p[0].is_finite() || !p[1].is_finite() {
                continue;
            }
            if let Some(prev) = pts.last() {
                if dist(*prev, p) <= DEDUP_EPS {
                    continue;
                }
            }
            pts.push(p);
        }
        (pts.len() >= 2).then_some(Self { pts })
    }

    /// Keeps the points as given; used where point counts must be preserved.
    pub(crate) fn from_raw(pts: Vec<[f32; 2]>) -> Self {
        Self { pts }
    }

    pub fn points(&self) -> &[[f32; 2]] {
        &self.pts
    }

    pub fn into_points(self) -> Vec<[f32; 2]> {
        self.pts
    }

    pub fn len(&self) -> usize {
        self.pts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pts.is_empty()
    }

    pub fn first(&self) -> [f32; 2] {
        self.pts[0]
    }

    pub fn last(&self) -> [f32; 2] {
        self.pts[self.pts.len() - 1]
    }

    /// Arc length.
    pub fn length(&self) -> f32 {
        self.pts.windows(2).map(|w| dist(w[0], w[1])).sum()
    }

    /// Direction of the first→last endpoint vector, degrees.
    pub fn endpoint_angle_deg(&self) -> f32 {
        direction_deg(self.first(), self.last())
    }

    /// Endpoint vector `last - first`.
    pub fn endpoint_vector(&self) -> [f32; 2] {
        let (a, b) = (self.first(), self.last());
        [b[0] - a[0], b[1] - a[1]]
    }

    pub fn centroid(&self) -> [f32; 2] {
        let n = self.pts.len() as f32;
        let (sx, sy) = self
            .pts
            .iter()
            .fold((0.0f32, 0.0f32), |acc, p| (acc.0 + p[0], acc.1 + p[1]));
        [sx / n, sy / n]
    }

    pub fn reversed(&self) -> Self {
        let mut pts = self.pts.clone();
        pts.reverse();
        Self { pts }
    }

    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn([f32; 2]) -> [f32; 2],
    {
        Self::from_raw(self.pts.iter().map(|&p| f(p)).collect())
    }

    pub fn translate(&self, d: [f32; 2]) -> Self {
        self.map(|p| [p[0] + d[0], p[1] + d[1]])
    }

    /// Translates so the first point lands on `origin`.
    pub fn translate_to(&self, origin: [f32; 2]) -> Self {
        let p0 = self.first();
        self.translate([origin[0] - p0[0], origin[1] - p0[1]])
    }

    /// Rotates about `center` by `angle_deg` (positive turns `+x` towards `+y`).
    pub fn rotate(&self, angle_deg: f32, center: [f32; 2]) -> Self {
        let (s, c) = angle_deg.to_radians().sin_cos();
        self.map(|p| {
            let x = p[0] - center[0];
            let y = p[1] - center[1];
            [c * x - s * y + center[0], s * x + c * y + center[1]]
        })
    }

    /// Point at arc-length `s` from the start, clamped to the curve.
    pub fn point_at(&self, s: f32) -> [f32; 2] {
        if s <= 0.0 {
            return self.first();
        }
        let mut remaining = s;
        for w in self.pts.windows(2) {
            let seg = dist(w[0], w[1]);
            if remaining <= seg {
                let t = if seg > 0.0 { remaining / seg } else { 0.0 };
                return lerp(w[0], w[1], t);
            }
            remaining -= seg;
        }
        self.last()
    }

    /// `n` points evenly spaced by arc length, both endpoints included.
    pub fn resample(&self, n: usize) -> Self {
        if n < 2 {
            return self.clone();
        }
        let total = self.length();
        let pts = (0..n)
            .map(|i| self.point_at(total * i as f32 / (n - 1) as f32))
            .collect();
        Self::from_raw(pts)
    }

    /// Points every `step` pixels of arc length starting at the first point.
    /// The last point is appended when the remainder is not negligible.
    pub fn resample_step(&self, step: f32) -> Self {
        let step = if step.is_finite() && step > 0.0 { step } else { 1.0 };
        let total = self.length();
        let count = (total / step).floor() as usize;
        let mut pts: Vec<[f32; 2]> = (0..=count).map(|i| self.point_at(i as f32 * step)).collect();
        if total - count as f32 * step > 1e-3 {
            pts.push(self.last());
        }
        Self::from_raw(pts)
    }

    pub fn shift_left(&self, distance: f32) -> Self {
        self.shift_with_miter(distance)
    }

    pub fn shift_right(&self, distance: f32) -> Self {
        self.shift_with_miter(-distance)
    }

    /// Offsets every edge along its left normal by `width` and joins
    /// consecutive edges at their intersection. Parallel neighbours reuse the
    /// end of the first shifted edge. Output has as many points as `self`.
    fn shift_with_miter(&self, width: f32) -> Self {
        if self.pts.len() == 2 {
            let (a, b) = shift_edge(self.pts[0], self.pts[1], width);
            return Self::from_raw(vec![a, b]);
        }

        let mut result: Vec<[f32; 2]> = Vec::with_capacity(self.pts.len());
        for i in 0..self.pts.len() - 2 {
            let (p1, p2, p3) = (self.pts[i], self.pts[i + 1], self.pts[i + 2]);
            let l1 = shift_edge(p1, p2, width);
            let l2 = shift_edge(p2, p3, width);
            if i == 0 {
                result.push(l1.0);
            }
            let joint = line_intersection(l1, l2).unwrap_or(l1.1);
            result.push(limit_miter(p2, joint, l1.1, width));
            if i + 3 == self.pts.len() {
                result.push(l2.1);
            }
        }
        debug_assert_eq!(result.len(), self.pts.len());
        Self::from_raw(result)
    }

    /// `true` when no two non-adjacent edges touch.
    pub fn is_simple(&self) -> bool {
        let n = self.pts.len();
        if n < 4 {
            return !(n == 3 && folds_back(self.pts[0], self.pts[1], self.pts[2]));
        }
        for i in 0..n - 1 {
            if i + 2 < n && folds_back(self.pts[i], self.pts[i + 1], self.pts[i + 2]) {
                return false;
            }
            for j in i + 2..n - 1 {
                if segments_touch(self.pts[i], self.pts[i + 1], self.pts[j], self.pts[j + 1]) {
                    return false;
                }
            }
        }
        true
    }

    /// Replaces each endpoint by the exit of its end tangent through the
    /// rectangle `[0, width-1] × [0, height-1]`, then clamps every point into
    /// it. Point count is unchanged.
    pub fn extend_to_bounds(&self, width: usize, height: usize) -> Self {
        let xmax = width.saturating_sub(1) as f32;
        let ymax = height.saturating_sub(1) as f32;
        let n = self.pts.len();
        let mut pts = self.pts.clone();
        pts[0] = ray_exit(self.pts[0], self.pts[1], xmax, ymax);
        pts[n - 1] = ray_exit(self.pts[n - 1], self.pts[n - 2], xmax, ymax);
        for p in pts.iter_mut() {
            p[0] = p[0].clamp(0.0, xmax);
            p[1] = p[1].clamp(0.0, ymax);
        }
        Self::from_raw(pts)
    }

    pub fn to_geo(&self) -> LineString<f64> {
        LineString::from(
            self.pts
                .iter()
                .map(|p| Coord {
                    x: p[0] as f64,
                    y: p[1] as f64,
                })
                .collect::<Vec<_>>(),
        )
    }

    pub fn from_geo(ls: &LineString<f64>) -> Option<Self> {
        Self::new(ls.coords().map(|c| [c.x as f32, c.y as f32]).collect())
    }
}

#[inline]
pub(crate) fn dist(a: [f32; 2], b: [f32; 2]) -> f32 {
    ((b[0] - a[0]).powi(2) + (b[1] - a[1]).powi(2)).sqrt()
}

#[inline]
fn lerp(a: [f32; 2], b: [f32; 2], t: f32) -> [f32; 2] {
    [a[0] + (b[0] - a[0]) * t, a[1] + (b[1] - a[1]) * t]
}

fn shift_edge(a: [f32; 2], b: [f32; 2], width: f32) -> ([f32; 2], [f32; 2]) {
    let len = dist(a, b).max(1e-6);
    let nx = -(b[1] - a[1]) / len * width;
    let ny = (b[0] - a[0]) / len * width;
    ([a[0] + nx, a[1] + ny], [b[0] + nx, b[1] + ny])
}

/// Intersection of two infinite lines, `None` when (nearly) parallel.
fn line_intersection(l1: ([f32; 2], [f32; 2]), l2: ([f32; 2], [f32; 2])) -> Option<[f32; 2]> {
    let d1 = [l1.1[0] - l1.0[0], l1.1[1] - l1.0[1]];
    let d2 = [l2.1[0] - l2.0[0], l2.1[1] - l2.0[1]];
    let denom = d1[0] * d2[1] - d1[1] * d2[0];
    let scale = (d1[0].hypot(d1[1]) * d2[0].hypot(d2[1])).max(1e-12);
    if denom.abs() / scale < 1e-6 {
        return None;
    }
    let t = ((l2.0[0] - l1.0[0]) * d2[1] - (l2.0[1] - l1.0[1]) * d2[0]) / denom;
    Some([l1.0[0] + t * d1[0], l1.0[1] + t * d1[1]])
}

fn limit_miter(vertex: [f32; 2], joint: [f32; 2], fallback: [f32; 2], width: f32) -> [f32; 2] {
    let limit = MITER_LIMIT * width.abs();
    let d = dist(vertex, joint);
    if d <= limit || d <= 1e-6 {
        return joint;
    }
    if !joint[0].is_finite() || !joint[1].is_finite() {
        return fallback;
    }
    let t = limit / d;
    lerp(vertex, joint, t)
}

fn orient(a: [f32; 2], b: [f32; 2], c: [f32; 2]) -> f32 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

fn on_segment(a: [f32; 2], b: [f32; 2], p: [f32; 2]) -> bool {
    p[0] >= a[0].min(b[0]) - 1e-6
        && p[0] <= a[0].max(b[0]) + 1e-6
        && p[1] >= a[1].min(b[1]) - 1e-6
        && p[1] <= a[1].max(b[1]) + 1e-6
}

/// Closed-segment intersection test (touching counts).
pub(crate) fn segments_touch(a: [f32; 2], b: [f32; 2], c: [f32; 2], d: [f32; 2]) -> bool {
    const EPS: f32 = 1e-6;
    let o1 = orient(a, b, c);
    let o2 = orient(a, b, d);
    let o3 = orient(c, d, a);
    let o4 = orient(c, d, b);
    if ((o1 > EPS && o2 < -EPS) || (o1 < -EPS && o2 > EPS))
        && ((o3 > EPS && o4 < -EPS) || (o3 < -EPS && o4 > EPS))
    {
        return true;
    }
    (o1.abs() <= EPS && on_segment(a, b, c))
        || (o2.abs() <= EPS && on_segment(a, b, d))
        || (o3.abs() <= EPS && on_segment(c, d, a))
        || (o4.abs() <= EPS && on_segment(c, d, b))
}

/// Consecutive edges that reverse onto each other.
fn folds_back(a: [f32; 2], b: [f32; 2], c: [f32; 2]) -> bool {
    let u = [b[0] - a[0], b[1] - a[1]];
    let v = [c[0] - b[0], c[1] - b[1]];
    orient(a, b, c).abs() <= 1e-6 && u[0] * v[0] + u[1] * v[1] < 0.0
}

/// Moves `end` along the direction `prev → end` until it leaves the rectangle.
fn ray_exit(end: [f32; 2], prev: [f32; 2], xmax: f32, ymax: f32) -> [f32; 2] {
    let len = dist(prev, end);
    if len <= 1e-6 {
        return end;
    }
    let u = [(end[0] - prev[0]) / len, (end[1] - prev[1]) / len];
    let axis_t = |p: f32, d: f32, hi: f32| -> f32 {
        if d > 1e-6 {
            (hi - p) / d
        } else if d < -1e-6 {
            -p / d
        } else {
            f32::INFINITY
        }
    };
    let t = axis_t(end[0], u[0], xmax).min(axis_t(end[1], u[1], ymax));
    if !t.is_finite() {
        return end;
    }
    let t = t.max(0.0);
    [end[0] + u[0] * t, end[1] + u[1] * t]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: [f32; 2], b: [f32; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-3 && (a[1] - b[1]).abs() < 1e-3
    }

    fn line(pts: &[[f32; 2]]) -> Polyline {
        Polyline::new(pts.to_vec()).unwrap()
    }

    #[test]
    fn new_drops_duplicates_and_rejects_degenerate() {
        let pl = line(&[[0.0, 0.0], [0.0, 0.0], [1.0, 0.0]]);
        assert_eq!(pl.len(), 2);
        assert!(Polyline::new(vec![[1.0, 1.0], [1.0, 1.0]]).is_none());
        assert!(Polyline::new(vec![[f32::NAN, 0.0], [1.0, 1.0]]).is_none());
    }

    #[test]
    fn shift_straight_line_moves_along_normal() {
        let pl = line(&[[10.0, 0.0], [10.0, 50.0], [10.0, 100.0]]);
        let left = pl.shift_left(5.0);
        let right = pl.shift_right(5.0);
        assert_eq!(left.len(), 3);
        assert_eq!(right.len(), 3);
        for p in left.points() {
            assert!((p[0] - 5.0).abs() < 1e-4);
        }
        for p in right.points() {
            assert!((p[0] - 15.0).abs() < 1e-4);
        }
    }

    #[test]
    fn shift_corner_uses_miter_joint() {
        let pl = line(&[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0]]);
        // Left normal of +x is +y; the corner joint moves inwards.
        let left = pl.shift_left(1.0);
        assert!(approx(left.points()[1], [9.0, 1.0]));
        let right = pl.shift_right(1.0);
        assert!(approx(right.points()[1], [11.0, -1.0]));
    }

    #[test]
    fn sharp_corner_respects_miter_limit() {
        let pl = line(&[[0.0, 0.0], [100.0, 0.0], [0.0, 1.0]]);
        let shifted = pl.shift_right(2.0);
        assert!(dist(shifted.points()[1], [100.0, 0.0]) <= MITER_LIMIT * 2.0 + 1e-3);
    }

    #[test]
    fn resample_preserves_endpoints_and_length() {
        let pl = line(&[[0.0, 0.0], [30.0, 0.0], [30.0, 40.0]]);
        let r = pl.resample(10);
        assert_eq!(r.len(), 10);
        assert!(approx(r.first(), [0.0, 0.0]));
        assert!(approx(r.last(), [30.0, 40.0]));
        let s = pl.resample_step(1.0);
        assert_eq!(s.len(), 71);
    }

    #[test]
    fn self_crossing_is_not_simple() {
        let z = line(&[[0.0, 0.0], [10.0, 10.0], [10.0, 0.0], [0.0, 10.0]]);
        assert!(!z.is_simple());
        let ok = line(&[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]);
        assert!(ok.is_simple());
        let fold = line(&[[0.0, 0.0], [10.0, 0.0], [5.0, 0.0]]);
        assert!(!fold.is_simple());
    }

    #[test]
    fn extend_to_bounds_reaches_border() {
        let pl = line(&[[20.0, 30.0], [40.0, 30.0], [60.0, 30.0]]);
        let ext = pl.extend_to_bounds(100, 80);
        assert_eq!(ext.len(), 3);
        assert!(approx(ext.first(), [0.0, 30.0]));
        assert!(approx(ext.last(), [99.0, 30.0]));
    }

    #[test]
    fn rotate_round_trip_keeps_length() {
        let pl = line(&[[3.0, 4.0], [20.0, 9.0], [31.0, 40.0]]);
        let back = pl.rotate(37.0, [15.0, 15.0]).rotate(-37.0, [15.0, 15.0]);
        let rel = (back.length() - pl.length()).abs() / pl.length();
        assert!(rel < 1e-3);
        for (a, b) in back.points().iter().zip(pl.points()) {
            assert!(approx(*a, *b));
        }
    }
}
