//! Closed road footprint built from two boundary curves.
use super::{polyline::segments_touch, Polyline};
use geo::{Coord, Intersects, LineString, Polygon};
use serde::Serialize;

/// Ring `left + reversed(right)`, implicitly closed.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Footprint {
    ring: Vec<[f32; 2]>,
}

impl Footprint {
    pub fn from_boundaries(left: &Polyline, right: &Polyline) -> Self {
        let mut ring: Vec<[f32; 2]> = left.points().to_vec();
        ring.extend(right.points().iter().rev().copied());
        Self { ring }
    }

    pub fn ring(&self) -> &[[f32; 2]] {
        &self.ring
    }

    /// Integer bounding box `(x0, y0, x1, y1)` covering the ring, half-open on
    /// the max side.
    pub fn bounds(&self) -> (i64, i64, i64, i64) {
        let mut min = [f32::INFINITY; 2];
        let mut max = [f32::NEG_INFINITY; 2];
        for p in &self.ring {
            min[0] = min[0].min(p[0]);
            min[1] = min[1].min(p[1]);
            max[0] = max[0].max(p[0]);
            max[1] = max[1].max(p[1]);
        }
        (
            min[0].floor() as i64,
            min[1].floor() as i64,
            max[0].ceil() as i64 + 1,
            max[1].ceil() as i64 + 1,
        )
    }

    pub fn to_geo(&self) -> Polygon<f64> {
        let coords: Vec<Coord<f64>> = self
            .ring
            .iter()
            .map(|p| Coord {
                x: p[0] as f64,
                y: p[1] as f64,
            })
            .collect();
        Polygon::new(LineString::from(coords), vec![])
    }

    /// Interior or boundary containment.
    pub fn contains(&self, p: [f32; 2]) -> bool {
        self.to_geo().intersects(&Coord {
            x: p[0] as f64,
            y: p[1] as f64,
        })
    }

    /// `true` when the closed ring has no self-touching edges.
    pub fn is_simple(&self) -> bool {
        let n = self.ring.len();
        if n < 3 {
            return false;
        }
        let edge = |i: usize| (self.ring[i], self.ring[(i + 1) % n]);
        for i in 0..n {
            for j in i + 1..n {
                let adjacent = j == i + 1 || (i == 0 && j == n - 1);
                if adjacent {
                    continue;
                }
                let (a, b) = edge(i);
                let (c, d) = edge(j);
                if segments_touch(a, b, c, d) {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip() -> Footprint {
        let left = Polyline::new(vec![[10.0, 0.0], [10.0, 50.0]]).unwrap();
        let right = Polyline::new(vec![[20.0, 0.0], [20.0, 50.0]]).unwrap();
        Footprint::from_boundaries(&left, &right)
    }

    #[test]
    fn ring_and_bounds() {
        let fp = strip();
        assert_eq!(fp.ring().len(), 4);
        assert_eq!(fp.bounds(), (10, 0, 21, 51));
        assert!(fp.is_simple());
    }

    #[test]
    fn contains_interior_and_edge() {
        let fp = strip();
        assert!(fp.contains([15.0, 25.0]));
        assert!(fp.contains([10.0, 25.0]));
        assert!(!fp.contains([25.0, 25.0]));
    }

    #[test]
    fn crossed_boundaries_are_not_simple() {
        let left = Polyline::new(vec![[10.0, 0.0], [20.0, 50.0]]).unwrap();
        let right = Polyline::new(vec![[20.0, 0.0], [10.0, 50.0]]).unwrap();
        // Ring 10,0 → 20,50 → 10,50 → 20,0 crosses itself.
        assert!(!Footprint::from_boundaries(&left, &right).is_simple());
    }
}
