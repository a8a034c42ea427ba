//! Bounded raster rotation.
//!
//! The source ROI is rotated about its centre and the output canvas is grown so
//! the whole ROI stays visible (no corner clipping). [`RotatedFrame`] records
//! the mapping so curves can move between full-image coordinates and the
//! rotated canvas in both directions.
//!
//! Conventions:
//! - Image coordinates, `x` to the right and `y` down; pixel `(i, j)` covers
//!   `[i, i+1) × [j, j+1)`.
//! - A positive angle turns `+x` towards `+y`.
//! - Quarter turns use exact trigonometry so they reduce to pixel permutations.
use super::{GrayImageU8, ImageView, ImageViewMut};
use serde::Serialize;

/// Invertible mapping between full-image coordinates and a rotated ROI canvas.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RotatedFrame {
    /// Rotation applied to the ROI, degrees.
    pub angle_deg: f32,
    /// Top-left corner of the ROI in full-image coordinates.
    pub origin: [f32; 2],
    /// ROI size before rotation `[w, h]`.
    pub src_size: [usize; 2],
    /// Canvas size after rotation `[w, h]`.
    pub dst_size: [usize; 2],
    #[serde(skip)]
    cos: f32,
    #[serde(skip)]
    sin: f32,
}

impl RotatedFrame {
    pub fn new(angle_deg: f32, origin: [f32; 2], src_w: usize, src_h: usize) -> Self {
        let (sin, cos) = exact_sin_cos(angle_deg);
        let fit = |a: f32, b: f32| ((a + b) - 1e-3).ceil().max(1.0) as usize;
        let dst_w = fit(src_w as f32 * cos.abs(), src_h as f32 * sin.abs());
        let dst_h = fit(src_w as f32 * sin.abs(), src_h as f32 * cos.abs());
        Self {
            angle_deg,
            origin,
            src_size: [src_w, src_h],
            dst_size: [dst_w, dst_h],
            cos,
            sin,
        }
    }

    #[inline]
    fn src_center(&self) -> [f32; 2] {
        [self.src_size[0] as f32 * 0.5, self.src_size[1] as f32 * 0.5]
    }

    #[inline]
    fn dst_center(&self) -> [f32; 2] {
        [self.dst_size[0] as f32 * 0.5, self.dst_size[1] as f32 * 0.5]
    }

    /// Full-image position → rotated canvas position.
    pub fn to_rotated(&self, p: [f32; 2]) -> [f32; 2] {
        let c = self.src_center();
        let d = self.dst_center();
        let x = p[0] - self.origin[0] - c[0];
        let y = p[1] - self.origin[1] - c[1];
        [
            self.cos * x - self.sin * y + d[0],
            self.sin * x + self.cos * y + d[1],
        ]
    }

    /// Rotated canvas position → ROI-local position (before adding `origin`).
    #[inline]
    fn to_local(&self, q: [f32; 2]) -> [f32; 2] {
        let c = self.src_center();
        let d = self.dst_center();
        let x = q[0] - d[0];
        let y = q[1] - d[1];
        [
            self.cos * x + self.sin * y + c[0],
            -self.sin * x + self.cos * y + c[1],
        ]
    }

    /// Rotated canvas position → full-image position.
    pub fn to_image(&self, q: [f32; 2]) -> [f32; 2] {
        let local = self.to_local(q);
        [local[0] + self.origin[0], local[1] + self.origin[1]]
    }
}

/// Sine and cosine with exact values on quarter turns.
fn exact_sin_cos(angle_deg: f32) -> (f32, f32) {
    let turns = angle_deg / 90.0;
    if (turns - turns.round()).abs() < 1e-6 {
        match (turns.round() as i64).rem_euclid(4) {
            0 => return (0.0, 1.0),
            1 => return (1.0, 0.0),
            2 => return (0.0, -1.0),
            _ => return (-1.0, 0.0),
        }
    }
    angle_deg.to_radians().sin_cos()
}

/// Rotate a ROI raster into the canvas described by `frame`.
///
/// Nearest-neighbour sampling at pixel centres; canvas pixels that fall
/// outside the source are background (0). The source is never written.
pub fn rotate_bound<I>(src: &I, frame: &RotatedFrame) -> GrayImageU8
where
    I: ImageView<Pixel = u8>,
{
    let [dst_w, dst_h] = frame.dst_size;
    let mut out = GrayImageU8::zeros(dst_w, dst_h);
    for (v, row) in out.rows_mut().enumerate() {
        for (u, px) in row.iter_mut().enumerate() {
            let p = frame.to_local([u as f32 + 0.5, v as f32 + 0.5]);
            if let Some(val) = src.sample(p) {
                *px = val;
            }
        }
    }
    out
}
