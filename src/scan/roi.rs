//! ROI isolation: crop the raster to a footprint's bounding box and blank
//! every pixel whose centre lies outside the footprint.
use crate::geometry::Footprint;
use crate::image::{GrayImageU8, ImageU8, ImageView, ImageViewMut};
use geo::{Coord, Intersects};

#[derive(Clone, Debug)]
pub struct Roi {
    pub image: GrayImageU8,
    /// Top-left corner of the crop in full-image coordinates.
    pub origin: [f32; 2],
}

/// `None` when the footprint does not overlap the raster.
pub fn isolate(raster: &ImageU8<'_>, footprint: &Footprint) -> Option<Roi> {
    let (bx0, by0, bx1, by1) = footprint.bounds();
    let x0 = bx0.max(0) as usize;
    let y0 = by0.max(0) as usize;
    let x1 = bx1.clamp(0, raster.w as i64) as usize;
    let y1 = by1.clamp(0, raster.h as i64) as usize;
    if x1 <= x0 || y1 <= y0 {
        return None;
    }

    let polygon = footprint.to_geo();
    let mut image = GrayImageU8::zeros(x1 - x0, y1 - y0);
    for (j, row) in image.rows_mut().enumerate() {
        let src = raster.row(y0 + j);
        let cy = (y0 + j) as f64 + 0.5;
        for (i, px) in row.iter_mut().enumerate() {
            let v = src[x0 + i];
            if v == 0 {
                continue;
            }
            let centre = Coord {
                x: (x0 + i) as f64 + 0.5,
                y: cy,
            };
            if polygon.intersects(&centre) {
                *px = v;
            }
        }
    }
    Some(Roi {
        image,
        origin: [x0 as f32, y0 as f32],
    })
}
