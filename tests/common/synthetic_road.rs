use sketch_lanes::image::ImageU8;

/// Binary sketch raster: 0 is background, 255 is paint.
pub struct SketchRaster {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl SketchRaster {
    pub fn blank(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "image dimensions must be positive");
        Self {
            width,
            height,
            data: vec![0u8; width * height],
        }
    }

    /// Paints full-height columns.
    pub fn solid_columns(mut self, cols: &[usize]) -> Self {
        self.columns_where(cols, |_| true);
        self
    }

    /// Paints columns on the rows where `on(y)` holds.
    pub fn dashed_columns(mut self, cols: &[usize], on: impl Fn(usize) -> bool) -> Self {
        self.columns_where(cols, on);
        self
    }

    /// Paints full-width rows.
    pub fn solid_rows(mut self, rows: &[usize]) -> Self {
        for &y in rows {
            for x in 0..self.width {
                self.data[y * self.width + x] = 255;
            }
        }
        self
    }

    /// Paints every pixel whose signed distance from the line through `a`
    /// and `b` lies in `[lo, hi)`. Positive distances lie on the `(-dy, dx)`
    /// side.
    pub fn band(mut self, a: [f32; 2], b: [f32; 2], lo: f32, hi: f32) -> Self {
        let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
        let len = (dx * dx + dy * dy).sqrt();
        let n = [-dy / len, dx / len];
        for y in 0..self.height {
            for x in 0..self.width {
                let d = (x as f32 - a[0]) * n[0] + (y as f32 - a[1]) * n[1];
                if d >= lo && d < hi {
                    self.data[y * self.width + x] = 255;
                }
            }
        }
        self
    }

    pub fn view(&self) -> ImageU8<'_> {
        ImageU8::new(self.width, self.height, &self.data)
    }

    fn columns_where(&mut self, cols: &[usize], on: impl Fn(usize) -> bool) {
        for y in (0..self.height).filter(|&y| on(y)) {
            for &x in cols {
                self.data[y * self.width + x] = 255;
            }
        }
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
