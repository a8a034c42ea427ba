//! Owned 8-bit grayscale buffer.
//!
//! Produced by ROI isolation and rotation; read-only once built, so the
//! scanner can share it across column probes.
use super::{ImageView, ImageViewMut};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImageU8 {
    width: usize,
    height: usize,
    stride: usize,
    data: Vec<u8>,
}

impl GrayImageU8 {
    /// Construct an owned buffer from raw row-major bytes (`stride == width`).
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            width,
            height,
            stride: width,
            data,
        }
    }

    /// Zero-filled (background) buffer.
    pub fn zeros(width: usize, height: usize) -> Self {
        Self::new(width, height, vec![0; width * height])
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of painted (non-zero) pixels.
    pub fn count_nonzero(&self) -> usize {
        self.rows()
            .map(|row| row.iter().filter(|&&v| v > 0).count())
            .sum()
    }
}

impl ImageView for GrayImageU8 {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.width
    }
    #[inline]
    fn height(&self) -> usize {
        self.height
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.width]
    }
}

impl ImageViewMut for GrayImageU8 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.stride;
        let end = start + self.width;
        &mut self.data[start..end]
    }
}
