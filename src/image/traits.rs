//! Row-oriented raster access shared by borrowed and owned buffers.

pub trait ImageView {
    type Pixel: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn stride(&self) -> usize;

    fn row(&self, y: usize) -> &[Self::Pixel];

    #[inline]
    fn pixel(&self, x: usize, y: usize) -> Self::Pixel {
        self.row(y)[x]
    }

    /// Sample the pixel containing the continuous position `p` (floor rounding).
    /// Returns `None` outside the raster or for non-finite input.
    #[inline]
    fn sample(&self, p: [f32; 2]) -> Option<Self::Pixel> {
        if !p[0].is_finite() || !p[1].is_finite() || p[0] < 0.0 || p[1] < 0.0 {
            return None;
        }
        let (x, y) = (p[0].floor() as usize, p[1].floor() as usize);
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.pixel(x, y))
    }

    fn rows(&self) -> Rows<'_, Self>
    where
        Self: Sized,
    {
        Rows { image: self, y: 0 }
    }
}

pub trait ImageViewMut: ImageView {
    fn row_mut(&mut self, y: usize) -> &mut [Self::Pixel];

    fn rows_mut(&mut self) -> RowsMut<'_, Self>
    where
        Self: Sized,
    {
        RowsMut { image: self, y: 0 }
    }
}

pub struct Rows<'a, I: ?Sized + ImageView> {
    image: &'a I,
    y: usize,
}

impl<'a, I: ImageView> Iterator for Rows<'a, I> {
    type Item = &'a [I::Pixel];

    fn next(&mut self) -> Option<Self::Item> {
        if self.y >= self.image.height() {
            return None;
        }
        let y = self.y;
        self.y += 1;
        Some(self.image.row(y))
    }
}

pub struct RowsMut<'a, I: ?Sized + ImageViewMut> {
    image: &'a mut I,
    y: usize,
}

impl<'a, I: ImageViewMut> Iterator for RowsMut<'a, I> {
    type Item = &'a mut [I::Pixel];

    fn next(&mut self) -> Option<Self::Item> {
        if self.y >= self.image.height() {
            return None;
        }
        let y = self.y;
        self.y += 1;
        let ptr = self.image as *mut I;
        // SAFETY: each row is handed out once and rows never alias.
        Some(unsafe { (&mut *ptr).row_mut(y) })
    }
}
