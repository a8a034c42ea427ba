//! Raster containers used by the scanner.
//!
//! - [`ImageU8`]: borrowed 8-bit view over caller-owned memory (the sketch raster).
//! - [`GrayImageU8`]: owned 8-bit buffer produced by ROI masking and rotation.
//! - [`rotate`]: bounded rotation with an invertible coordinate frame.

pub mod gray;
pub mod rotate;
pub mod traits;
pub mod u8;

pub use self::gray::GrayImageU8;
pub use self::rotate::{rotate_bound, RotatedFrame};
pub use self::traits::{ImageView, ImageViewMut, Rows, RowsMut};
pub use self::u8::ImageU8;
