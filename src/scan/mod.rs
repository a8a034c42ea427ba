//! LineScanner: ROI isolation, rotation and column probing.

pub mod dbscan;
pub mod roi;
pub mod scanner;
pub mod window_line;

pub use self::scanner::{ColumnScan, LineScanner};
pub use self::window_line::{MarkPattern, WindowLine};
