//! Curve and polygon primitives shared by the builders, scanner and resolver.

pub mod fit;
pub mod footprint;
pub mod polyline;

pub use self::fit::extend_quadratic;
pub use self::footprint::Footprint;
pub use self::polyline::Polyline;
