//! OverlapResolver for intersection roads.

pub mod bundle;
pub mod resolver;

pub use self::bundle::{CurveBundle, CurveRole};
pub use self::resolver::{Approximation, OverlapFlag, OverlapOutcome, OverlapResolver};
