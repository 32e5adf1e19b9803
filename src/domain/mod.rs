pub mod boundary;
pub mod point;

pub use boundary::{Boundary, MALTA_FALLBACK};
pub use point::{COORD_PRECISION, SamplePoint, round_to_precision};
