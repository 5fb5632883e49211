//! Geographic primitives: hemisphere-tagged coordinate decoding and
//! great-circle distance on a spherical Earth.

mod coordinate;
mod distance;
mod error;

pub use coordinate::Coordinate;
pub use distance::distance_m;
pub use error::CoordinateError;
