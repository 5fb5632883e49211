//! Point-in-time questions over a built dataset: where was everyone at an
//! instant, and who was near a given entity then.

mod error;
mod ranker;
mod resolver;

pub use error::QueryError;
pub use ranker::{rank_proximity, Neighbor, DEFAULT_MAX_DISTANCE_M};
pub use resolver::{parse_tolerance, resolve_snapshot_str, Snapshot, DEFAULT_TOLERANCE};
