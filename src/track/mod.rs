mod builder;
mod types;

pub use builder::build_dataset;
pub use types::{Dataset, RawEntity, Sample, Track};
