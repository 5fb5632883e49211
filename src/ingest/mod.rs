//! Adapters that turn recorded files into raw per-entity sequences.
//!
//! A source is a pair of files sharing a stem: a DataPoints JSON file that
//! supplies timestamps and a VTT file whose cues supply positions. Bad
//! records inside a source are dropped and counted, never fatal.

mod datapoints;
mod discovery;
mod error;
mod timestamp;
mod vtt;

pub use datapoints::read_timestamps;
pub use discovery::{discover_pairs, SourcePair};
pub use error::{IngestError, TimestampError};
pub use timestamp::parse_instant;
pub use vtt::read_cues;

use serde::Serialize;

use crate::track::RawEntity;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct IngestStats {
    pub pairs_found: usize,
    pub pairs_loaded: usize,
    pub pairs_skipped: usize,
    pub timestamps_skipped: usize,
    pub cues_skipped: usize,
}

/// Reads both halves of a source. `Ok(None)` means the VTT never named an
/// entity, so the source contributes nothing.
pub fn read_source(
    pair: &SourcePair,
    stats: &mut IngestStats,
) -> Result<Option<RawEntity>, IngestError> {
    let timestamps = read_timestamps(&pair.json)?;
    let cues = read_cues(&pair.vtt)?;

    stats.timestamps_skipped += timestamps.skipped;
    stats.cues_skipped += cues.skipped;

    Ok(cues.entity.map(|name| RawEntity {
        name,
        timestamps: timestamps.timestamps,
        coordinates: cues.coordinates,
    }))
}
