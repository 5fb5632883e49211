use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::geo::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub position: Coordinate,
}

/// An entity's samples in ascending time order. Built once, then read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    name: String,
    samples: Vec<Sample>,
}

impl Track {
    pub(super) fn from_sorted(name: String, samples: Vec<Sample>) -> Self {
        Self { name, samples }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }
}

/// One source's contribution for an entity, as handed over by the ingest
/// layer: timestamps and coordinate strings in the order the source emitted
/// them. The two sequences are assumed to be index-aligned.
#[derive(Debug, Clone, Default)]
pub struct RawEntity {
    pub name: String,
    pub timestamps: Vec<DateTime<Utc>>,
    pub coordinates: Vec<String>,
}

/// Every entity's track keyed by name. Entities without samples are never
/// present.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    tracks: BTreeMap<String, Track>,
}

impl Dataset {
    pub(super) fn from_tracks(tracks: BTreeMap<String, Track>) -> Self {
        Self { tracks }
    }

    pub fn get(&self, name: &str) -> Option<&Track> {
        self.tracks.get(name)
    }

    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn sample_count(&self) -> usize {
        self.tracks.values().map(Track::len).sum()
    }
}
