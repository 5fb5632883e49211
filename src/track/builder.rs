use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::geo::{Coordinate, CoordinateError};
use crate::track::{Dataset, RawEntity, Sample, Track};

/// Pairs `timestamps[i]` with `coordinates[i]` and orders the result by time.
///
/// The sequences come from two independently parsed sources and carry no
/// join key; they are trusted to be index-aligned. Whatever the longer one
/// holds beyond the shorter one's length is dropped.
pub fn build_track(name: &str, timestamps: &[DateTime<Utc>], coordinates: &[Coordinate]) -> Track {
    let mut samples: Vec<Sample> = timestamps
        .iter()
        .zip(coordinates)
        .map(|(&timestamp, &position)| Sample {
            timestamp,
            position,
        })
        .collect();

    // stable: equal timestamps keep source order
    samples.sort_by_key(|s| s.timestamp);

    Track::from_sorted(name.to_string(), samples)
}

/// Assembles the dataset from every source the ingest layer produced.
///
/// Sources sharing a name are zipped independently and then merged into one
/// track. Sources that pair up to nothing are left out.
pub fn build_dataset<I>(entities: I) -> Result<Dataset, CoordinateError>
where
    I: IntoIterator<Item = RawEntity>,
{
    let mut merged: BTreeMap<String, Vec<Sample>> = BTreeMap::new();

    for entity in entities {
        let paired = entity.timestamps.len().min(entity.coordinates.len());
        if entity.timestamps.len() != entity.coordinates.len() {
            log::debug!(
                "Source for {} has {} timestamps and {} coordinates, keeping {}",
                entity.name,
                entity.timestamps.len(),
                entity.coordinates.len(),
                paired
            );
        }

        let coordinates = entity.coordinates[..paired]
            .iter()
            .map(|s| s.parse::<Coordinate>())
            .collect::<Result<Vec<_>, _>>()?;

        let track = build_track(&entity.name, &entity.timestamps, &coordinates);
        if track.is_empty() {
            log::debug!("Source for {} pairs to no samples, skipping", entity.name);
            continue;
        }

        merged
            .entry(entity.name)
            .or_default()
            .extend_from_slice(track.samples());
    }

    let tracks = merged
        .into_iter()
        .map(|(name, mut samples)| {
            samples.sort_by_key(|s| s.timestamp);
            (name.clone(), Track::from_sorted(name, samples))
        })
        .collect();

    Ok(Dataset::from_tracks(tracks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_715_133_854 + secs, 0).unwrap()
    }

    fn coords(n: usize) -> Vec<Coordinate> {
        (0..n).map(|i| Coordinate::new(i as f64, -(i as f64))).collect()
    }

    fn raw(name: &str, secs: &[i64], coords: &[&str]) -> RawEntity {
        RawEntity {
            name: name.to_string(),
            timestamps: secs.iter().map(|&s| at(s)).collect(),
            coordinates: coords.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn truncates_to_shorter_sequence() {
        let ts: Vec<_> = (0..5).map(at).collect();
        let track = build_track("alpha", &ts, &coords(3));
        assert_eq!(track.len(), 3);
        assert_eq!(track.name(), "alpha");

        let track = build_track("alpha", &ts[..2], &coords(4));
        assert_eq!(track.len(), 2);
    }

    #[test]
    fn empty_input_gives_empty_track() {
        assert!(build_track("alpha", &[], &coords(3)).is_empty());
        assert!(build_track("alpha", &[at(0)], &[]).is_empty());
    }

    #[test]
    fn pairs_positionally_then_sorts_by_time() {
        let ts = vec![at(10), at(0), at(5)];
        let track = build_track("alpha", &ts, &coords(3));

        let times: Vec<_> = track.samples().iter().map(|s| s.timestamp).collect();
        assert_eq!(times, vec![at(0), at(5), at(10)]);

        // the position travels with its original timestamp
        let lats: Vec<_> = track
            .samples()
            .iter()
            .map(|s| s.position.latitude_deg)
            .collect();
        assert_eq!(lats, vec![1.0, 2.0, 0.0]);
    }

    #[test]
    fn equal_timestamps_keep_source_order() {
        let ts = vec![at(3), at(1), at(1)];
        let track = build_track("alpha", &ts, &coords(3));
        let lats: Vec<_> = track
            .samples()
            .iter()
            .map(|s| s.position.latitude_deg)
            .collect();
        assert_eq!(lats, vec![1.0, 2.0, 0.0]);
    }

    #[test]
    fn dataset_omits_entities_without_samples() {
        let dataset = build_dataset(vec![
            raw("alpha", &[0, 1], &["N1 E1", "N2 E2"]),
            raw("bravo", &[], &["N1 E1"]),
            raw("charlie", &[0], &[]),
        ])
        .unwrap();

        assert_eq!(dataset.len(), 1);
        assert!(dataset.get("alpha").is_some());
        assert!(dataset.get("bravo").is_none());
        assert!(dataset.get("charlie").is_none());
    }

    #[test]
    fn dataset_merges_sources_with_the_same_name() {
        let dataset = build_dataset(vec![
            raw("alpha", &[10, 20], &["N1 E1", "N2 E2", "N9 E9"]),
            raw("alpha", &[15, 5], &["N3 E3", "N4 E4"]),
        ])
        .unwrap();

        let track = dataset.get("alpha").unwrap();
        let lats: Vec<_> = track
            .samples()
            .iter()
            .map(|s| s.position.latitude_deg)
            .collect();
        assert_eq!(lats, vec![4.0, 1.0, 3.0, 2.0]);
        assert_eq!(dataset.sample_count(), 4);
    }

    #[test]
    fn dataset_surfaces_malformed_coordinates() {
        let err = build_dataset(vec![raw("alpha", &[0, 1], &["N1 E1", "N2"])]).unwrap_err();
        assert!(matches!(err, CoordinateError::Malformed { .. }));
    }

    #[test]
    fn dataset_ignores_coordinates_past_the_paired_length() {
        let dataset =
            build_dataset(vec![raw("alpha", &[0], &["N1 E1", "not a coordinate"])]).unwrap();
        assert_eq!(dataset.get("alpha").unwrap().len(), 1);
    }
}
