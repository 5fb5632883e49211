use chrono::{DateTime, TimeDelta, Utc};
use std::collections::BTreeMap;

use crate::geo::Coordinate;
use crate::ingest::parse_instant;
use crate::query::QueryError;
use crate::track::{Dataset, Sample, Track};

pub const DEFAULT_TOLERANCE: TimeDelta = TimeDelta::seconds(1);

/// Each entity's position at one instant. Entities with no sample close
/// enough to the instant are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    positions: BTreeMap<String, Coordinate>,
}

impl Snapshot {
    pub fn get(&self, name: &str) -> Option<&Coordinate> {
        self.positions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn positions(&self) -> &BTreeMap<String, Coordinate> {
        &self.positions
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Coordinate)> {
        self.positions.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl FromIterator<(String, Coordinate)> for Snapshot {
    fn from_iter<T: IntoIterator<Item = (String, Coordinate)>>(iter: T) -> Self {
        Self {
            positions: iter.into_iter().collect(),
        }
    }
}

/// Parses a humantime duration (`1s`, `500ms`, `2m`) into a tolerance.
pub fn parse_tolerance(s: &str) -> Result<TimeDelta, String> {
    humantime::parse_duration(s.trim())
        .map_err(|e| e.to_string())
        .and_then(|d| TimeDelta::from_std(d).map_err(|e| e.to_string()))
}

pub fn parse_query_instant(s: &str) -> Result<DateTime<Utc>, QueryError> {
    Ok(parse_instant(s)?)
}

/// Picks every entity's sample nearest to `at`, keeping it only when the
/// gap is at most `tolerance`.
pub fn resolve_snapshot(dataset: &Dataset, at: DateTime<Utc>, tolerance: TimeDelta) -> Snapshot {
    dataset
        .tracks()
        .filter_map(|track| {
            let (sample, gap) = nearest_sample(track, at)?;
            if gap <= tolerance {
                Some((track.name().to_string(), sample.position))
            } else {
                log::debug!(
                    "{}: nearest sample is {}ms from {}, outside tolerance",
                    track.name(),
                    gap.num_milliseconds(),
                    at
                );
                None
            }
        })
        .collect()
}

/// Same as [`resolve_snapshot`] for an instant given as text. An instant
/// that cannot be parsed resolves to an empty snapshot.
pub fn resolve_snapshot_str(dataset: &Dataset, at: &str, tolerance: TimeDelta) -> Snapshot {
    match parse_query_instant(at) {
        Ok(instant) => resolve_snapshot(dataset, instant, tolerance),
        Err(e) => {
            log::warn!("{}", e);
            Snapshot::default()
        }
    }
}

// Full scan. Only a strictly smaller gap replaces the current best, so on
// ties the earliest sample wins.
fn nearest_sample(track: &Track, at: DateTime<Utc>) -> Option<(&Sample, TimeDelta)> {
    let mut best: Option<(&Sample, TimeDelta)> = None;

    for sample in track.samples() {
        let gap = abs_delta(sample.timestamp - at);
        match best {
            Some((_, best_gap)) if gap >= best_gap => {}
            _ => best = Some((sample, gap)),
        }
    }

    best
}

fn abs_delta(delta: TimeDelta) -> TimeDelta {
    if delta < TimeDelta::zero() {
        -delta
    } else {
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::{build_dataset, RawEntity};
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 8, 2, 4, 14).unwrap()
    }

    fn entity(name: &str, offsets_ms: &[i64], coords: &[&str]) -> RawEntity {
        RawEntity {
            name: name.to_string(),
            timestamps: offsets_ms
                .iter()
                .map(|&ms| t0() + TimeDelta::milliseconds(ms))
                .collect(),
            coordinates: coords.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn three_sample_dataset() -> Dataset {
        build_dataset(vec![entity(
            "alpha",
            &[10_000, 0, 2_000],
            &["N10 E10", "N0 E0", "N2 E2"],
        )])
        .unwrap()
    }

    #[test]
    fn resolves_nearest_sample_within_tolerance() {
        let dataset = three_sample_dataset();
        let snap = resolve_snapshot(&dataset, t0() + TimeDelta::milliseconds(400), DEFAULT_TOLERANCE);
        assert_eq!(snap.get("alpha"), Some(&Coordinate::new(0.0, 0.0)));
    }

    #[test]
    fn omits_entity_outside_tolerance() {
        let dataset = three_sample_dataset();
        let snap = resolve_snapshot(&dataset, t0() + TimeDelta::seconds(5), DEFAULT_TOLERANCE);
        assert!(snap.is_empty());
        assert!(!snap.contains("alpha"));
    }

    #[test]
    fn tolerance_boundary_is_inclusive() {
        let dataset = three_sample_dataset();
        let snap = resolve_snapshot(&dataset, t0() + TimeDelta::seconds(3), DEFAULT_TOLERANCE);
        assert_eq!(snap.get("alpha"), Some(&Coordinate::new(2.0, 2.0)));
    }

    #[test]
    fn tie_goes_to_the_earlier_sample() {
        let dataset = three_sample_dataset();
        // equidistant from T and T+2s
        let snap = resolve_snapshot(&dataset, t0() + TimeDelta::seconds(1), DEFAULT_TOLERANCE);
        assert_eq!(snap.get("alpha"), Some(&Coordinate::new(0.0, 0.0)));
    }

    #[test]
    fn resolves_entities_independently() {
        let dataset = build_dataset(vec![
            entity("alpha", &[0], &["N1 E1"]),
            entity("bravo", &[900], &["N2 E2"]),
            entity("charlie", &[4_000], &["N3 E3"]),
        ])
        .unwrap();

        let snap = resolve_snapshot(&dataset, t0(), DEFAULT_TOLERANCE);
        let names: Vec<_> = snap.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["alpha", "bravo"]);
    }

    #[test]
    fn wider_tolerance_admits_farther_samples() {
        let dataset = three_sample_dataset();
        let snap = resolve_snapshot(&dataset, t0() + TimeDelta::seconds(5), TimeDelta::seconds(3));
        assert_eq!(snap.get("alpha"), Some(&Coordinate::new(2.0, 2.0)));
    }

    #[test]
    fn text_instant_with_offset_is_honored() {
        let dataset = three_sample_dataset();
        let snap = resolve_snapshot_str(&dataset, "2024-05-08T04:04:16+02:00", DEFAULT_TOLERANCE);
        assert_eq!(snap.get("alpha"), Some(&Coordinate::new(2.0, 2.0)));

        let snap = resolve_snapshot_str(&dataset, "2024-05-08T02:04:14", DEFAULT_TOLERANCE);
        assert_eq!(snap.get("alpha"), Some(&Coordinate::new(0.0, 0.0)));
    }

    #[test]
    fn unparseable_instant_gives_empty_snapshot() {
        let dataset = three_sample_dataset();
        assert!(resolve_snapshot_str(&dataset, "half past two", DEFAULT_TOLERANCE).is_empty());
        assert!(matches!(
            parse_query_instant("half past two"),
            Err(QueryError::Unresolved(_))
        ));
    }

    #[test]
    fn parses_humantime_tolerances() {
        assert_eq!(parse_tolerance("1s"), Ok(TimeDelta::seconds(1)));
        assert_eq!(parse_tolerance(" 500ms "), Ok(TimeDelta::milliseconds(500)));
        assert!(parse_tolerance("soon").is_err());
    }

    #[test]
    fn empty_dataset_gives_empty_snapshot() {
        let snap = resolve_snapshot(&Dataset::default(), t0(), DEFAULT_TOLERANCE);
        assert!(snap.is_empty());
    }
}
