//! Directory in, dataset out: discovery, per-source reading and track
//! assembly, with per-source failures logged and skipped.

use std::path::Path;

use crate::ingest::{discover_pairs, read_source, IngestError, IngestStats};
use crate::track::{build_dataset, Dataset};

#[derive(Debug, Clone, Default)]
pub struct LoadedDataset {
    pub dataset: Dataset,
    pub stats: IngestStats,
}

pub fn load_dataset(root: &Path) -> Result<LoadedDataset, IngestError> {
    let pairs = discover_pairs(root)?;
    let mut stats = IngestStats {
        pairs_found: pairs.len(),
        ..Default::default()
    };

    let mut sources = Vec::with_capacity(pairs.len());
    for pair in &pairs {
        match read_source(pair, &mut stats) {
            Ok(Some(raw)) if !raw.timestamps.is_empty() && !raw.coordinates.is_empty() => {
                stats.pairs_loaded += 1;
                sources.push(raw);
            }
            Ok(_) => {
                log::debug!("{} has no usable samples", pair.json.display());
                stats.pairs_skipped += 1;
            }
            Err(e) => {
                log::warn!("Failed to load {}: {}", pair.json.display(), e);
                stats.pairs_skipped += 1;
            }
        }
    }

    let dataset = build_dataset(sources)?;

    log::info!(
        "Loaded {} entities ({} samples) from {} of {} source pairs; skipped {} timestamps and {} cues",
        dataset.len(),
        dataset.sample_count(),
        stats.pairs_loaded,
        stats.pairs_found,
        stats.timestamps_skipped,
        stats.cues_skipped
    );

    Ok(LoadedDataset { dataset, stats })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{rank_proximity, resolve_snapshot_str, DEFAULT_TOLERANCE};
    use std::fs;

    fn write_source(dir: &Path, stem: &str, officer: &str, rows: &[(&str, &str)]) {
        let points: Vec<String> = rows
            .iter()
            .map(|(time, _)| format!(r#"{{"Time": "{time}"}}"#))
            .collect();
        fs::write(
            dir.join(format!("{stem}.json")),
            format!(r#"{{"DataPoints": [{}]}}"#, points.join(",")),
        )
        .unwrap();

        let mut vtt = String::from("WEBVTT\n\n");
        for (i, (_, gps)) in rows.iter().enumerate() {
            vtt += &format!(
                "00:00:{i:02}.000 --> 00:00:{i:02}.999\n{{\"officer\": \"{officer}\", \"gpsCoordinates\": \"{gps}\"}}\n\n"
            );
        }
        fs::write(dir.join(format!("{stem}.vtt")), vtt).unwrap();
    }

    #[test]
    fn nearby_entities_are_found_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        write_source(
            dir.path(),
            "smith",
            "Smith",
            &[
                ("2024-05-08T02:04:13Z", "N42.389000 W72.526000"),
                ("2024-05-08T02:04:14.2Z", "N42.389457 W72.526538"),
            ],
        );
        write_source(
            dir.path(),
            "jones",
            "Jones",
            &[("2024-05-08T02:04:13.6Z", "N42.389800 W72.526538")],
        );

        let loaded = load_dataset(dir.path()).unwrap();
        assert_eq!(loaded.dataset.len(), 2);
        assert_eq!(loaded.stats.pairs_loaded, 2);

        let snap = resolve_snapshot_str(&loaded.dataset, "2024-05-08T02:04:14Z", DEFAULT_TOLERANCE);
        let ranked = rank_proximity(&snap, "Smith", 100.0);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].name, "Jones");
        // 0.000343 deg of latitude
        assert!((ranked[0].distance_m - 38.1).abs() < 0.5, "got {}", ranked[0].distance_m);

        assert!(rank_proximity(&snap, "Smith", 10.0).is_empty());
    }

    #[test]
    fn same_officer_across_files_is_merged() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("day2");
        fs::create_dir(&sub).unwrap();
        write_source(dir.path(), "a", "Lee", &[("2024-05-08T02:00:00Z", "N1 E1")]);
        write_source(&sub, "b", "Lee", &[("2024-05-08T01:00:00Z", "N2 E2")]);

        let loaded = load_dataset(dir.path()).unwrap();
        let track = loaded.dataset.get("Lee").unwrap();
        assert_eq!(track.len(), 2);
        assert_eq!(track.first().unwrap().position.latitude_deg, 2.0);
    }

    #[test]
    fn broken_sources_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path(), "good", "Lee", &[("2024-05-08T02:00:00Z", "N1 E1")]);
        fs::write(dir.path().join("broken.json"), "{ nope").unwrap();
        fs::write(dir.path().join("broken.vtt"), "WEBVTT\n").unwrap();
        write_source(dir.path(), "anon", "Kim", &[]);

        let loaded = load_dataset(dir.path()).unwrap();
        assert_eq!(loaded.dataset.len(), 1);
        assert_eq!(loaded.stats.pairs_found, 3);
        assert_eq!(loaded.stats.pairs_loaded, 1);
        assert_eq!(loaded.stats.pairs_skipped, 2);
    }

    #[test]
    fn missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_dataset(&dir.path().join("missing")),
            Err(IngestError::DirectoryNotFound(_))
        ));
    }
}
