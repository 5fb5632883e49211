use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;

use super::error::IngestError;
use super::timestamp::parse_instant;

#[derive(Debug, Deserialize)]
struct DataPointsFile {
    #[serde(rename = "DataPoints", default)]
    data_points: Vec<DataPoint>,
}

#[derive(Debug, Deserialize)]
struct DataPoint {
    #[serde(rename = "Time", default)]
    time: Option<String>,
}

#[derive(Debug, Default, PartialEq)]
pub struct TimestampStream {
    pub timestamps: Vec<DateTime<Utc>>,
    /// Points whose `Time` was present but unparseable.
    pub skipped: usize,
}

pub fn read_timestamps(path: &Path) -> Result<TimestampStream, IngestError> {
    let content = std::fs::read_to_string(path)?;
    let stream = parse_timestamps(&content)?;
    if stream.skipped > 0 {
        log::warn!(
            "Skipped {} malformed timestamps in {}",
            stream.skipped,
            path.display()
        );
    }
    Ok(stream)
}

/// Extracts `DataPoints[].Time` in file order. Points without a time are
/// ignored; malformed times are dropped and counted.
pub fn parse_timestamps(content: &str) -> Result<TimestampStream, serde_json::Error> {
    let file: DataPointsFile = serde_json::from_str(content)?;
    let mut stream = TimestampStream::default();

    for time in file.data_points.into_iter().filter_map(|dp| dp.time) {
        if time.is_empty() {
            continue;
        }
        match parse_instant(&time) {
            Ok(ts) => stream.timestamps.push(ts),
            Err(e) => {
                log::debug!("{}", e);
                stream.skipped += 1;
            }
        }
    }

    Ok(stream)
}
