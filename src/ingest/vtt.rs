use serde_json::Value;
use std::path::Path;

use super::error::IngestError;
use crate::geo::Coordinate;

#[derive(Debug, Default, PartialEq)]
pub struct CueStream {
    /// Entity named by the first usable cue; every later cue must match it.
    pub entity: Option<String>,
    /// Coordinate strings in cue order, each one known to decode.
    pub coordinates: Vec<String>,
    pub skipped: usize,
}

pub fn read_cues(path: &Path) -> Result<CueStream, IngestError> {
    let content = std::fs::read_to_string(path)?;
    let stream = parse_cues(&content);
    if stream.skipped > 0 {
        log::warn!("Skipped {} cues in {}", stream.skipped, path.display());
    }
    Ok(stream)
}

/// Reads blank-line separated cue blocks whose payload (every line after the
/// timing line) is a JSON object carrying `gpsCoordinates` and `officer`.
pub fn parse_cues(content: &str) -> CueStream {
    let content = content.replace("\r\n", "\n");
    let mut stream = CueStream::default();

    for block in content.split("\n\n") {
        let lines: Vec<&str> = block.trim().split('\n').collect();
        if lines.len() < 2 {
            continue;
        }

        let payload: Value = match serde_json::from_str(&lines[1..].join("\n")) {
            Ok(v) => v,
            Err(_) => {
                stream.skipped += 1;
                continue;
            }
        };

        let gps = payload.get("gpsCoordinates").filter(|v| is_present(v));
        let officer = payload
            .get("officer")
            .and_then(Value::as_str)
            .filter(|o| !o.is_empty());
        let (Some(gps), Some(officer)) = (gps, officer) else {
            stream.skipped += 1;
            continue;
        };

        match &stream.entity {
            None => stream.entity = Some(officer.to_string()),
            Some(locked) if locked != officer => {
                log::debug!("Cue for {} in a source locked to {}", officer, locked);
                stream.skipped += 1;
                continue;
            }
            Some(_) => {}
        }

        // a non-string value still locks the officer above, then fails here
        let Some(gps) = gps.as_str() else {
            log::debug!("gpsCoordinates is not a string: {}", gps);
            stream.skipped += 1;
            continue;
        };
        if let Err(e) = gps.parse::<Coordinate>() {
            log::debug!("{}", e);
            stream.skipped += 1;
            continue;
        }

        stream.coordinates.push(gps.to_string());
    }

    stream
}

/// Anything but a missing field, `null`, `false`, zero or an empty
/// string/array/object counts as a value being supplied.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
