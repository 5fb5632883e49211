use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::error::CoordinateError;

/// Signed decimal degrees. North and east are positive.
///
/// Values are not range checked: whatever the source encodes is carried
/// through, so a latitude of 95 decodes and measures without complaint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, utoipa::ToSchema)]
pub struct Coordinate {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
}

impl Coordinate {
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
        }
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }
}

impl FromStr for Coordinate {
    type Err = CoordinateError;

    /// Decodes `<hemisphere><magnitude> <hemisphere><magnitude>`, e.g.
    /// `N42.389457 W72.526538`. Latitude comes first; `S` and `W` (either
    /// case) negate, every other leading letter keeps the sign positive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        let [lat_token, lon_token] = tokens[..] else {
            return Err(CoordinateError::malformed(
                s,
                format!("expected 2 tokens, found {}", tokens.len()),
            ));
        };

        let latitude_deg = decode_component(s, lat_token, 'S')?;
        let longitude_deg = decode_component(s, lon_token, 'W')?;

        Ok(Coordinate::new(latitude_deg, longitude_deg))
    }
}

fn decode_component(input: &str, token: &str, negative: char) -> Result<f64, CoordinateError> {
    let mut chars = token.chars();
    let hemisphere = chars
        .next()
        .ok_or_else(|| CoordinateError::malformed(input, "empty component"))?;
    let magnitude = chars.as_str();
    if magnitude.is_empty() {
        return Err(CoordinateError::malformed(
            input,
            format!("component {token:?} has no magnitude"),
        ));
    }

    let value: f64 = magnitude.parse().map_err(|e| {
        CoordinateError::malformed(input, format!("bad magnitude {magnitude:?}: {e}"))
    })?;

    if hemisphere.eq_ignore_ascii_case(&negative) {
        Ok(-value)
    } else {
        Ok(value)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.latitude_deg < 0.0 { 'S' } else { 'N' };
        let ew = if self.longitude_deg < 0.0 { 'W' } else { 'E' };
        write!(
            f,
            "{}{:.6} {}{:.6}",
            ns,
            self.latitude_deg.abs(),
            ew,
            self.longitude_deg.abs()
        )
    }
}
