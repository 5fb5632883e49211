use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::error::TimestampError;

// `%#z` takes `+05`, `+0500` and `+05:00`.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M%#z",
    "%Y%m%dT%H%M%S%.f%#z",
    "%Y%m%dT%H%M%#z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y%m%dT%H%M%S%.f",
    "%Y%m%dT%H%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d"];

/// Parses an ISO-8601 instant into UTC.
///
/// Accepted: extended (`2024-05-08T02:04:14.5`) or basic (`20240508T020414.5`)
/// date-times with `T` or a space as separator, down to hour precision
/// (`2024-05-08T02`), and bare dates (midnight). A trailing `Z` means UTC;
/// an offset may be `+05`, `+0500` or `+05:00`; no zone at all is UTC.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>, TimestampError> {
    let trimmed = s.trim();
    let normalized = match trimmed.strip_suffix(['Z', 'z']) {
        Some(rest) => format!("{rest}+00:00"),
        None => trimmed.to_string(),
    };

    let candidates = std::iter::once(normalized.clone()).chain(with_minutes(&normalized));
    for candidate in candidates {
        for fmt in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(&candidate, fmt) {
                return Ok(dt.with_timezone(&Utc));
            }
        }

        for fmt in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(&candidate, fmt) {
                return Ok(naive.and_utc());
            }
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&normalized, fmt) {
            if let Some(naive) = date.and_hms_opt(0, 0, 0) {
                return Ok(naive.and_utc());
            }
        }
    }

    Err(TimestampError::Malformed(s.to_string()))
}

// chrono cannot build a time without minutes, so an hour-only time
// (`2024-05-08T02`, `20240508T02+05`) gets `:00` / `00` spliced in.
fn with_minutes(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let extended = bytes.get(4) == Some(&b'-') && matches!(bytes.get(10), Some(b'T' | b' '));
    let basic = bytes.get(8) == Some(&b'T') && bytes.iter().take(8).all(u8::is_ascii_digit);

    let (sep, minutes) = if extended {
        (10, ":00")
    } else if basic {
        (8, "00")
    } else {
        return None;
    };

    let hour_end = sep + 3;
    let hour = bytes.get(sep + 1..hour_end)?;
    if !hour.iter().all(u8::is_ascii_digit) {
        return None;
    }
    if !matches!(bytes.get(hour_end), None | Some(b'+' | b'-')) {
        return None;
    }

    Some(format!("{}{}{}", &s[..hour_end], minutes, &s[hour_end..]))
}
