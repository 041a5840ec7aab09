use chrono::{DateTime, NaiveDateTime};

/// Parses the timestamp spellings the recorder has written over time.
///
/// Offsets are dropped and the wall-clock reading kept: the chart axis is
/// exchange-local time. Bare numbers are epoch seconds, or milliseconds when
/// `>= 10^12`, and are read as UTC.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, String> {
    let trimmed = value.trim();

    if let Ok(raw) = trimmed.parse::<f64>() {
        return from_epoch(raw).ok_or_else(|| format!("epoch timestamp out of range: {value}"));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f%z") {
        return Ok(dt.naive_local());
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive);
        }
    }

    Err(format!("unsupported timestamp format: {value}"))
}

fn from_epoch(raw: f64) -> Option<NaiveDateTime> {
    if !raw.is_finite() {
        return None;
    }
    let millis = if raw.abs() >= 1e12 { raw } else { raw * 1000.0 };
    let millis = millis.round() as i64;
    DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
}
