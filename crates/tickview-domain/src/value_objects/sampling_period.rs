use crate::error::ChartDataError;
use chrono::TimeDelta;
use serde::Serialize;
use std::fmt;

/// Longest sampling period or display offset accepted: one leap year.
pub const MAX_SPAN_SECONDS: i64 = 366 * 86_400;

/// Nominal bucket length of a bar series, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SamplingPeriod(pub(crate) i64);

impl SamplingPeriod {
    pub fn from_seconds(seconds: i64) -> Result<Self, ChartDataError> {
        if seconds <= 0 || seconds > MAX_SPAN_SECONDS {
            return Err(ChartDataError::InvalidPeriod(seconds));
        }
        Ok(Self(seconds))
    }

    /// Accepts plain seconds (`"300"`) or duration labels (`"5m"`, `"1min"`,
    /// `"1h"`).
    pub fn parse(value: &str) -> Result<Self, ChartDataError> {
        let seconds = parse_duration_like_seconds(value)?;
        Self::from_seconds(seconds)
    }

    pub fn seconds(&self) -> i64 {
        self.0
    }

    pub fn as_delta(&self) -> Result<TimeDelta, ChartDataError> {
        TimeDelta::try_seconds(self.0).ok_or(ChartDataError::InvalidPeriod(self.0))
    }

    /// Short label used in trace names (`60 -> "1m"`, `300 -> "5m"`).
    pub fn label(&self) -> String {
        let secs = self.0;
        if secs % 86_400 == 0 {
            format!("{}d", secs / 86_400)
        } else if secs % 3_600 == 0 {
            format!("{}h", secs / 3_600)
        } else if secs % 60 == 0 {
            format!("{}m", secs / 60)
        } else {
            format!("{secs}s")
        }
    }
}

impl fmt::Display for SamplingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

pub fn parse_duration_like_seconds(value: &str) -> Result<i64, ChartDataError> {
    let trimmed = value.trim().to_lowercase();
    if trimmed.is_empty() {
        return Err(ChartDataError::parse("duration", "empty duration"));
    }
    if let Ok(seconds) = trimmed.parse::<i64>() {
        return Ok(seconds);
    }

    let (number_part, unit) = if let Some(stripped) = trimmed.strip_suffix("min") {
        (stripped, "min")
    } else if let Some(stripped) = trimmed.strip_suffix("hour") {
        (stripped, "hour")
    } else if let Some(stripped) = trimmed.strip_suffix("day") {
        (stripped, "day")
    } else {
        let last = trimmed.char_indices().last().map_or(0, |(idx, _)| idx);
        trimmed.split_at(last)
    };

    let multiplier = match unit {
        "s" => 1,
        "m" | "min" => 60,
        "h" | "hour" => 3600,
        "d" | "day" => 86400,
        _ => {
            return Err(ChartDataError::parse(
                "duration",
                format!("unsupported duration unit in {value:?}"),
            ))
        }
    };

    let number: i64 = number_part
        .trim()
        .parse()
        .map_err(|_| ChartDataError::parse("duration", format!("invalid duration: {value}")))?;
    number
        .checked_mul(multiplier)
        .ok_or_else(|| ChartDataError::parse("duration", format!("duration too large: {value}")))
}
