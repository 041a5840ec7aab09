use super::timestamp::parse_timestamp;
use serde::Deserialize;
use std::fs::File;
use std::path::Path;
use tickview_domain::services::ohlcv::{canonicalize_bars, DataQualityReport};
use tickview_domain::value_objects::bar::{Bar, BarSeries};
use tickview_domain::value_objects::sampling_period::SamplingPeriod;
use tickview_domain::ChartDataError;

/// One row of a recorder bar file. Columns are matched by header name;
/// extra columns are ignored.
#[derive(Debug, Deserialize)]
pub struct BarRecord {
    pub time: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Kept as text so large integer volumes are not rounded through `f64`.
    pub volume: String,
    #[serde(default)]
    pub vwap: Option<f64>,
}

pub fn load_bars_csv(
    path: &Path,
    symbol: &str,
    period: SamplingPeriod,
) -> Result<(BarSeries, DataQualityReport), ChartDataError> {
    let file = File::open(path).map_err(|source| ChartDataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut rows = Vec::new();
    for (idx, result) in reader.deserialize::<BarRecord>().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        let record = result.map_err(|err| row_error(path, line, err))?;
        rows.push(bar_from_record(record).map_err(|message| row_error(path, line, message))?);
    }

    let (bars, report) = canonicalize_bars(rows, period);
    let series = BarSeries::new(symbol, period, bars)?;
    Ok((series, report))
}

fn bar_from_record(record: BarRecord) -> Result<Bar, String> {
    let bucket_start = parse_timestamp(&record.time)?;
    for (name, value) in [
        ("open", record.open),
        ("high", record.high),
        ("low", record.low),
        ("close", record.close),
    ] {
        if !value.is_finite() {
            return Err(format!("{name} is not finite: {value}"));
        }
    }
    let volume = parse_volume(&record.volume)?;

    Ok(Bar {
        bucket_start,
        open: record.open,
        high: record.high,
        low: record.low,
        close: record.close,
        volume,
        vwap: record.vwap.filter(|value| value.is_finite()),
    })
}

/// Integer text first; integral floats such as `"100.0"` only below 2^53,
/// where `f64` is still exact.
fn parse_volume(raw: &str) -> Result<u64, String> {
    if let Ok(volume) = raw.parse::<u64>() {
        return Ok(volume);
    }
    const EXACT_LIMIT: f64 = 9_007_199_254_740_992.0;
    match raw.parse::<f64>() {
        Ok(value)
            if value.is_finite()
                && value >= 0.0
                && value.fract() == 0.0
                && value <= EXACT_LIMIT =>
        {
            Ok(value as u64)
        }
        _ => Err(format!("volume must be a non-negative integer, got {raw:?}")),
    }
}

fn row_error(path: &Path, line: usize, message: impl ToString) -> ChartDataError {
    ChartDataError::parse(format!("{} line {}", path.display(), line), message)
}
