use super::timestamp::parse_timestamp;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tickview_domain::repositories::market_data::TickQuery;
use tickview_domain::services::ohlcv::TickReport;
use tickview_domain::services::tick_codec::{decode_tick_fields, MalformedTickPolicy};
use tickview_domain::value_objects::tick::{Tick, TickSeries};
use tickview_domain::ChartDataError;

#[derive(Debug, Deserialize)]
struct TickRecord {
    #[serde(rename = "recordedAt")]
    recorded_at: String,
    tick: String,
}

/// Reads a JSON-lines tick file. Blank lines are ignored; delivery order is
/// preserved and regressions are only counted.
pub fn load_ticks_jsonl(
    path: &Path,
    symbol: &str,
    query: &TickQuery,
) -> Result<(TickSeries, TickReport), ChartDataError> {
    let io_error = |source| ChartDataError::Io {
        path: path.display().to_string(),
        source,
    };
    let file = File::open(path).map_err(io_error)?;
    let reader = BufReader::new(file);

    let mut ticks: Vec<Tick> = Vec::new();
    let mut report = TickReport::default();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(io_error)?;
        if line.trim().is_empty() {
            continue;
        }

        let tick = match parse_line(&line, query) {
            Ok(tick) => tick,
            Err(reason) => match query.malformed {
                MalformedTickPolicy::Error => {
                    return Err(ChartDataError::MalformedTick {
                        line: line_no,
                        reason,
                    })
                }
                MalformedTickPolicy::Skip => {
                    tracing::warn!(
                        path = %path.display(),
                        line = line_no,
                        reason = %reason,
                        "skipping malformed tick"
                    );
                    metrics::counter!("tickview.ticks.malformed_skipped").increment(1);
                    report.malformed_skipped += 1;
                    report.first_malformed_line.get_or_insert(line_no);
                    continue;
                }
            },
        };

        if let Some(prev) = ticks.last() {
            if tick.recorded_at < prev.recorded_at {
                report.out_of_order += 1;
            }
        }
        report.first_timestamp.get_or_insert(tick.recorded_at);
        report.last_timestamp = Some(tick.recorded_at);
        ticks.push(tick);
    }

    report.rows = ticks.len();
    Ok((TickSeries::new(symbol, ticks), report))
}

fn parse_line(line: &str, query: &TickQuery) -> Result<Tick, String> {
    let record: TickRecord =
        serde_json::from_str(line).map_err(|err| format!("invalid JSON record: {err}"))?;
    let recorded_at = parse_timestamp(&record.recorded_at)?;
    let fields = decode_tick_fields(&record.tick, &query.layout)?;
    Ok(Tick {
        recorded_at,
        price: fields.price,
        reported_vwap: fields.reported_vwap,
    })
}
