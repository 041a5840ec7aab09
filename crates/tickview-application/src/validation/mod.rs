use crate::config::Config;
use crate::shared::{resolve_alignment_policy, resolve_series_periods, tick_query};
use std::time::Instant;
use tickview_domain::repositories::market_data::{MarketDataRepository, SeriesKey};
use tickview_domain::services::ohlcv::{DataQualityReport, TickReport};
use tickview_domain::services::tick_codec::MalformedTickPolicy;
use tickview_domain::ChartDataError;
use tracing::info_span;

/// Loads every configured series for `key` and reports data quality.
///
/// Malformed ticks are counted instead of failing the run. With `strict`,
/// any count above the `[data_quality]` limits is an error.
pub fn validate(
    config: &Config,
    key: &SeriesKey,
    strict: bool,
    market_data: &dyn MarketDataRepository,
) -> Result<serde_json::Value, ChartDataError> {
    let _span = info_span!(
        "validate",
        strict = strict,
        date = %key.date,
        symbol = %key.symbol
    )
    .entered();

    let stage_start = Instant::now();
    let policy = resolve_alignment_policy(config)?;
    let periods = resolve_series_periods(config)?;

    let mut series_reports: Vec<(i64, i64, DataQualityReport)> = Vec::with_capacity(periods.len());
    for period in periods {
        let offset = policy.offset_for(period)?;
        let (_, report) = market_data.load_bars(key, period)?;
        series_reports.push((period.seconds(), offset.num_seconds(), report));
    }

    let tick_report = if config.ticks.enabled {
        let mut query = tick_query(config);
        query.malformed = MalformedTickPolicy::Skip;
        let (_, report) = market_data.load_ticks(key, &query)?;
        Some(report)
    } else {
        None
    };
    metrics::histogram!("tickview.validate.load_ms")
        .record(stage_start.elapsed().as_millis() as f64);

    let limits = &config.data_quality;
    let mut violations: Vec<String> = Vec::new();
    for (period, _, report) in &series_reports {
        if report.duplicates > limits.max_duplicates {
            violations.push(format!("{period}s duplicates={}", report.duplicates));
        }
        if report.out_of_order > limits.max_out_of_order {
            violations.push(format!("{period}s out_of_order={}", report.out_of_order));
        }
        if report.gaps > limits.max_gaps {
            violations.push(format!("{period}s gaps={}", report.gaps));
        }
    }
    if let Some(report) = &tick_report {
        if report.malformed_skipped > limits.max_malformed_ticks {
            violations.push(format!("ticks malformed={}", report.malformed_skipped));
        }
        if report.out_of_order > limits.max_out_of_order {
            violations.push(format!("ticks out_of_order={}", report.out_of_order));
        }
    }

    for violation in &violations {
        tracing::warn!(violation = %violation, "data quality limit exceeded");
    }
    if strict && !violations.is_empty() {
        return Err(ChartDataError::Validation(format!(
            "data quality limits exceeded: {}",
            violations.join(", ")
        )));
    }

    Ok(serde_json::json!({
        "date": key.date,
        "symbol": key.symbol,
        "series": series_reports
            .iter()
            .map(|(period, offset, report)| serde_json::json!({
                "period_seconds": period,
                "offset_seconds": offset,
                "quality": report,
            }))
            .collect::<Vec<_>>(),
        "ticks": tick_report.as_ref().map(tick_report_json),
        "limits": {
            "max_duplicates": limits.max_duplicates,
            "max_out_of_order": limits.max_out_of_order,
            "max_gaps": limits.max_gaps,
            "max_malformed_ticks": limits.max_malformed_ticks,
        },
        "violations": violations,
        "strict": strict,
    }))
}

fn tick_report_json(report: &TickReport) -> serde_json::Value {
    serde_json::json!({
        "rows": report.rows,
        "malformed_skipped": report.malformed_skipped,
        "first_malformed_line": report.first_malformed_line,
        "out_of_order": report.out_of_order,
        "first_timestamp": report.first_timestamp,
        "last_timestamp": report.last_timestamp,
    })
}
