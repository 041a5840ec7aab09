use crate::config::Config;
use crate::shared::{
    parse_marker_time, resolve_alignment_policy, resolve_series_periods, tick_query,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::time::Instant;
use tickview_domain::repositories::market_data::{MarketDataRepository, SeriesKey};
use tickview_domain::services::alignment::{align_series, AlignedBarSeries, AlignmentPolicy};
use tickview_domain::services::ohlcv::DataQualityReport;
use tickview_domain::services::overlay::{
    assemble, AlignedOverlaySet, LineSource, OverlayInput, TickField,
};
use tickview_domain::services::vwap::{cumulative_vwap, reported_bar_vwap, VwapSource};
use tickview_domain::value_objects::plot_time::PlotTime;
use tickview_domain::value_objects::tick::TickSeries;
use tickview_domain::ChartDataError;
use tracing::info_span;

#[derive(Debug, Clone, Copy)]
pub struct ChartOptions {
    pub include_ticks: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            include_ticks: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowWeights {
    pub price: f64,
    pub volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketOpenMarker {
    pub at: NaiveDateTime,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLayout {
    pub y_axis_title: String,
    pub shared_x_axis: bool,
    pub range_slider: bool,
    pub row_weights: RowWeights,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_open: Option<MarketOpenMarker>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedOffset {
    pub period_seconds: i64,
    pub offset_seconds: i64,
}

/// Everything the rendering boundary needs for one (date, symbol) chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDocument {
    pub date: String,
    pub symbol: String,
    pub title: String,
    pub layout: ChartLayout,
    pub offsets: Vec<AppliedOffset>,
    pub overlay: AlignedOverlaySet,
}

pub fn build_chart(
    config: &Config,
    key: &SeriesKey,
    market_data: &dyn MarketDataRepository,
    options: ChartOptions,
) -> Result<ChartDocument, ChartDataError> {
    let _span = info_span!(
        "build_chart",
        date = %key.date,
        symbol = %key.symbol,
        vwap = ?config.vwap.source
    )
    .entered();

    let policy = resolve_alignment_policy(config)?;
    let periods = resolve_series_periods(config)?;

    let load_start = Instant::now();
    let mut aligned: Vec<AlignedBarSeries> = Vec::with_capacity(periods.len());
    for period in periods {
        let (series, report) = market_data.load_bars(key, period)?;
        log_quality(key, &period.to_string(), &report);
        aligned.push(align_series(&series, &policy)?);
    }

    let ticks = if config.ticks.enabled && options.include_ticks {
        let (ticks, report) = market_data.load_ticks(key, &tick_query(config))?;
        tracing::info!(
            rows = report.rows,
            malformed_skipped = report.malformed_skipped,
            out_of_order = report.out_of_order,
            "ticks loaded"
        );
        Some(ticks)
    } else {
        None
    };
    metrics::histogram!("tickview.chart.load_ms").record(load_start.elapsed().as_millis() as f64);

    let assemble_start = Instant::now();
    let finest = aligned.iter().min_by_key(|series| series.period);
    let vwap_points: Vec<(PlotTime, f64)> = match (config.vwap.source, finest) {
        (VwapSource::Bars, Some(series)) => reported_bar_vwap(series),
        (VwapSource::Computed, Some(series)) => cumulative_vwap(series),
        _ => Vec::new(),
    };

    let inputs = overlay_inputs(
        &key.symbol,
        &aligned,
        ticks.as_ref(),
        config.vwap.source,
        &vwap_points,
    );
    let overlay = assemble(&inputs);
    metrics::histogram!("tickview.chart.assemble_ms")
        .record(assemble_start.elapsed().as_millis() as f64);
    tracing::info!(traces = overlay.traces.len(), "overlay assembled");

    Ok(ChartDocument {
        date: key.date.clone(),
        symbol: key.symbol.clone(),
        title: format!("{} Price and Volume on {}", key.symbol, key.date),
        layout: build_layout(config, &key.date)?,
        offsets: applied_offsets(&policy, &aligned)?,
        overlay,
    })
}

/// Draw order: every bar series (candles then volume) in configured order,
/// then ticks, then VWAP.
fn overlay_inputs<'a>(
    symbol: &str,
    aligned: &'a [AlignedBarSeries],
    ticks: Option<&'a TickSeries>,
    vwap_source: VwapSource,
    vwap_points: &'a [(PlotTime, f64)],
) -> Vec<OverlayInput<'a>> {
    let mut inputs = Vec::with_capacity(aligned.len() * 2 + 2);
    for series in aligned {
        let label = format!("{} {}", symbol, series.period.label());
        inputs.push(OverlayInput::Candles {
            label: label.clone(),
            series,
        });
        inputs.push(OverlayInput::Volume {
            label: format!("{label} volume"),
            series,
        });
    }

    if let Some(ticks) = ticks {
        inputs.push(OverlayInput::Line {
            label: format!("{symbol} ticks"),
            source: LineSource::Ticks(ticks, TickField::Price),
        });
    }

    let vwap_label = format!("{symbol} VWAP");
    match (vwap_source, ticks) {
        (VwapSource::Ticks, Some(ticks)) => inputs.push(OverlayInput::Line {
            label: vwap_label,
            source: LineSource::Ticks(ticks, TickField::ReportedVwap),
        }),
        (VwapSource::Bars | VwapSource::Computed, _) => inputs.push(OverlayInput::Line {
            label: vwap_label,
            source: LineSource::Points(vwap_points),
        }),
        (VwapSource::Ticks, None) => {
            tracing::debug!("vwap source is ticks but ticks are disabled; no VWAP line");
        }
        (VwapSource::None, _) => {}
    }

    inputs
}

fn build_layout(config: &Config, date: &str) -> Result<ChartLayout, ChartDataError> {
    let market_open = match config.layout.market_open_marker.as_deref() {
        Some(raw) => {
            let time = parse_marker_time(raw)?;
            match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
                Ok(day) => Some(MarketOpenMarker {
                    at: day.and_time(time),
                    label: config.layout.market_open_label.clone(),
                }),
                Err(_) => {
                    tracing::debug!(date, "date directory is not YYYY-MM-DD; no market-open marker");
                    None
                }
            }
        }
        None => None,
    };

    Ok(ChartLayout {
        y_axis_title: config.layout.y_axis_title.clone(),
        shared_x_axis: true,
        range_slider: false,
        row_weights: RowWeights {
            price: config.layout.price_row_weight,
            volume: config.layout.volume_row_weight,
        },
        market_open,
    })
}

fn applied_offsets(
    policy: &AlignmentPolicy,
    aligned: &[AlignedBarSeries],
) -> Result<Vec<AppliedOffset>, ChartDataError> {
    aligned
        .iter()
        .map(|series| {
            Ok(AppliedOffset {
                period_seconds: series.period.seconds(),
                offset_seconds: policy.offset_for(series.period)?.num_seconds(),
            })
        })
        .collect()
}

fn log_quality(key: &SeriesKey, what: &str, report: &DataQualityReport) {
    if report.is_clean() {
        tracing::info!(series = what, rows = report.rows, "bars loaded");
        return;
    }
    tracing::warn!(
        date = %key.date,
        symbol = %key.symbol,
        series = what,
        rows = report.rows,
        duplicates = report.duplicates,
        out_of_order = report.out_of_order,
        gaps = report.gaps,
        missing_bars = report.missing_bars,
        "bars loaded with data quality issues"
    );
}
