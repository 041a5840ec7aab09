//! Multi-series overlay assembly.
//!
//! Each input keeps its own time axis and point density. Nothing is
//! resampled, interpolated, sorted or gap-filled; the only thing the traces
//! share is the continuous time axis they are drawn on.

use crate::services::alignment::AlignedBarSeries;
use crate::value_objects::plot_time::PlotTime;
use crate::value_objects::tick::TickSeries;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderHint {
    Candlestick,
    Bar,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelRow {
    Price,
    Volume,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickField {
    Price,
    ReportedVwap,
}

#[derive(Debug, Clone, Copy)]
pub enum LineSource<'a> {
    Ticks(&'a TickSeries, TickField),
    Points(&'a [(PlotTime, f64)]),
}

/// One (series, display role) pair, in draw order.
#[derive(Debug, Clone)]
pub enum OverlayInput<'a> {
    Candles {
        label: String,
        series: &'a AlignedBarSeries,
    },
    Volume {
        label: String,
        series: &'a AlignedBarSeries,
    },
    Line {
        label: String,
        source: LineSource<'a>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceValues {
    Ohlc {
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
    },
    Scalar {
        values: Vec<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayTrace {
    pub label: String,
    pub hint: RenderHint,
    pub row: PanelRow,
    pub show_legend: bool,
    pub times: Vec<PlotTime>,
    pub values: TraceValues,
}

impl OverlayTrace {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TimeAxis {
    pub start: Option<PlotTime>,
    pub end: Option<PlotTime>,
}

impl TimeAxis {
    fn extend(&mut self, time: PlotTime) {
        self.start = Some(self.start.map_or(time, |s| s.min(time)));
        self.end = Some(self.end.map_or(time, |e| e.max(time)));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlignedOverlaySet {
    pub time_axis: TimeAxis,
    pub traces: Vec<OverlayTrace>,
}

pub fn assemble(inputs: &[OverlayInput<'_>]) -> AlignedOverlaySet {
    let mut overlay = AlignedOverlaySet::default();

    for input in inputs {
        let trace = match input {
            OverlayInput::Candles { label, series } => candle_trace(label, series),
            OverlayInput::Volume { label, series } => volume_trace(label, series),
            OverlayInput::Line { label, source } => line_trace(label, *source),
        };
        if trace.is_empty() {
            continue;
        }
        for time in &trace.times {
            overlay.time_axis.extend(*time);
        }
        overlay.traces.push(trace);
    }

    overlay
}

fn candle_trace(label: &str, series: &AlignedBarSeries) -> OverlayTrace {
    let n = series.len();
    let mut times = Vec::with_capacity(n);
    let (mut open, mut high, mut low, mut close) = (
        Vec::with_capacity(n),
        Vec::with_capacity(n),
        Vec::with_capacity(n),
        Vec::with_capacity(n),
    );
    for aligned in &series.bars {
        times.push(aligned.plot_time);
        open.push(aligned.bar.open);
        high.push(aligned.bar.high);
        low.push(aligned.bar.low);
        close.push(aligned.bar.close);
    }
    OverlayTrace {
        label: label.to_string(),
        hint: RenderHint::Candlestick,
        row: PanelRow::Price,
        show_legend: true,
        times,
        values: TraceValues::Ohlc {
            open,
            high,
            low,
            close,
        },
    }
}

fn volume_trace(label: &str, series: &AlignedBarSeries) -> OverlayTrace {
    let (times, values): (Vec<PlotTime>, Vec<f64>) = series
        .bars
        .iter()
        .map(|aligned| (aligned.plot_time, aligned.bar.volume as f64))
        .unzip();
    OverlayTrace {
        label: label.to_string(),
        hint: RenderHint::Bar,
        row: PanelRow::Volume,
        show_legend: false,
        times,
        values: TraceValues::Scalar { values },
    }
}

fn line_trace(label: &str, source: LineSource<'_>) -> OverlayTrace {
    let (times, values): (Vec<PlotTime>, Vec<f64>) = match source {
        LineSource::Ticks(ticks, field) => ticks
            .ticks
            .iter()
            .map(|tick| {
                let value = match field {
                    TickField::Price => tick.price,
                    TickField::ReportedVwap => tick.reported_vwap,
                };
                (PlotTime::observed(tick.recorded_at), value)
            })
            .unzip(),
        LineSource::Points(points) => points.iter().copied().unzip(),
    };
    OverlayTrace {
        label: label.to_string(),
        hint: RenderHint::Line,
        row: PanelRow::Price,
        show_legend: true,
        times,
        values: TraceValues::Scalar { values },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::alignment::{align_series, AlignmentPolicy};
    use crate::value_objects::bar::{Bar, BarSeries};
    use crate::value_objects::sampling_period::SamplingPeriod;
    use crate::value_objects::tick::Tick;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn aligned(secs: i64, minutes: &[u32]) -> AlignedBarSeries {
        let bars = minutes
            .iter()
            .map(|m| Bar {
                bucket_start: at(9, *m, 0),
                open: 1.0,
                high: 2.0,
                low: 0.5,
                close: 1.5,
                volume: 10 + *m as u64,
                vwap: None,
            })
            .collect();
        let series =
            BarSeries::new("AAPL", SamplingPeriod::from_seconds(secs).unwrap(), bars).unwrap();
        align_series(&series, &AlignmentPolicy::default()).unwrap()
    }

    #[test]
    fn keeps_each_series_native_points_in_input_order() {
        let fine = aligned(60, &[30, 31, 32]);
        let coarse = aligned(300, &[30]);
        let overlay = assemble(&[
            OverlayInput::Candles {
                label: "AAPL 5m".to_string(),
                series: &coarse,
            },
            OverlayInput::Volume {
                label: "AAPL 5m volume".to_string(),
                series: &coarse,
            },
            OverlayInput::Candles {
                label: "AAPL 1m".to_string(),
                series: &fine,
            },
        ]);

        assert_eq!(overlay.traces.len(), 3);
        assert_eq!(overlay.traces[0].label, "AAPL 5m");
        assert_eq!(overlay.traces[0].len(), 1);
        assert_eq!(overlay.traces[2].len(), 3);
        assert_eq!(overlay.traces[1].hint, RenderHint::Bar);
        assert_eq!(overlay.traces[1].row, PanelRow::Volume);
        assert!(!overlay.traces[1].show_legend);
        assert_eq!(
            overlay.traces[1].values,
            TraceValues::Scalar { values: vec![40.0] }
        );
        assert_eq!(overlay.time_axis.start.unwrap().as_naive(), at(9, 31, 0));
        assert_eq!(overlay.time_axis.end.unwrap().as_naive(), at(9, 35, 30));
    }

    #[test]
    fn empty_inputs_contribute_no_traces() {
        let empty = aligned(60, &[]);
        let no_ticks = TickSeries::new("AAPL", Vec::new());
        let overlay = assemble(&[
            OverlayInput::Candles {
                label: "AAPL 1m".to_string(),
                series: &empty,
            },
            OverlayInput::Line {
                label: "AAPL ticks".to_string(),
                source: LineSource::Ticks(&no_ticks, TickField::Price),
            },
            OverlayInput::Line {
                label: "AAPL VWAP".to_string(),
                source: LineSource::Points(&[]),
            },
        ]);
        assert!(overlay.traces.is_empty());
        assert_eq!(overlay.time_axis, TimeAxis::default());
    }

    #[test]
    fn ticks_are_plotted_at_observation_time_without_reordering() {
        let ticks = TickSeries::new(
            "AAPL",
            vec![
                Tick {
                    recorded_at: at(9, 30, 5),
                    price: 101.0,
                    reported_vwap: 100.9,
                },
                Tick {
                    recorded_at: at(9, 30, 2),
                    price: 101.5,
                    reported_vwap: 101.0,
                },
            ],
        );
        let overlay = assemble(&[OverlayInput::Line {
            label: "AAPL VWAP".to_string(),
            source: LineSource::Ticks(&ticks, TickField::ReportedVwap),
        }]);

        let trace = &overlay.traces[0];
        assert_eq!(trace.hint, RenderHint::Line);
        assert_eq!(trace.times[0].as_naive(), at(9, 30, 5));
        assert_eq!(trace.times[1].as_naive(), at(9, 30, 2));
        assert_eq!(
            trace.values,
            TraceValues::Scalar {
                values: vec![100.9, 101.0]
            }
        );
        assert_eq!(overlay.time_axis.start.unwrap().as_naive(), at(9, 30, 2));
        assert_eq!(overlay.time_axis.end.unwrap().as_naive(), at(9, 30, 5));
    }
}
