use chrono::{NaiveDate, NaiveDateTime};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tickview_application::charting::{build_chart, ChartOptions};
use tickview_application::config::Config;
use tickview_application::export::export_chart;
use tickview_application::validation::validate;
use tickview_domain::repositories::artifacts::ArtifactWriter;
use tickview_domain::repositories::market_data::{MarketDataRepository, SeriesKey, TickQuery};
use tickview_domain::services::ohlcv::{DataQualityReport, TickReport};
use tickview_domain::services::overlay::{PanelRow, RenderHint, TraceValues};
use tickview_domain::services::tick_codec::MalformedTickPolicy;
use tickview_domain::services::vwap::VwapSource;
use tickview_domain::value_objects::bar::{Bar, BarSeries};
use tickview_domain::value_objects::sampling_period::SamplingPeriod;
use tickview_domain::value_objects::tick::{Tick, TickSeries};
use tickview_domain::ChartDataError;

fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

fn bar(start: NaiveDateTime, close: f64, volume: u64, vwap: Option<f64>) -> Bar {
    Bar {
        bucket_start: start,
        open: close - 0.5,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume,
        vwap,
    }
}

#[derive(Default)]
struct FakeMarketDataRepo {
    bars: BTreeMap<i64, (Vec<Bar>, DataQualityReport)>,
    ticks: Option<(Vec<Tick>, TickReport)>,
    tick_queries: RefCell<Vec<TickQuery>>,
}

impl FakeMarketDataRepo {
    fn standard() -> Self {
        let mut repo = Self::default();
        repo.bars.insert(
            300,
            (
                vec![bar(at(9, 30, 0), 101.0, 500, Some(100.8))],
                DataQualityReport::default(),
            ),
        );
        repo.bars.insert(
            60,
            (
                vec![
                    bar(at(9, 30, 0), 100.0, 100, Some(100.0)),
                    bar(at(9, 31, 0), 102.0, 300, Some(101.5)),
                ],
                DataQualityReport::default(),
            ),
        );
        repo.ticks = Some((
            vec![
                Tick {
                    recorded_at: at(9, 30, 1),
                    price: 101.25,
                    reported_vwap: 101.30,
                },
                Tick {
                    recorded_at: at(9, 30, 7),
                    price: 101.40,
                    reported_vwap: 101.32,
                },
            ],
            TickReport::default(),
        ));
        repo
    }
}

impl MarketDataRepository for FakeMarketDataRepo {
    fn load_bars(
        &self,
        key: &SeriesKey,
        period: SamplingPeriod,
    ) -> Result<(BarSeries, DataQualityReport), ChartDataError> {
        let (bars, report) = self
            .bars
            .get(&period.seconds())
            .cloned()
            .ok_or_else(|| ChartDataError::not_found(&key.date, &key.symbol, "bars"))?;
        Ok((BarSeries::new(&key.symbol, period, bars)?, report))
    }

    fn load_ticks(
        &self,
        key: &SeriesKey,
        query: &TickQuery,
    ) -> Result<(TickSeries, TickReport), ChartDataError> {
        self.tick_queries.borrow_mut().push(*query);
        let (ticks, report) = self
            .ticks
            .clone()
            .ok_or_else(|| ChartDataError::not_found(&key.date, &key.symbol, "ticks"))?;
        Ok((TickSeries::new(&key.symbol, ticks), report))
    }
}

#[derive(Default)]
struct RecordingWriter {
    ensured_dirs: RefCell<Vec<PathBuf>>,
    written: RefCell<Vec<(PathBuf, String)>>,
}

impl ArtifactWriter for RecordingWriter {
    fn ensure_dir(&self, path: &Path) -> Result<(), ChartDataError> {
        self.ensured_dirs.borrow_mut().push(path.to_path_buf());
        Ok(())
    }

    fn write_json(&self, path: &Path, contents: &str) -> Result<(), ChartDataError> {
        self.written
            .borrow_mut()
            .push((path.to_path_buf(), contents.to_string()));
        Ok(())
    }
}

fn key() -> SeriesKey {
    SeriesKey::new("2024-01-02", "AAPL")
}

fn labels(document: &tickview_application::charting::ChartDocument) -> Vec<&str> {
    document
        .overlay
        .traces
        .iter()
        .map(|trace| trace.label.as_str())
        .collect()
}

#[test]
fn chart_draws_bar_series_then_ticks_then_vwap() {
    let repo = FakeMarketDataRepo::standard();
    let document = build_chart(&Config::default(), &key(), &repo, ChartOptions::default())
        .expect("chart");

    assert_eq!(document.title, "AAPL Price and Volume on 2024-01-02");
    assert_eq!(
        labels(&document),
        vec![
            "AAPL 5m",
            "AAPL 5m volume",
            "AAPL 1m",
            "AAPL 1m volume",
            "AAPL ticks",
            "AAPL VWAP",
        ]
    );

    let traces = &document.overlay.traces;
    assert_eq!(traces[0].hint, RenderHint::Candlestick);
    assert_eq!(traces[1].hint, RenderHint::Bar);
    assert_eq!(traces[1].row, PanelRow::Volume);
    assert_eq!(traces[4].hint, RenderHint::Line);
    assert_eq!(traces[4].row, PanelRow::Price);
}

#[test]
fn bar_series_are_shifted_by_their_own_offsets() {
    let repo = FakeMarketDataRepo::standard();
    let document = build_chart(&Config::default(), &key(), &repo, ChartOptions::default())
        .expect("chart");
    let traces = &document.overlay.traces;

    // 5-minute bucket starting 09:30 lands at 09:35:30, the 1-minute one at 09:31.
    assert_eq!(traces[0].times[0].as_naive(), at(9, 35, 30));
    assert_eq!(traces[2].times[0].as_naive(), at(9, 31, 0));
    assert_eq!(traces[2].times[1].as_naive(), at(9, 32, 0));
    // Ticks keep their recording times.
    assert_eq!(traces[4].times[0].as_naive(), at(9, 30, 1));
    assert_eq!(traces[4].times[1].as_naive(), at(9, 30, 7));

    let offsets: Vec<(i64, i64)> = document
        .offsets
        .iter()
        .map(|o| (o.period_seconds, o.offset_seconds))
        .collect();
    assert_eq!(offsets, vec![(300, 330), (60, 60)]);

    assert_eq!(document.overlay.time_axis.start.unwrap().as_naive(), at(9, 30, 1));
    assert_eq!(document.overlay.time_axis.end.unwrap().as_naive(), at(9, 35, 30));
}

#[test]
fn layout_carries_market_open_marker_and_row_weights() {
    let repo = FakeMarketDataRepo::standard();
    let document = build_chart(&Config::default(), &key(), &repo, ChartOptions::default())
        .expect("chart");

    let marker = document.layout.market_open.as_ref().expect("marker");
    assert_eq!(marker.at, at(9, 29, 30));
    assert_eq!(marker.label, "Market Open");
    assert_eq!(document.layout.y_axis_title, "Price ($)");
    assert!(document.layout.shared_x_axis);
    assert!(!document.layout.range_slider);
    assert_eq!(document.layout.row_weights.price, 0.7);
}

#[test]
fn empty_series_contributes_no_trace() {
    let mut repo = FakeMarketDataRepo::standard();
    repo.bars
        .insert(300, (Vec::new(), DataQualityReport::default()));

    let document = build_chart(&Config::default(), &key(), &repo, ChartOptions::default())
        .expect("chart");
    let labels = labels(&document);
    assert!(!labels.contains(&"AAPL 5m"));
    assert!(labels.contains(&"AAPL 1m"));
    assert_eq!(document.overlay.traces.len(), 4);
}

#[test]
fn disabling_ticks_drops_tick_and_tick_vwap_lines() {
    let repo = FakeMarketDataRepo::standard();
    let document = build_chart(
        &Config::default(),
        &key(),
        &repo,
        ChartOptions {
            include_ticks: false,
        },
    )
    .expect("chart");

    assert_eq!(
        labels(&document),
        vec!["AAPL 5m", "AAPL 5m volume", "AAPL 1m", "AAPL 1m volume"]
    );
    assert!(repo.tick_queries.borrow().is_empty());
}

#[test]
fn missing_ticks_file_fails_when_ticks_enabled() {
    let mut repo = FakeMarketDataRepo::standard();
    repo.ticks = None;
    let err = build_chart(&Config::default(), &key(), &repo, ChartOptions::default())
        .unwrap_err();
    assert!(matches!(err, ChartDataError::DataNotFound { .. }));
}

#[test]
fn vwap_line_follows_configured_source() {
    let repo = FakeMarketDataRepo::standard();

    let mut config = Config::default();
    config.ticks.enabled = false;
    config.vwap.source = VwapSource::Bars;
    let document = build_chart(&config, &key(), &repo, ChartOptions::default()).unwrap();
    let vwap = document.overlay.traces.last().unwrap();
    assert_eq!(vwap.label, "AAPL VWAP");
    // Finest series is the 1-minute one.
    assert_eq!(
        vwap.values,
        TraceValues::Scalar {
            values: vec![100.0, 101.5]
        }
    );

    config.vwap.source = VwapSource::Computed;
    let document = build_chart(&config, &key(), &repo, ChartOptions::default()).unwrap();
    let vwap = document.overlay.traces.last().unwrap();
    let TraceValues::Scalar { values } = &vwap.values else {
        panic!("vwap should be a scalar trace");
    };
    // Typical prices: 100.0 and 102.0; cumulative (100*100 + 102*300) / 400.
    assert_eq!(values.len(), 2);
    assert!((values[0] - 100.0).abs() < 1e-9);
    assert!((values[1] - 101.5).abs() < 1e-9);

    config.vwap.source = VwapSource::None;
    let document = build_chart(&config, &key(), &repo, ChartOptions::default()).unwrap();
    assert!(!labels(&document).contains(&"AAPL VWAP"));
}

#[test]
fn tick_vwap_reads_reported_field() {
    let repo = FakeMarketDataRepo::standard();
    let document = build_chart(&Config::default(), &key(), &repo, ChartOptions::default())
        .expect("chart");
    let vwap = document.overlay.traces.last().unwrap();
    assert_eq!(
        vwap.values,
        TraceValues::Scalar {
            values: vec![101.30, 101.32]
        }
    );
}

#[test]
fn missing_bar_series_propagates_not_found() {
    let mut repo = FakeMarketDataRepo::standard();
    repo.bars.remove(&60);
    let err = build_chart(&Config::default(), &key(), &repo, ChartOptions::default())
        .unwrap_err();
    assert!(matches!(err, ChartDataError::DataNotFound { .. }));
}

#[test]
fn validate_reports_and_enforces_limits_when_strict() {
    let mut repo = FakeMarketDataRepo::standard();
    repo.bars.get_mut(&60).unwrap().1 = DataQualityReport {
        rows: 2,
        duplicates: 1,
        ..DataQualityReport::default()
    };
    repo.ticks.as_mut().unwrap().1 = TickReport {
        rows: 2,
        malformed_skipped: 3,
        first_malformed_line: Some(5),
        ..TickReport::default()
    };
    let config = Config::default();

    let report = validate(&config, &key(), false, &repo).expect("lenient validate");
    assert_eq!(report["series"][0]["period_seconds"], 300);
    assert_eq!(report["series"][0]["offset_seconds"], 330);
    assert_eq!(report["series"][1]["quality"]["duplicates"], 1);
    assert_eq!(report["ticks"]["malformed_skipped"], 3);
    assert_eq!(report["violations"].as_array().unwrap().len(), 2);
    assert_eq!(
        repo.tick_queries.borrow().last().unwrap().malformed,
        MalformedTickPolicy::Skip
    );

    let err = validate(&config, &key(), true, &repo).unwrap_err();
    assert!(matches!(err, ChartDataError::Validation(_)));

    let mut relaxed = config.clone();
    relaxed.data_quality.max_duplicates = 1;
    relaxed.data_quality.max_malformed_ticks = 3;
    let report = validate(&relaxed, &key(), true, &repo).expect("within limits");
    assert!(report["violations"].as_array().unwrap().is_empty());
}

#[test]
fn export_writes_pretty_json_document() {
    let repo = FakeMarketDataRepo::standard();
    let document = build_chart(&Config::default(), &key(), &repo, ChartOptions::default())
        .expect("chart");
    let writer = RecordingWriter::default();
    let path = Path::new("out/2024-01-02/AAPL.json");

    export_chart(&document, path, &writer).expect("export");

    assert_eq!(
        writer.ensured_dirs.borrow().as_slice(),
        &[PathBuf::from("out/2024-01-02")]
    );
    let written = writer.written.borrow();
    assert_eq!(written[0].0, path);
    let json: serde_json::Value = serde_json::from_str(&written[0].1).unwrap();
    assert_eq!(json["symbol"], "AAPL");
    assert_eq!(json["overlay"]["traces"][0]["label"], "AAPL 5m");
    assert_eq!(json["overlay"]["traces"][0]["values"]["kind"], "ohlc");
    assert_eq!(json["overlay"]["traces"][0]["times"][0], "2024-01-02T09:35:30");
    assert_eq!(json["layout"]["market_open"]["label"], "Market Open");
}
