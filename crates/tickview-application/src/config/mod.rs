use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tickview_domain::services::tick_codec::MalformedTickPolicy;
use tickview_domain::services::vwap::VwapSource;
use tickview_domain::ChartDataError;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentPolicyKind {
    BucketEnd,
    #[default]
    CloseBiased,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    pub paths: PathsConfig,
    pub alignment: AlignmentConfig,
    pub series: Vec<SeriesConfig>,
    pub ticks: TicksConfig,
    pub vwap: VwapConfig,
    pub layout: LayoutConfig,
    pub data_quality: DataQualityConfig,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            alignment: AlignmentConfig::default(),
            series: vec![
                SeriesConfig {
                    period: "300".to_string(),
                },
                SeriesConfig {
                    period: "60".to_string(),
                },
            ],
            ticks: TicksConfig::default(),
            vwap: VwapConfig::default(),
            layout: LayoutConfig::default(),
            data_quality: DataQualityConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(deny_unknown_fields, default)]
pub struct PathsConfig {
    pub data_dir: Option<String>,
}

/// `bucket_end` shifts each listed period by itself. `close_biased` uses the
/// fixed 60s -> 60s / 300s -> 330s table and shifts any other listed period by
/// itself. `offset_overrides` (period seconds -> offset seconds) is applied on
/// top of either.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields, default)]
pub struct AlignmentConfig {
    pub policy: AlignmentPolicyKind,
    pub periods: Vec<String>,
    pub offset_overrides: BTreeMap<String, i64>,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            policy: AlignmentPolicyKind::CloseBiased,
            periods: vec!["60".to_string(), "300".to_string()],
            offset_overrides: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct SeriesConfig {
    /// Seconds (`"300"`) or a duration label (`"5m"`).
    pub period: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields, default)]
pub struct TicksConfig {
    pub enabled: bool,
    pub price_field: usize,
    pub vwap_field: usize,
    pub malformed: MalformedTickPolicy,
}

impl Default for TicksConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            price_field: 0,
            vwap_field: 4,
            malformed: MalformedTickPolicy::Error,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(deny_unknown_fields, default)]
pub struct VwapConfig {
    pub source: VwapSource,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields, default)]
pub struct LayoutConfig {
    /// Wall-clock time (`HH:MM:SS`) of the vertical market-open line.
    pub market_open_marker: Option<String>,
    pub market_open_label: String,
    pub y_axis_title: String,
    pub price_row_weight: f64,
    pub volume_row_weight: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            market_open_marker: Some("09:29:30".to_string()),
            market_open_label: "Market Open".to_string(),
            y_axis_title: "Price ($)".to_string(),
            price_row_weight: 0.7,
            volume_row_weight: 0.2,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(deny_unknown_fields, default)]
pub struct DataQualityConfig {
    pub max_duplicates: usize,
    pub max_out_of_order: usize,
    pub max_gaps: usize,
    pub max_malformed_ticks: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields, default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Rejects configs that would only fail later, mid-chart.
    pub fn validate(&self) -> Result<(), ChartDataError> {
        let policy = crate::shared::resolve_alignment_policy(self)?;
        let periods = crate::shared::resolve_series_periods(self)?;
        if periods.is_empty() {
            return Err(ChartDataError::Config(
                "at least one [[series]] entry is required".to_string(),
            ));
        }
        for period in periods {
            if !policy.supports(period) {
                return Err(ChartDataError::Config(format!(
                    "series period {period} has no alignment offset (supported: {})",
                    policy
                        .periods()
                        .map(|p| p.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                )));
            }
        }

        if self.ticks.price_field == self.ticks.vwap_field {
            return Err(ChartDataError::Config(
                "ticks.price_field and ticks.vwap_field must differ".to_string(),
            ));
        }

        if let Some(marker) = self.layout.market_open_marker.as_deref() {
            crate::shared::parse_marker_time(marker)?;
        }
        let weights = [self.layout.price_row_weight, self.layout.volume_row_weight];
        if weights.iter().any(|w| !w.is_finite() || *w <= 0.0) {
            return Err(ChartDataError::Config(
                "layout row weights must be finite and > 0".to_string(),
            ));
        }

        match self.logging.format.trim().to_lowercase().as_str() {
            "pretty" | "json" => Ok(()),
            other => Err(ChartDataError::Config(format!(
                "logging.format must be: pretty | json (got {other})"
            ))),
        }
    }
}

pub fn parse_config(contents: &str) -> Result<Config, ChartDataError> {
    let config: Config =
        toml::from_str(contents).map_err(|err| ChartDataError::Config(err.to_string()))?;
    config.validate()?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<Config, ChartDataError> {
    let contents = fs::read_to_string(path).map_err(|err| ChartDataError::Io {
        path: path.display().to_string(),
        source: err,
    })?;
    parse_config(&contents).map_err(|err| match err {
        ChartDataError::Config(msg) => {
            ChartDataError::Config(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })
}
