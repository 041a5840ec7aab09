pub mod bars_csv;
pub mod ticks_jsonl;
pub mod timestamp;

use crate::scan::collect_files;
use std::path::PathBuf;
use tickview_domain::repositories::market_data::{MarketDataRepository, SeriesKey, TickQuery};
use tickview_domain::services::ohlcv::{DataQualityReport, TickReport};
use tickview_domain::value_objects::bar::BarSeries;
use tickview_domain::value_objects::sampling_period::SamplingPeriod;
use tickview_domain::value_objects::tick::TickSeries;
use tickview_domain::ChartDataError;

/// Reads `{SYMBOL}_{PERIOD}_S.csv` and `{SYMBOL}_ticks.json` from
/// `{root}/{date}/`, or from the first subdirectory of it holding the file,
/// the same places the catalog scan looks.
#[derive(Debug, Clone)]
pub struct FilesystemMarketDataRepository {
    root: PathBuf,
}

impl FilesystemMarketDataRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn bar_path(
        &self,
        key: &SeriesKey,
        period: SamplingPeriod,
    ) -> Result<Option<PathBuf>, ChartDataError> {
        self.locate(
            &key.date,
            &format!("{}_{}_S.csv", key.symbol, period.seconds()),
        )
    }

    pub fn tick_path(&self, key: &SeriesKey) -> Result<Option<PathBuf>, ChartDataError> {
        self.locate(&key.date, &format!("{}_ticks.json", key.symbol))
    }

    fn locate(&self, date: &str, file_name: &str) -> Result<Option<PathBuf>, ChartDataError> {
        let date_dir = self.root.join(date);
        let direct = date_dir.join(file_name);
        if direct.is_file() {
            return Ok(Some(direct));
        }
        if !date_dir.is_dir() {
            return Ok(None);
        }
        Ok(collect_files(&date_dir)?
            .into_iter()
            .find(|path| path.file_name().and_then(|n| n.to_str()) == Some(file_name)))
    }
}

impl MarketDataRepository for FilesystemMarketDataRepository {
    fn load_bars(
        &self,
        key: &SeriesKey,
        period: SamplingPeriod,
    ) -> Result<(BarSeries, DataQualityReport), ChartDataError> {
        let Some(path) = self.bar_path(key, period)? else {
            return Err(ChartDataError::not_found(
                &key.date,
                &key.symbol,
                format!("{period} bars under {}", self.root.join(&key.date).display()),
            ));
        };
        tracing::debug!(path = %path.display(), "loading bars");
        bars_csv::load_bars_csv(&path, &key.symbol, period)
    }

    fn load_ticks(
        &self,
        key: &SeriesKey,
        query: &TickQuery,
    ) -> Result<(TickSeries, TickReport), ChartDataError> {
        let Some(path) = self.tick_path(key)? else {
            return Err(ChartDataError::not_found(
                &key.date,
                &key.symbol,
                format!("ticks under {}", self.root.join(&key.date).display()),
            ));
        };
        tracing::debug!(path = %path.display(), "loading ticks");
        ticks_jsonl::load_ticks_jsonl(&path, &key.symbol, query)
    }
}
