use crate::error::ChartDataError;
use crate::services::ohlcv::{DataQualityReport, TickReport};
use crate::services::tick_codec::{MalformedTickPolicy, TickLayout};
use crate::value_objects::bar::BarSeries;
use crate::value_objects::sampling_period::SamplingPeriod;
use crate::value_objects::tick::TickSeries;

/// One (date, symbol) selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesKey {
    pub date: String,
    pub symbol: String,
}

impl SeriesKey {
    pub fn new(date: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            symbol: symbol.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TickQuery {
    pub layout: TickLayout,
    pub malformed: MalformedTickPolicy,
}

pub trait MarketDataRepository {
    fn load_bars(
        &self,
        key: &SeriesKey,
        period: SamplingPeriod,
    ) -> Result<(BarSeries, DataQualityReport), ChartDataError>;

    fn load_ticks(
        &self,
        key: &SeriesKey,
        query: &TickQuery,
    ) -> Result<(TickSeries, TickReport), ChartDataError>;
}
