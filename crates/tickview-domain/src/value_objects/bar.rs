use crate::error::ChartDataError;
use crate::value_objects::sampling_period::SamplingPeriod;
use chrono::NaiveDateTime;
use serde::Serialize;

/// One OHLCV sample labelled with the start of its bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub bucket_start: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vwap: Option<f64>,
}

impl Bar {
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }
}

/// Bars of a single symbol at one sampling period, strictly increasing by
/// `bucket_start`.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    symbol: String,
    period: SamplingPeriod,
    bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new(
        symbol: impl Into<String>,
        period: SamplingPeriod,
        bars: Vec<Bar>,
    ) -> Result<Self, ChartDataError> {
        let symbol = symbol.into();
        if let Some(idx) = bars
            .windows(2)
            .position(|pair| pair[1].bucket_start <= pair[0].bucket_start)
        {
            return Err(ChartDataError::NonIncreasing {
                symbol,
                index: idx + 1,
            });
        }
        Ok(Self {
            symbol,
            period,
            bars,
        })
    }

    pub fn empty(symbol: impl Into<String>, period: SamplingPeriod) -> Self {
        Self {
            symbol: symbol.into(),
            period,
            bars: Vec::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn period(&self) -> SamplingPeriod {
        self.period
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}
