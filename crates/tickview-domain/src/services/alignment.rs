//! Bucket-start to display-time alignment for bar series.
//!
//! Bars arrive labelled with the instant their bucket opened. Ticks are plotted
//! at the instant they were observed. To overlay both on one axis each bar is
//! moved to the moment it closed, so a candle drawn at `t` is the bar that
//! just finished at `t`.

use crate::error::ChartDataError;
use crate::value_objects::bar::{Bar, BarSeries};
use crate::value_objects::plot_time::PlotTime;
use crate::value_objects::sampling_period::{SamplingPeriod, MAX_SPAN_SECONDS};
use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;
use std::collections::BTreeMap;

/// `bucket_start + period`: the instant a bar's bucket closes.
pub fn bucket_end(
    bucket_start: NaiveDateTime,
    period: SamplingPeriod,
) -> Result<NaiveDateTime, ChartDataError> {
    bucket_start
        .checked_add_signed(period.as_delta()?)
        .ok_or(ChartDataError::TimeOutOfRange {
            at: bucket_start,
            offset_seconds: period.seconds(),
        })
}

/// Display offset per supported sampling period.
///
/// Periods absent from the table are rejected rather than guessed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlignmentPolicy {
    offsets: BTreeMap<SamplingPeriod, i64>,
}

impl AlignmentPolicy {
    /// Offset equals the period for every listed period.
    pub fn bucket_end(periods: &[SamplingPeriod]) -> Self {
        Self {
            offsets: periods.iter().map(|p| (*p, p.seconds())).collect(),
        }
    }

    /// 60s bars shift by one minute, 300s bars by five and a half minutes.
    pub fn close_biased() -> Self {
        let mut offsets = BTreeMap::new();
        offsets.insert(SamplingPeriod(60), 60);
        offsets.insert(SamplingPeriod(300), 330);
        Self { offsets }
    }

    pub fn with_offset(
        mut self,
        period: SamplingPeriod,
        offset_seconds: i64,
    ) -> Result<Self, ChartDataError> {
        if !(0..=MAX_SPAN_SECONDS).contains(&offset_seconds) {
            return Err(ChartDataError::Config(format!(
                "display offset for {period} must be in 0..={MAX_SPAN_SECONDS} (got {offset_seconds})"
            )));
        }
        self.offsets.insert(period, offset_seconds);
        Ok(self)
    }

    pub fn offset_for(&self, period: SamplingPeriod) -> Result<TimeDelta, ChartDataError> {
        let secs = *self
            .offsets
            .get(&period)
            .ok_or(ChartDataError::UnsupportedPeriod(period.seconds()))?;
        TimeDelta::try_seconds(secs).ok_or_else(|| {
            ChartDataError::Config(format!("display offset for {period} is out of range: {secs}s"))
        })
    }

    pub fn supports(&self, period: SamplingPeriod) -> bool {
        self.offsets.contains_key(&period)
    }

    pub fn periods(&self) -> impl Iterator<Item = SamplingPeriod> + '_ {
        self.offsets.keys().copied()
    }
}

impl Default for AlignmentPolicy {
    fn default() -> Self {
        Self::close_biased()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedBar {
    pub plot_time: PlotTime,
    #[serde(flatten)]
    pub bar: Bar,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlignedBarSeries {
    pub symbol: String,
    pub period: SamplingPeriod,
    pub bars: Vec<AlignedBar>,
}

impl AlignedBarSeries {
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }
}

/// Shifts every bar of `series` by the policy's offset for its period.
pub fn align_series(
    series: &BarSeries,
    policy: &AlignmentPolicy,
) -> Result<AlignedBarSeries, ChartDataError> {
    let offset = policy.offset_for(series.period())?;
    let bars = series
        .bars()
        .iter()
        .map(|bar| {
            let plot_time = PlotTime::shifted(bar.bucket_start, offset).ok_or(
                ChartDataError::TimeOutOfRange {
                    at: bar.bucket_start,
                    offset_seconds: offset.num_seconds(),
                },
            )?;
            Ok(AlignedBar {
                plot_time,
                bar: bar.clone(),
            })
        })
        .collect::<Result<Vec<_>, ChartDataError>>()?;

    Ok(AlignedBarSeries {
        symbol: series.symbol().to_string(),
        period: series.period(),
        bars,
    })
}
