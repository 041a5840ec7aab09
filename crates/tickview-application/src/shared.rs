use crate::config::{AlignmentPolicyKind, Config};
use chrono::NaiveTime;
use tickview_domain::repositories::market_data::TickQuery;
use tickview_domain::services::alignment::AlignmentPolicy;
use tickview_domain::services::tick_codec::TickLayout;
use tickview_domain::value_objects::sampling_period::SamplingPeriod;
use tickview_domain::ChartDataError;

pub fn resolve_alignment_policy(config: &Config) -> Result<AlignmentPolicy, ChartDataError> {
    let periods = config
        .alignment
        .periods
        .iter()
        .map(|raw| SamplingPeriod::parse(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let mut policy = match config.alignment.policy {
        AlignmentPolicyKind::BucketEnd => AlignmentPolicy::bucket_end(&periods),
        AlignmentPolicyKind::CloseBiased => {
            // Listed periods missing from the fixed table plot at bucket end.
            let mut policy = AlignmentPolicy::close_biased();
            for period in periods {
                if !policy.supports(period) {
                    policy = policy.with_offset(period, period.seconds())?;
                }
            }
            policy
        }
    };

    for (raw_period, offset) in &config.alignment.offset_overrides {
        let period = SamplingPeriod::parse(raw_period)?;
        policy = policy.with_offset(period, *offset)?;
    }
    Ok(policy)
}

pub fn resolve_series_periods(config: &Config) -> Result<Vec<SamplingPeriod>, ChartDataError> {
    config
        .series
        .iter()
        .map(|series| SamplingPeriod::parse(&series.period))
        .collect()
}

pub fn tick_query(config: &Config) -> TickQuery {
    TickQuery {
        layout: TickLayout {
            price_field: config.ticks.price_field,
            vwap_field: config.ticks.vwap_field,
        },
        malformed: config.ticks.malformed,
    }
}

pub fn parse_marker_time(value: &str) -> Result<NaiveTime, ChartDataError> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|err| ChartDataError::Config(format!("invalid marker time {value:?}: {err}")))
}
