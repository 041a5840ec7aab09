use crate::value_objects::bar::Bar;
use crate::value_objects::sampling_period::SamplingPeriod;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct DataQualityReport {
    pub rows: usize,
    pub duplicates: usize,
    pub out_of_order: usize,
    pub gaps: usize,
    pub missing_bars: usize,
    pub max_gap_seconds: Option<i64>,
    pub first_timestamp: Option<NaiveDateTime>,
    pub last_timestamp: Option<NaiveDateTime>,
    pub first_gap: Option<NaiveDateTime>,
    pub first_duplicate: Option<NaiveDateTime>,
    pub first_out_of_order: Option<NaiveDateTime>,
}

impl DataQualityReport {
    pub fn is_clean(&self) -> bool {
        self.duplicates == 0 && self.out_of_order == 0 && self.gaps == 0
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct TickReport {
    pub rows: usize,
    pub malformed_skipped: usize,
    pub out_of_order: usize,
    pub first_timestamp: Option<NaiveDateTime>,
    pub last_timestamp: Option<NaiveDateTime>,
    pub first_malformed_line: Option<usize>,
}

/// Sorts rows by `bucket_start`, keeping the last row for a repeated
/// timestamp, and reports what had to be fixed.
///
/// Gaps are measured against `period`; a gap of `k` periods counts `k - 1`
/// missing bars.
pub fn canonicalize_bars(rows: Vec<Bar>, period: SamplingPeriod) -> (Vec<Bar>, DataQualityReport) {
    let mut report = DataQualityReport::default();
    let mut by_start: BTreeMap<NaiveDateTime, Bar> = BTreeMap::new();
    let mut last_seen: Option<NaiveDateTime> = None;

    for bar in rows {
        let ts = bar.bucket_start;
        if let Some(prev) = last_seen {
            if ts < prev {
                report.out_of_order += 1;
                report.first_out_of_order.get_or_insert(ts);
            }
        }
        last_seen = Some(ts);

        if by_start.insert(ts, bar).is_some() {
            report.duplicates += 1;
            report.first_duplicate.get_or_insert(ts);
        }
    }

    let step = period.seconds();
    let mut bars = Vec::with_capacity(by_start.len());
    let mut prev: Option<NaiveDateTime> = None;
    for (ts, bar) in by_start {
        report.first_timestamp.get_or_insert(ts);
        report.last_timestamp = Some(ts);

        if let Some(prev_ts) = prev {
            let diff = (ts - prev_ts).num_seconds();
            if diff > step {
                report.gaps += 1;
                report.missing_bars += ((diff - 1) / step) as usize;
                report.first_gap.get_or_insert(ts);
                report.max_gap_seconds =
                    Some(report.max_gap_seconds.map_or(diff, |current| current.max(diff)));
            }
        }
        prev = Some(ts);
        bars.push(bar);
    }

    report.rows = bars.len();
    (bars, report)
}

#[cfg(test)]
mod tests {
    use super::canonicalize_bars;
    use crate::value_objects::bar::Bar;
    use crate::value_objects::sampling_period::SamplingPeriod;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(9, m, 0)
            .unwrap()
    }

    fn bar(m: u32, close: f64) -> Bar {
        Bar {
            bucket_start: at(m),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1,
            vwap: None,
        }
    }

    #[test]
    fn detects_duplicates_out_of_order_and_keeps_last_duplicate() {
        let rows = vec![bar(30, 1.0), bar(32, 1.0), bar(31, 1.0), bar(30, 2.0)];
        let (bars, report) = canonicalize_bars(rows, SamplingPeriod::from_seconds(60).unwrap());

        assert_eq!(bars.len(), 3);
        assert_eq!(report.rows, 3);
        assert_eq!(report.out_of_order, 2);
        assert_eq!(report.duplicates, 1);
        assert!(bars.windows(2).all(|w| w[0].bucket_start < w[1].bucket_start));
        assert_eq!(bars[0].close, 2.0);
        assert_eq!(report.gaps, 0);
    }

    #[test]
    fn counts_missing_bars_inside_gaps() {
        let rows = vec![bar(30, 1.0), bar(31, 1.0), bar(35, 1.0)];
        let (_, report) = canonicalize_bars(rows, SamplingPeriod::from_seconds(60).unwrap());
        assert_eq!(report.gaps, 1);
        assert_eq!(report.missing_bars, 3);
        assert_eq!(report.max_gap_seconds, Some(240));
        assert_eq!(report.first_gap, Some(at(35)));
        assert!(!report.is_clean());
    }

    #[test]
    fn empty_input_is_clean() {
        let (bars, report) = canonicalize_bars(Vec::new(), SamplingPeriod::from_seconds(300).unwrap());
        assert!(bars.is_empty());
        assert!(report.is_clean());
        assert_eq!(report.first_timestamp, None);
    }
}
