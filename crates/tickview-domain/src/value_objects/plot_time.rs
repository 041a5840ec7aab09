use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;
use std::fmt;

/// Position on the shared chart time axis.
///
/// Not interchangeable with a bar's raw `bucket_start`: bars only
/// get a `PlotTime` through the alignment service, ticks through their
/// observation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PlotTime(NaiveDateTime);

impl PlotTime {
    /// True event time, used for tick-level data which is never shifted.
    pub fn observed(at: NaiveDateTime) -> Self {
        Self(at)
    }

    /// `None` when the shift leaves the representable date range.
    pub(crate) fn shifted(bucket_start: NaiveDateTime, offset: TimeDelta) -> Option<Self> {
        bucket_start.checked_add_signed(offset).map(Self)
    }

    pub fn as_naive(&self) -> NaiveDateTime {
        self.0
    }
}

impl fmt::Display for PlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%S%.f"))
    }
}
