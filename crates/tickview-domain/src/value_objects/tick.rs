use chrono::NaiveDateTime;
use serde::Serialize;

/// One trade/quote observation, stamped with its true recording time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub recorded_at: NaiveDateTime,
    pub price: f64,
    pub reported_vwap: f64,
}

/// Ticks in recording order. Spacing is irregular and the order is kept as
/// delivered.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickSeries {
    pub symbol: String,
    pub ticks: Vec<Tick>,
}

impl TickSeries {
    pub fn new(symbol: impl Into<String>, ticks: Vec<Tick>) -> Self {
        Self {
            symbol: symbol.into(),
            ticks,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }
}
