use crate::value_objects::sampling_period::SamplingPeriod;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SymbolEntry {
    pub periods: BTreeSet<SamplingPeriod>,
    pub has_ticks: bool,
}

/// Snapshot of which dates and symbols have data on disk.
///
/// Built once per call by a `CatalogRepository`; never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Catalog {
    dates: BTreeMap<String, BTreeMap<String, SymbolEntry>>,
}

impl Catalog {
    pub fn from_entries(dates: BTreeMap<String, BTreeMap<String, SymbolEntry>>) -> Self {
        Self { dates }
    }

    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.dates.keys().map(String::as_str)
    }

    pub fn symbols(&self, date: &str) -> impl Iterator<Item = &str> {
        self.dates
            .get(date)
            .into_iter()
            .flat_map(|symbols| symbols.keys().map(String::as_str))
    }

    pub fn entry(&self, date: &str, symbol: &str) -> Option<&SymbolEntry> {
        self.dates.get(date)?.get(symbol)
    }

    pub fn has_date(&self, date: &str) -> bool {
        self.dates.contains_key(date)
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
