use crate::scan::{collect_files, read_dir, visible_name};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tickview_domain::repositories::catalog::CatalogRepository;
use tickview_domain::value_objects::catalog::{Catalog, SymbolEntry};
use tickview_domain::value_objects::sampling_period::SamplingPeriod;
use tickview_domain::ChartDataError;

const BAR_SUFFIX: &str = "_S.csv";
const TICK_SUFFIX: &str = "_ticks.json";

/// Scans `{root}/{date}/**` for recorder files.
///
/// Every immediate subdirectory of the root is a date, even when it holds no
/// recognizable files. Hidden entries are skipped.
#[derive(Debug, Clone)]
pub struct FilesystemCatalogRepository {
    root: PathBuf,
}

impl FilesystemCatalogRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl CatalogRepository for FilesystemCatalogRepository {
    fn load_catalog(&self) -> Result<Catalog, ChartDataError> {
        if !self.root.is_dir() {
            return Err(ChartDataError::not_found(
                "*",
                "*",
                format!("data directory {}", self.root.display()),
            ));
        }

        let mut dates: BTreeMap<String, BTreeMap<String, SymbolEntry>> = BTreeMap::new();
        for entry in read_dir(&self.root)? {
            let path = entry.path();
            let Some(date) = visible_name(&path) else {
                continue;
            };
            if !path.is_dir() {
                continue;
            }

            let mut symbols: BTreeMap<String, SymbolEntry> = BTreeMap::new();
            for file in collect_files(&path)? {
                let Some(name) = visible_name(&file) else {
                    continue;
                };
                if let Some((symbol, period)) = parse_bar_file_name(&name) {
                    symbols.entry(symbol).or_default().periods.insert(period);
                } else if let Some(symbol) = parse_tick_file_name(&name) {
                    symbols.entry(symbol).or_default().has_ticks = true;
                }
            }
            tracing::debug!(date = %date, symbols = symbols.len(), "scanned date directory");
            dates.insert(date, symbols);
        }

        Ok(Catalog::from_entries(dates))
    }
}

/// `AAPL_60_S.csv` -> `("AAPL", 60s)`. The symbol is one or more uppercase
/// ASCII letters, followed by optional underscores and the period digits.
pub fn parse_bar_file_name(name: &str) -> Option<(String, SamplingPeriod)> {
    let stem = name.strip_suffix(BAR_SUFFIX)?;
    let letters_end = stem
        .find(|c: char| !c.is_ascii_uppercase())
        .unwrap_or(stem.len());
    if letters_end == 0 {
        return None;
    }
    let digits = stem[letters_end..].trim_start_matches('_');
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let seconds: i64 = digits.parse().ok()?;
    let period = SamplingPeriod::from_seconds(seconds).ok()?;
    Some((stem[..letters_end].to_string(), period))
}

/// `AAPL_ticks.json` -> `"AAPL"`.
pub fn parse_tick_file_name(name: &str) -> Option<String> {
    let symbol = name.strip_suffix(TICK_SUFFIX)?;
    if symbol.is_empty() || !symbol.chars().all(|c| c.is_ascii_uppercase()) {
        return None;
    }
    Some(symbol.to_string())
}
