use std::time::Instant;
use tickview_domain::repositories::catalog::CatalogRepository;
use tickview_domain::repositories::market_data::SeriesKey;
use tickview_domain::value_objects::catalog::Catalog;
use tickview_domain::ChartDataError;
use tracing::info_span;

pub fn load_catalog(repo: &dyn CatalogRepository) -> Result<Catalog, ChartDataError> {
    let _span = info_span!("load_catalog").entered();
    let started = Instant::now();
    let catalog = repo.load_catalog()?;
    metrics::histogram!("tickview.catalog.scan_ms").record(started.elapsed().as_millis() as f64);
    tracing::info!(dates = catalog.dates().count(), "catalog loaded");
    Ok(catalog)
}

/// Resolves a (date, symbol) selection against the catalog.
///
/// Explicit values must exist. A missing date falls back to the first date,
/// a missing symbol to the first symbol of the chosen date.
pub fn select(
    catalog: &Catalog,
    date: Option<&str>,
    symbol: Option<&str>,
) -> Result<SeriesKey, ChartDataError> {
    let date = match date {
        Some(date) if catalog.has_date(date) => date.to_string(),
        Some(date) => {
            return Err(ChartDataError::not_found(
                date,
                symbol.unwrap_or("*"),
                "date directory",
            ))
        }
        None => catalog
            .dates()
            .next()
            .map(str::to_string)
            .ok_or_else(|| ChartDataError::not_found("*", symbol.unwrap_or("*"), "any date"))?,
    };

    let symbol = match symbol {
        Some(symbol) if catalog.entry(&date, symbol).is_some() => symbol.to_string(),
        Some(symbol) => return Err(ChartDataError::not_found(&date, symbol, "bar files")),
        None => catalog
            .symbols(&date)
            .next()
            .map(str::to_string)
            .ok_or_else(|| ChartDataError::not_found(&date, "*", "any symbol"))?,
    };

    Ok(SeriesKey::new(date, symbol))
}

pub fn catalog_json(catalog: &Catalog) -> serde_json::Value {
    let dates: Vec<serde_json::Value> = catalog
        .dates()
        .map(|date| {
            let symbols: Vec<serde_json::Value> = catalog
                .symbols(date)
                .map(|symbol| {
                    let entry = catalog.entry(date, symbol);
                    serde_json::json!({
                        "symbol": symbol,
                        "periods": entry
                            .map(|e| e.periods.iter().map(|p| p.seconds()).collect::<Vec<_>>())
                            .unwrap_or_default(),
                        "has_ticks": entry.map(|e| e.has_ticks).unwrap_or(false),
                    })
                })
                .collect();
            serde_json::json!({ "date": date, "symbols": symbols })
        })
        .collect();
    serde_json::json!({ "dates": dates })
}
