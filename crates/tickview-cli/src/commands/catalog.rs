use super::Source;
use tickview_application::catalog::{catalog_json, load_catalog};
use tickview_domain::ChartDataError;

pub(super) fn run_catalog(source: Source, json: bool) -> Result<(), ChartDataError> {
    let (_config, deps) = super::common::prepare(&source, "catalog")?;
    let catalog = load_catalog(deps.catalog.as_ref())?;

    if json {
        println!("{}", catalog_json(&catalog));
        return Ok(());
    }

    if catalog.is_empty() {
        println!("no dates found");
        return Ok(());
    }
    for date in catalog.dates() {
        println!("{date}");
        for symbol in catalog.symbols(date) {
            let Some(entry) = catalog.entry(date, symbol) else {
                continue;
            };
            let periods: Vec<String> = entry.periods.iter().map(|p| p.label()).collect();
            println!(
                "  {symbol:<8} bars=[{}] ticks={}",
                periods.join(", "),
                if entry.has_ticks { "yes" } else { "no" }
            );
        }
    }
    Ok(())
}
