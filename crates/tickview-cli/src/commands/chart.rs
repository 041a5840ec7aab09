use super::Source;
use std::path::PathBuf;
use tickview_application::catalog::{load_catalog, select};
use tickview_application::charting::{build_chart, ChartOptions};
use tickview_application::export::{export_chart, render_json};
use tickview_domain::ChartDataError;

pub(super) fn run_chart(
    source: Source,
    date: Option<String>,
    symbol: Option<String>,
    out: Option<PathBuf>,
    no_ticks: bool,
) -> Result<(), ChartDataError> {
    let (config, deps) = super::common::prepare(&source, "chart")?;
    let catalog = load_catalog(deps.catalog.as_ref())?;
    let key = select(&catalog, date.as_deref(), symbol.as_deref())?;

    let document = build_chart(
        &config,
        &key,
        deps.market_data.as_ref(),
        ChartOptions {
            include_ticks: !no_ticks,
        },
    )?;

    match out {
        Some(path) => {
            let writer = crate::infra::build_artifact_writer();
            export_chart(&document, &path, writer.as_ref())?;
            eprintln!("chart written: {}", path.display());
        }
        None => println!("{}", render_json(&document)?),
    }
    Ok(())
}
