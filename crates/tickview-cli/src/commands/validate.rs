use super::Source;
use std::path::PathBuf;
use tickview_application::catalog::{load_catalog, select};
use tickview_domain::ChartDataError;

pub(super) fn run_validate(
    source: Source,
    date: Option<String>,
    symbol: Option<String>,
    strict: bool,
    out: Option<PathBuf>,
) -> Result<(), ChartDataError> {
    let (config, deps) = super::common::prepare(&source, "validate")?;
    let catalog = load_catalog(deps.catalog.as_ref())?;
    let key = select(&catalog, date.as_deref(), symbol.as_deref())?;

    let report = tickview_application::validation::validate(
        &config,
        &key,
        strict,
        deps.market_data.as_ref(),
    )?;

    let rendered = serde_json::to_string_pretty(&report)
        .map_err(|err| ChartDataError::parse("validation report", err))?;
    super::common::write_text(out.as_ref(), &rendered)
}
