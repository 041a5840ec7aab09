use crate::charting::ChartDocument;
use std::path::Path;
use tickview_domain::repositories::artifacts::ArtifactWriter;
use tickview_domain::ChartDataError;

pub fn render_json<T: serde::Serialize>(value: &T) -> Result<String, ChartDataError> {
    serde_json::to_string_pretty(value).map_err(|err| ChartDataError::parse("chart document", err))
}

/// Writes the chart document as pretty JSON, creating the parent directory.
pub fn export_chart(
    document: &ChartDocument,
    path: &Path,
    writer: &dyn ArtifactWriter,
) -> Result<(), ChartDataError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        writer.ensure_dir(parent)?;
    }
    let contents = render_json(document)?;
    writer.write_json(path, &contents)?;
    tracing::info!(
        path = %path.display(),
        traces = document.overlay.traces.len(),
        "chart document written"
    );
    Ok(())
}
