use crate::error::ChartDataError;
use std::path::Path;

pub trait ArtifactWriter {
    fn ensure_dir(&self, path: &Path) -> Result<(), ChartDataError>;
    fn write_json(&self, path: &Path, contents: &str) -> Result<(), ChartDataError>;
}
