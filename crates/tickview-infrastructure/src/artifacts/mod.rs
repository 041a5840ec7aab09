use std::fs;
use std::path::Path;
use tickview_domain::repositories::artifacts::ArtifactWriter;
use tickview_domain::ChartDataError;

#[derive(Debug, Default, Clone, Copy)]
pub struct FilesystemArtifactWriter;

impl FilesystemArtifactWriter {
    pub fn new() -> Self {
        Self
    }
}

impl ArtifactWriter for FilesystemArtifactWriter {
    fn ensure_dir(&self, path: &Path) -> Result<(), ChartDataError> {
        fs::create_dir_all(path).map_err(|source| ChartDataError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    fn write_json(&self, path: &Path, contents: &str) -> Result<(), ChartDataError> {
        fs::write(path, contents).map_err(|source| ChartDataError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}
