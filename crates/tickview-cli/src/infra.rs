use std::env;
use std::path::PathBuf;
use tickview_application::config::Config;
use tickview_domain::repositories::artifacts::ArtifactWriter;
use tickview_domain::repositories::catalog::CatalogRepository;
use tickview_domain::repositories::market_data::MarketDataRepository;
use tickview_domain::ChartDataError;
use tickview_infrastructure::artifacts::FilesystemArtifactWriter;
use tickview_infrastructure::catalog::FilesystemCatalogRepository;
use tickview_infrastructure::market_data::FilesystemMarketDataRepository;

pub struct DataDeps {
    pub catalog: Box<dyn CatalogRepository>,
    pub market_data: Box<dyn MarketDataRepository>,
}

pub fn build_data_deps(
    config: &Config,
    data_dir: Option<&PathBuf>,
) -> Result<DataDeps, ChartDataError> {
    let root = resolve_data_dir(config, data_dir)?;
    tracing::debug!(data_dir = %root.display(), "data directory resolved");
    Ok(DataDeps {
        catalog: Box::new(FilesystemCatalogRepository::new(&root)),
        market_data: Box::new(FilesystemMarketDataRepository::new(root)),
    })
}

pub fn build_artifact_writer() -> Box<dyn ArtifactWriter> {
    Box::new(FilesystemArtifactWriter::new())
}

/// `--data-dir`, then `paths.data_dir`, then `TICKVIEW_DATA_DIR`.
pub fn resolve_data_dir(
    config: &Config,
    data_dir: Option<&PathBuf>,
) -> Result<PathBuf, ChartDataError> {
    if let Some(dir) = data_dir {
        return Ok(dir.clone());
    }
    match config.paths.data_dir.as_deref() {
        Some(dir) if !dir.trim().is_empty() => Ok(PathBuf::from(dir)),
        _ => env::var("TICKVIEW_DATA_DIR")
            .map(PathBuf::from)
            .map_err(|_| {
                ChartDataError::Config(
                    "missing --data-dir, paths.data_dir in config and env TICKVIEW_DATA_DIR"
                        .to_string(),
                )
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::resolve_data_dir;
    use std::path::PathBuf;
    use tickview_application::config::Config;

    #[test]
    fn flag_wins_over_config() {
        let mut config = Config::default();
        config.paths.data_dir = Some("/from/config".to_string());

        let flag = PathBuf::from("/from/flag");
        assert_eq!(
            resolve_data_dir(&config, Some(&flag)).unwrap(),
            PathBuf::from("/from/flag")
        );
        assert_eq!(
            resolve_data_dir(&config, None).unwrap(),
            PathBuf::from("/from/config")
        );
    }
}
