use super::Source;
use crate::infra::{build_data_deps, DataDeps};
use std::env;
use std::path::PathBuf;
use tickview_application::config::{load_config, Config};
use tickview_application::meta::{engine_name, engine_version};
use tickview_domain::ChartDataError;

/// Loads config, installs logging and wires the filesystem adapters.
pub(super) fn prepare(source: &Source, command: &str) -> Result<(Config, DataDeps), ChartDataError> {
    let config_path = resolve_config_path(source.config.as_ref());
    let config = match &config_path {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    crate::obs::init_tracing(&config.logging.level, &config.logging.format)?;
    tracing::info!(
        engine = engine_name(),
        version = engine_version(),
        command,
        config = %config_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "defaults".to_string()),
        "starting"
    );

    let deps = build_data_deps(&config, source.data_dir.as_ref())?;
    Ok((config, deps))
}

fn resolve_config_path(flag: Option<&PathBuf>) -> Option<PathBuf> {
    flag.cloned().or_else(|| {
        env::var("TICKVIEW_CONFIG")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
    })
}

pub(super) fn write_text(out: Option<&PathBuf>, contents: &str) -> Result<(), ChartDataError> {
    match out {
        Some(path) => std::fs::write(path, contents).map_err(|source| ChartDataError::Io {
            path: path.display().to_string(),
            source,
        }),
        None => {
            println!("{contents}");
            Ok(())
        }
    }
}
