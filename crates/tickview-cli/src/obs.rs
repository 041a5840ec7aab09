use tickview_domain::ChartDataError;

/// Installs the global subscriber on stderr so stdout carries only command
/// output. `TICKVIEW_LOG` takes precedence over the configured level.
pub fn init_tracing(log_level: &str, log_format: &str) -> Result<(), ChartDataError> {
    let filter = std::env::var("TICKVIEW_LOG").unwrap_or_else(|_| log_level.to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(filter)
        .map_err(|err| ChartDataError::Config(format!("invalid log filter: {err}")))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    let installed = if log_format.trim().eq_ignore_ascii_case("json") {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|err| ChartDataError::Config(format!("failed to install logger: {err}")))
}
