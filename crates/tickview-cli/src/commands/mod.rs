mod catalog;
mod chart;
mod common;
mod validate;

use std::path::PathBuf;
use tickview_domain::ChartDataError;

/// Where config and data come from, shared by every command.
pub struct Source {
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
}

pub enum Command {
    Catalog {
        source: Source,
        json: bool,
    },
    Chart {
        source: Source,
        date: Option<String>,
        symbol: Option<String>,
        out: Option<PathBuf>,
        no_ticks: bool,
    },
    Validate {
        source: Source,
        date: Option<String>,
        symbol: Option<String>,
        strict: bool,
        out: Option<PathBuf>,
    },
}

pub fn run(command: Command) -> Result<(), ChartDataError> {
    match command {
        Command::Catalog { source, json } => catalog::run_catalog(source, json),
        Command::Chart {
            source,
            date,
            symbol,
            out,
            no_ticks,
        } => chart::run_chart(source, date, symbol, out, no_ticks),
        Command::Validate {
            source,
            date,
            symbol,
            strict,
            out,
        } => validate::run_validate(source, date, symbol, strict, out),
    }
}
