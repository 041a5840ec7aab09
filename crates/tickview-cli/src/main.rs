mod commands;
mod infra;
mod obs;

use clap::{Args, Parser, Subcommand};
use commands::{Command, Source};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tickview")]
#[command(
    about = "Overlay bar series and raw ticks on one time axis",
    version,
    arg_required_else_help = true
)]
#[command(
    after_help = "Examples:\n  tickview catalog --data-dir /data/stonk_data\n  tickview chart --date 2024-01-02 --symbol AAPL --out charts/AAPL.json\n  tickview validate --config configs/tickview.toml --strict\n"
)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Args)]
struct SourceArgs {
    /// TOML config; falls back to $TICKVIEW_CONFIG, then built-in defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Root holding one directory per date; overrides `paths.data_dir`.
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[derive(Args)]
struct SelectionArgs {
    /// Date directory name; defaults to the first one available.
    #[arg(long)]
    date: Option<String>,
    /// Ticker; defaults to the first one available on the date.
    #[arg(long)]
    symbol: Option<String>,
}

#[derive(Subcommand)]
enum CliCommand {
    /// List dates, symbols, bar periods and tick availability.
    Catalog {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Build the overlay chart document for one (date, symbol).
    Chart {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        selection: SelectionArgs,
        /// Write the document here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, default_value_t = false)]
        no_ticks: bool,
    },
    /// Report data quality for one (date, symbol).
    Validate {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        selection: SelectionArgs,
        #[arg(long, default_value_t = false)]
        strict: bool,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

impl From<SourceArgs> for Source {
    fn from(args: SourceArgs) -> Self {
        Source {
            config: args.config,
            data_dir: args.data_dir,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let command = match cli.command {
        CliCommand::Catalog { source, json } => Command::Catalog {
            source: source.into(),
            json,
        },
        CliCommand::Chart {
            source,
            selection,
            out,
            no_ticks,
        } => Command::Chart {
            source: source.into(),
            date: selection.date,
            symbol: selection.symbol,
            out,
            no_ticks,
        },
        CliCommand::Validate {
            source,
            selection,
            strict,
            out,
        } => Command::Validate {
            source: source.into(),
            date: selection.date,
            symbol: selection.symbol,
            strict,
            out,
        },
    };

    if let Err(err) = commands::run(command) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}
