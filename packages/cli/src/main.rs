#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Command-line entry point for the gas pipeline incident report.
//!
//! Uses `indicatif-log-bridge` (via [`gas_incidents_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and the stage bar never fight for the terminal.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gas_incidents_cli_utils::IndicatifProgress;
use gas_incidents_report::{GENERATE_STEPS, ReportConfig, SUMMARY_STEPS};
use gas_incidents_source::columns::ColumnList;

#[derive(Parser)]
#[command(name = "gas_incidents", about = "USA gas pipeline incident report")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the HTML report
    Generate {
        /// Report configuration; the built-in layout under `data/` if omitted
        #[arg(long)]
        config: Option<PathBuf>,
        /// HTML file to write, overriding the configured path
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the aggregate summary of both datasets as JSON
    Summary {
        /// Report configuration; the built-in layout under `data/` if omitted
        #[arg(long)]
        config: Option<PathBuf>,
        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Print a column list as the loader sees it
    Columns {
        /// Column list file
        #[arg(long)]
        file: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = gas_incidents_cli_utils::init_logger();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { config, output } => {
            let config = ReportConfig::load_or_default(config.as_deref())?;
            let progress = IndicatifProgress::steps_bar(&multi, "Generating report", GENERATE_STEPS);
            let path = gas_incidents_report::generate(&config, output.as_deref(), &progress)?;
            println!("{}", path.display());
        }
        Commands::Summary { config, pretty } => {
            let config = ReportConfig::load_or_default(config.as_deref())?;
            let progress = IndicatifProgress::steps_bar(&multi, "Summarizing", SUMMARY_STEPS);
            let summaries = gas_incidents_report::summaries(&config, &progress)?;
            let json = if pretty {
                serde_json::to_string_pretty(&summaries)?
            } else {
                serde_json::to_string(&summaries)?
            };
            println!("{json}");
        }
        Commands::Columns { file } => {
            let columns = ColumnList::load(&file)?;
            log::info!("{} columns in {}", columns.len(), file.display());
            for name in columns.names() {
                println!("{name}");
            }
        }
    }

    Ok(())
}
