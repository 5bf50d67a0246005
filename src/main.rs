use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{info, Level};

use hubpulse::config::Config;
use hubpulse::output::Reporter;
use hubpulse::{build_graph, preflight, AnalysisReport, CsvDirectory};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding actors.csv, commits.csv, events.csv and repos.csv
    #[arg(short, long, env = "HUBPULSE_DATA_PATH")]
    data_path: PathBuf,

    /// Number of entries per report (defaults to report.top_n, 10)
    #[arg(short = 'n', long)]
    top: Option<usize>,

    /// Output format (text, json)
    #[arg(short, long)]
    output: Option<String>,

    /// Write the report to this file instead of stdout
    #[arg(long)]
    output_file: Option<String>,

    /// Configuration file (toml, yaml or json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Treat the first row of every file as data rather than a header
    #[arg(long)]
    no_headers: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::load(cli.config.as_deref())?;
    if cli.no_headers {
        config.data.has_headers = false;
    }
    if !config.report.color_output {
        colored::control::set_override(false);
    }
    let top_n = cli.top.unwrap_or(config.report.top_n);
    let format = cli
        .output
        .clone()
        .unwrap_or_else(|| config.report.default_format.clone());

    eprintln!(
        "{}",
        "HubPulse - GitHub activity analytics".bright_cyan().bold()
    );
    info!(
        "Running the analysis on the data-path={}",
        cli.data_path.display()
    );

    preflight::check_data_dir(&cli.data_path, &config.data)
        .context("Failed to start the analysis")?;

    info!("Loading database from data-path...");
    let mut source = CsvDirectory::new(&cli.data_path, &config.data)
        .with_progress(std::io::stderr().is_terminal());
    let graph = build_graph(&mut source).with_context(|| {
        format!(
            "Failed to load the dataset from {}",
            cli.data_path.display()
        )
    })?;

    let summary = graph.summary();
    info!(
        "Done loading the database: {} actors, {} repos, {} events, {} commits",
        summary.actors, summary.repos, summary.events, summary.commits
    );

    let report = AnalysisReport::assemble(&graph, top_n);
    let reporter = Reporter::new(&format, cli.output_file.as_deref());
    reporter.generate_report(&report)?;

    eprintln!("\n{}", "Analysis complete!".bright_green().bold());

    Ok(())
}
