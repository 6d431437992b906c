//! onecar CLI - car spending breakdown from card billing history
//!
//! Usage:
//!   onecar categorize "GS칼텍스 강남점"       Classify merchant names
//!   onecar stats --input history.json       Category breakdown
//!   onecar trend --input history.csv        Monthly spending per category
//!   onecar keywords init                    Write an editable keyword table

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use onecar_core::Transaction;
use onecar_finance::{KeywordTable, breakdown, monthly_trend_with};
use onecar_ingest::load_transactions;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;
mod report;
mod state;

use config::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "onecar", version, about = "Car spending breakdown from card billing history")]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the category of each merchant name
    Categorize {
        /// Masked merchant names, e.g. "GS칼텍스 강**점"
        #[arg(required = true)]
        merchants: Vec<String>,

        /// Keyword table file (overrides config)
        #[arg(long)]
        keywords: Option<PathBuf>,
    },

    /// Category breakdown (amounts and percentages) of a billing history file
    Stats {
        /// Billing history (.json or .csv)
        #[arg(short, long)]
        input: PathBuf,

        /// Output format (defaults to config, then table)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Keyword table file (overrides config)
        #[arg(long)]
        keywords: Option<PathBuf>,
    },

    /// Per-month category totals of a billing history file
    Trend {
        /// Billing history (.json or .csv)
        #[arg(short, long)]
        input: PathBuf,

        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        #[arg(long)]
        keywords: Option<PathBuf>,
    },

    /// Manage the merchant keyword table
    Keywords {
        #[command(subcommand)]
        command: KeywordsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum KeywordsCommand {
    /// Write the built-in table to ~/.onecar/keywords.toml and use it
    Init,

    /// Print the effective keyword table
    Show {
        #[arg(long)]
        keywords: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (warn)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    run(cli.command)
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Categorize {
            merchants,
            keywords,
        } => {
            let table = keyword_table(keywords.as_deref())?;
            for m in &merchants {
                let c = table.categorize(m);
                println!("{}\t{}\t{}", m, c, c.label());
            }
        }

        Command::Stats {
            input,
            format,
            keywords,
        } => {
            let table = keyword_table(keywords.as_deref())?;
            let txns = read_input(&input)?;
            let b = breakdown(&table, &txns)
                .with_context(|| format!("summarizing {}", input.display()))?;
            info!(categories = b.summaries.len(), "breakdown ready");

            match output_format(format)? {
                OutputFormat::Table => print!("{}", report::render_breakdown(&b)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&b)?),
            }
        }

        Command::Trend {
            input,
            format,
            keywords,
        } => {
            let table = keyword_table(keywords.as_deref())?;
            let txns = read_input(&input)?;
            let trend = monthly_trend_with(&table, &txns)
                .with_context(|| format!("building trend for {}", input.display()))?;

            match output_format(format)? {
                OutputFormat::Table => print!("{}", report::render_trend(&trend)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&trend)?),
            }
        }

        Command::Keywords { command } => match command {
            KeywordsCommand::Init => {
                let p = config::init_keywords()?;
                println!("Wrote {}", p.display());
                println!("Config now points at it: {}", config::config_path()?.display());
            }
            KeywordsCommand::Show { keywords } => {
                let table = keyword_table(keywords.as_deref())?;
                print!("{}", table.to_toml_string()?);
            }
        },
    }

    Ok(())
}

/// `--keywords` wins; the config file is only read without it
fn keyword_table(override_path: Option<&Path>) -> Result<KeywordTable> {
    match override_path {
        Some(p) => config::read_keyword_table(p),
        None => config::resolve_keyword_table(&config::load_config()?, None),
    }
}

fn output_format(flag: Option<OutputFormat>) -> Result<OutputFormat> {
    match flag {
        Some(format) => Ok(format),
        None => Ok(config::load_config()?.output.format),
    }
}

fn read_input(path: &Path) -> Result<Vec<Transaction>> {
    if !path.exists() {
        bail!("billing file not found: {} (pass --input <path>)", path.display());
    }
    load_transactions(path)
}
