//! mhdb — market-hours exception database maintainer.
//!
//! This binary is intentionally thin: it sets up tracing, wires the file
//! sources/sink and hands off to `mhdb_runtime::run`. All merge and
//! consistency logic lives in the library crates.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use mhdb_runtime::{
    check_only, run, FileChangeSetSource, FileDatabaseSink, FileDatabaseSource, RunConfig,
};

#[derive(Parser)]
#[command(name = "mhdb")]
#[command(about = "Market-hours exception database maintainer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge a change set into the database and write the result.
    Merge {
        /// Baseline database JSON.
        #[arg(long)]
        database: PathBuf,

        /// Change-set JSON (per-class additions and removals).
        #[arg(long)]
        changes: PathBuf,

        /// Product key map JSON (class -> ticker/market pairs).
        #[arg(long)]
        products: PathBuf,

        /// Where to write the merged database.
        #[arg(long)]
        out: PathBuf,

        /// Optional run config (bank-holiday exclusions etc).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Give every entry an empty bankHolidays list if it has none.
        #[arg(long, default_value_t = false)]
        ensure_bank_holidays: bool,
    },

    /// Run consistency checks only; no merge, nothing written.
    Check {
        /// Database JSON to check.
        #[arg(long)]
        database: PathBuf,

        /// Product key map JSON.
        #[arg(long)]
        products: PathBuf,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Merge {
            database,
            changes,
            products,
            out,
            config,
            ensure_bank_holidays,
        } => {
            let mut run_config = match &config {
                Some(path) => RunConfig::load(path)
                    .with_context(|| format!("loading run config {}", path.display()))?,
                None => RunConfig::default(),
            };
            if ensure_bank_holidays {
                run_config.ensure_bank_holiday_collections = true;
            }

            let source = FileDatabaseSource {
                database_path: database,
                products_path: products,
            };
            let change_source = FileChangeSetSource { path: changes };
            let sink = FileDatabaseSink { path: out };

            let report =
                run(&source, &change_source, &sink, &run_config).context("merge run failed")?;
            info!(
                "done: {} inserted, {} removed, {} repaired, {} left for review",
                report.merge.inserted,
                report.merge.removed,
                report.integrity.repaired,
                report.integrity.unrepaired_overlaps()
            );
            Ok(())
        }

        Commands::Check { database, products } => {
            let source = FileDatabaseSource {
                database_path: database,
                products_path: products,
            };
            let report = check_only(&source).context("consistency check failed")?;
            let overlaps = report.unrepaired_overlaps();
            if overlaps > 0 {
                bail!("{overlaps} holiday/event overlaps need review");
            }
            info!(
                "check complete: {} issues found, all auto-repairable",
                report.issues.len()
            );
            Ok(())
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}
