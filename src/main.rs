//! Tidemark main entry point
//!
//! Command-line interface for the incremental listing harvester.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Mutex;
use tidemark::config::load_config_with_hash;
use tidemark::harvest::HttpFetcher;
use tidemark::storage::{open_store, Store};
use tidemark::translate::{DeepLTranslator, Translator};
use tracing_subscriber::EnvFilter;

/// Tidemark: an incremental listing harvester
///
/// Walks a paginated listing site newest-first, stops at the freshness
/// boundary, and stores new records in a uniquely keyed database.
#[derive(Parser, Debug)]
#[command(name = "tidemark")]
#[command(version = "1.0.0")]
#[command(about = "An incremental listing harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Keep harvesting on the configured interval instead of running once
    #[arg(long, conflicts_with = "list")]
    watch: bool,

    /// Print all stored records and exit
    #[arg(long, conflicts_with = "watch")]
    list: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) =
        load_config_with_hash(&cli.config).context("failed to load configuration")?;
    tracing::info!("Configuration loaded (hash: {})", config_hash);

    let store = open_store(std::path::Path::new(&config.output.database_path))
        .context("failed to open record database")?;

    if cli.list {
        let records = store.list_records().context("failed to list records")?;
        tidemark::output::print_records(&records);
        return Ok(());
    }

    let store = Mutex::new(store);
    let fetcher = HttpFetcher::new(&config.harvest).context("failed to build HTTP fetcher")?;
    let translator =
        DeepLTranslator::new(&config.translation).context("failed to build translator")?;
    let translator_ref: Option<&dyn Translator> =
        translator.as_ref().map(|t| t as &dyn Translator);

    if cli.watch {
        tidemark::schedule::run_forever(&fetcher, &store, translator_ref, &config).await;
        Ok(())
    } else {
        let report = tidemark::run_once(&fetcher, &store, translator_ref, &config)
            .await
            .context("harvest cycle failed")?;
        tidemark::output::print_report(&report);
        Ok(())
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("tidemark=info,warn"),
            1 => EnvFilter::new("tidemark=debug,info"),
            2 => EnvFilter::new("tidemark=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
