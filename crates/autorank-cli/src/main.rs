//! CLI for autorank.
//!
//! Loads a car catalog, then repeatedly asks the user for their preferences,
//! lets the ranking service pick a car and reports whether the user liked it.

mod config;
mod keys;
mod menu;
mod session;

use anyhow::{Context, Result};
use autorank_core::{build_actions_with, CsvTable};
use autorank_personalizer::{Credentials, PersonalizerClient, DEFAULT_ENDPOINT};
use clap::Parser;
use config::{AppConfig, RawArgs};
use keys::{KeySource, StdinKeys, TerminalKeys};
use session::Session;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Catalog CSV (default: <Documents>/PersonalizeDocs/Volkswagen-Models.csv)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Credentials file with a 'label:key' line (default: <Documents>/PersonalizeDocs/Secrets.txt)
    #[arg(long)]
    credentials: Option<PathBuf>,

    /// Personalizer resource endpoint
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Action id held at its rank position (repeatable)
    #[arg(long = "exclude", default_value = "juice")]
    exclusions: Vec<String>,

    /// Timeout for each service call in seconds
    #[arg(long, default_value = "30")]
    timeout_secs: u64,

    /// Treat the last catalog column as a feature too
    #[arg(long)]
    include_last_column: bool,

    /// Print the loaded actions before starting
    #[arg(long)]
    show_catalog: bool,
}

impl From<Cli> for RawArgs {
    fn from(cli: Cli) -> Self {
        RawArgs {
            catalog: cli.catalog,
            credentials: cli.credentials,
            endpoint: cli.endpoint,
            exclusions: cli.exclusions,
            timeout_secs: cli.timeout_secs,
            include_last_column: cli.include_last_column,
            show_catalog: cli.show_catalog,
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let config = AppConfig::resolve(Cli::parse().into())?;

    let credentials = Credentials::from_file(&config.credentials)
        .with_context(|| format!("Failed to load credentials from {:?}", config.credentials))?;

    let table = CsvTable::load(&config.catalog)
        .with_context(|| format!("Failed to read catalog {:?}", config.catalog))?;
    let catalog = build_actions_with(table.rows(), config.column_span)
        .with_context(|| format!("Invalid catalog {:?}", config.catalog))?;
    tracing::debug!(
        actions = catalog.len(),
        columns = catalog.header().len(),
        "catalog loaded"
    );

    if config.show_catalog {
        println!("{}", serde_json::to_string_pretty(catalog.actions())?);
    }

    let client = PersonalizerClient::new(&config.client, credentials)
        .context("Failed to initialize Personalizer client")?;

    let stdin = io::stdin();
    let keys: Box<dyn KeySource> = if stdin.is_terminal() {
        Box::new(TerminalKeys)
    } else {
        Box::new(StdinKeys::new(stdin.lock()))
    };
    let stdout = io::stdout();
    Session::new(
        &catalog,
        client,
        keys,
        stdout.lock(),
        config.session,
    )
    .run()?;

    Ok(())
}
