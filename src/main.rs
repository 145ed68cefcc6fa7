//! sheetsync CLI - mirror spreadsheet tabs into wiki pages

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use sheetsync::{
    ConfluenceClient, ConfluencePublisher, DryRunPublisher, GoogleSheetsClient, SyncConfig,
    SyncReport, Synchronizer,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sheetsync")]
#[command(
    author,
    version,
    about = "Mirror Google Sheets tabs into Confluence pages as formatted tables"
)]
struct Cli {
    /// Load environment variables from this file instead of ./.env
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Print the generated page bodies to stdout instead of updating pages
    #[arg(long)]
    dry_run: bool,

    /// Only synchronize the named sheet (repeatable)
    #[arg(long = "sheet", value_name = "NAME")]
    sheets: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let env_loaded = match &cli.env_file {
        Some(path) => dotenvy::from_path(path).map(|_| Some(path.clone())),
        None => Ok(dotenvy::dotenv().ok()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    match env_loaded {
        Ok(Some(path)) => tracing::debug!("Loaded environment from {}", path.display()),
        Ok(None) => {}
        Err(e) => {
            tracing::error!("Failed to load env file: {}", e);
            return ExitCode::from(1);
        }
    }

    match run(&cli) {
        Ok(report) => {
            println!("{}", report.render_summary());
            ExitCode::from(report.exit_code())
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> Result<SyncReport> {
    let mut config = SyncConfig::from_env().context("Invalid configuration")?;
    config.retain_sheets(&cli.sheets)?;
    tracing::info!("Found {} configured sheet(s)", config.mappings.len());

    let source =
        GoogleSheetsClient::connect(&config).context("Could not connect to Google Sheets API")?;

    let report = if cli.dry_run {
        let publisher = DryRunPublisher::new(io::stdout(), &config);
        Synchronizer::new(source, publisher).run(&config)
    } else {
        let client = ConfluenceClient::new(&config).context("Could not build Confluence client")?;
        let publisher = ConfluencePublisher::new(client, &config);
        Synchronizer::new(source, publisher).run(&config)
    };

    Ok(report)
}
