//! civic CLI tool
//!
//! Command-line client for the CIViC REST API built on civic-core.
//!
//! ## Commands
//!
//! - `get <type> <id>`: Fetch one complete record and print it as JSON
//! - `field <type> <id> <field>`: Read one field of a record stub, fetching the full record only
//!   if the stub does not carry the field
//! - `assertions <id>...`: Batch-fetch assertions by id
//!
//! The API base URL comes from `--config`, then the `CIVIC_API_URL` environment variable.
//!
//! Failures are printed with the HTTP status class of the error and exit non-zero.

use civic_core::{
    config::ClientConfig,
    fetch::{get_assertions, get_record, HttpFetcher},
    record::{Payload, Record},
    registry::REGISTRY,
    CivicError, Result,
};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::{path::PathBuf, process::ExitCode};

#[derive(Parser)]
#[command(name = "civic")]
#[command(author, version, about = "A client for the CIViC clinical knowledge base", long_about = None)]
struct Cli {
    /// TOML configuration file (api_url, timeout_secs, user_agent)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a complete record by type and id
    Get {
        /// Record type tag, e.g. gene, variant, evidence, assertion
        record_type: String,

        id: i64,
    },

    /// Read a single field, resolving it lazily from a record stub
    Field {
        /// Record type tag, e.g. gene, variant, evidence, assertion
        record_type: String,

        id: i64,

        /// Field name, e.g. variants, description
        field: String,
    },

    /// Fetch assertions by id with a single search request
    Assertions {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!("civic failed: {err:?}");
            eprintln!("civic: {err} [{}]", err.status_code());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    }
    .with_env_overrides()?;
    tracing::debug!("Using CIViC API at {}", config.api_url);
    let fetcher = HttpFetcher::new(&config)?;

    match cli.command {
        Commands::Get { record_type, id } => {
            let kind = REGISTRY.kind_for_tag(&record_type);
            let record = get_record(&fetcher, kind, id)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }

        Commands::Field {
            record_type,
            id,
            field,
        } => {
            let stub = Payload::from_iter([("id".to_string(), json!(id))]);
            let mut record = Record::build(&record_type, stub, true)?;
            let value: Value = record.get(&field, &fetcher)?.to_value();
            println!("{}", serde_json::to_string_pretty(&value)?);
        }

        Commands::Assertions { ids } => {
            let assertions = get_assertions(&fetcher, &ids)?;
            if assertions.is_empty() {
                return Err(CivicError::Transport {
                    status: Some(404),
                    message: format!("no assertions found for ids {ids:?}"),
                });
            }
            for mut assertion in assertions {
                let name = assertion
                    .get("name", &fetcher)?
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_default();
                println!("{assertion}\t{name}");
            }
        }
    }

    Ok(())
}
