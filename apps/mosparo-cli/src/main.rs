//! mosparo - command line client for a mosparo server.
//!
//! Verifies form submissions, fetches submission statistics and checks the
//! server health of one mosparo project. Results are printed as JSON on
//! stdout; logs go to stderr.
//!
//! # Usage
//!
//! ```text
//! MOSPARO_URL=https://mosparo.example.com \
//! MOSPARO_PUBLIC_KEY=... MOSPARO_PRIVATE_KEY=... \
//! mosparo verify submission.json --required name,email
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MOSPARO_URL` | *(required)* | Base URL of the mosparo server |
//! | `MOSPARO_PUBLIC_KEY` | *(required)* | Project public key |
//! | `MOSPARO_PRIVATE_KEY` | *(required)* | Project private key |
//! | `MOSPARO_TIMEOUT_SECS` | `30` | Request timeout, at least 1 |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |
//!
//! The process exits with code 1 when a submission is not valid, the server is
//! unhealthy or any request fails.

mod cli;

use anyhow::{Context, Result};
use mosparo_client::MosparoClient;
use mosparo_core::{FormData, MosparoConfig};
use serde::Serialize;
use tokio::io::AsyncReadExt;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, Input, USAGE};

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

async fn read_form(input: &Input) -> Result<FormData> {
    let raw = match input {
        Input::Stdin => {
            let mut raw = String::new();
            tokio::io::stdin()
                .read_to_string(&mut raw)
                .await
                .context("cannot read form from stdin")?;
            raw
        }
        Input::File(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("cannot read form from {}", path.display()))?,
    };

    serde_json::from_str(&raw).context("form must be a JSON object")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("cannot render result")?;
    println!("{json}");
    Ok(())
}

/// Run a command and report whether it succeeded.
async fn run(client: &MosparoClient, command: Command) -> Result<bool> {
    match command {
        Command::Verify {
            input,
            required_fields,
        } => {
            let form = read_form(&input).await?;
            let required: Vec<&str> = required_fields.iter().map(String::as_str).collect();
            let result = if required.is_empty() {
                warn!("no required fields given, field coverage is not checked");
                client.verify_submission(&form).await?
            } else {
                client
                    .verify_submission_with_required_fields(&form, &required)
                    .await?
            };
            info!(valid = result.is_valid(), issues = result.issues.len(), "submission verified");
            print_json(&result)?;
            Ok(result.is_valid())
        }
        Command::Stats { range, start_date } => {
            let result = client.statistic_by_date(range, start_date).await?;
            print_json(&result)?;
            Ok(true)
        }
        Command::Health => {
            let result = client.health_check().await?;
            print_json(&result)?;
            Ok(result.is_healthy())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let Some(command) = Command::parse(std::env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(());
    };

    let config = MosparoConfig::from_env().context("failed to load configuration")?;

    init_tracing(&config.log_level)?;

    info!(
        url = %config.url,
        public_key = %config.credentials.public_key,
        timeout_secs = config.timeout.as_secs(),
        "starting mosparo client",
    );

    let client = MosparoClient::new(&config).context("failed to build HTTP client")?;
    let succeeded = run(&client, command).await?;

    std::process::exit(i32::from(!succeeded));
}
