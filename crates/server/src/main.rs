//! Test harness for the ranking orchestrator.
//!
//! Reads one predict request body (JSON) from stdin, ranks it against the
//! loaded artifacts and prints the response body to stdout.
//!
//! ```text
//! echo '{"Funding Required": "500000", "Industry": "Fintech", "Stage": "Seed"}' \
//!     | cargo run --bin server
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

use server::{PredictResponse, RankingContext, RankingOrchestrator};

#[derive(Parser)]
#[command(name = "server")]
#[command(about = "Rank investors for a JSON request read from stdin")]
struct Args {
    /// Investor dataset (CSV)
    #[arg(long, default_value = "data/startup_investor_ranker_training_data1.csv")]
    data: PathBuf,

    /// Trained relevance model (XGBoost JSON)
    #[arg(long, default_value = "models/xgb_startup_investor_ranker.json")]
    model: PathBuf,

    /// Label encoder classes (JSON)
    #[arg(long, default_value = "models/label_encoders.json")]
    encoders: PathBuf,

    /// Print the health probe instead of reading a request
    #[arg(long)]
    health: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (stderr, so stdout stays a clean JSON body)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let Args {
        data,
        model,
        encoders,
        health,
    } = Args::parse();
    info!("Starting investor ranking harness");

    let context = tokio::task::spawn_blocking(move || {
        RankingContext::load(&data, &model, &encoders)
    })
    .await
    .context("Artifact loading task panicked")??;
    let orchestrator = RankingOrchestrator::new(context);

    if health {
        println!("{}", orchestrator.health());
        return Ok(());
    }

    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .context("Failed to read request from stdin")?;

    let (status, body) = match serde_json::from_str::<Value>(&input) {
        Ok(request) => {
            tokio::task::spawn_blocking(move || orchestrator.handle_request(&request))
                .await
                .context("Ranking task panicked")?
        }
        Err(err) => (400, PredictResponse::invalid(format!("Invalid JSON body: {}", err))),
    };

    info!("Responding with status {}", status);
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
