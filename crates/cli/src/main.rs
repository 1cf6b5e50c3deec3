use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::InvestorRecord;
use pipeline::{RankedResult, StartupQuery};
use rand::Rng;
use server::{RankingContext, RankingOrchestrator, RankingOutcome};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::info;

/// FundMatch - rank investors for a startup
#[derive(Parser)]
#[command(name = "fundmatch")]
#[command(
    about = "Rank investors for a startup's industry, stage and funding ask",
    long_about = None
)]
struct Cli {
    /// Investor dataset (CSV)
    #[arg(long, default_value = "data/startup_investor_ranker_training_data1.csv")]
    data: PathBuf,

    /// Trained relevance model (XGBoost JSON)
    #[arg(long, default_value = "models/xgb_startup_investor_ranker.json")]
    model: PathBuf,

    /// Label encoder classes (JSON)
    #[arg(long, default_value = "models/label_encoders.json")]
    encoders: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank investors for a startup
    Rank {
        /// Amount being raised, e.g. 500000
        #[arg(long)]
        funding: String,

        /// Startup industry, e.g. Fintech
        #[arg(long)]
        industry: String,

        /// Startup stage, e.g. Seed
        #[arg(long)]
        stage: String,

        /// Number of investors to return
        #[arg(long, default_value = "10")]
        limit: usize,

        /// Show candidate and quality diagnostics
        #[arg(long)]
        explain: bool,
    },

    /// Show every dataset row for an investor
    Investor {
        /// Investor name (exact match)
        #[arg(long)]
        name: String,
    },

    /// Search investors by industry
    Search {
        /// Text to look for in Investor Industry (case-insensitive)
        #[arg(long)]
        industry: String,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!("Loading investors from {}...", cli.data.display());
    let start = Instant::now();
    let context = RankingContext::load(&cli.data, &cli.model, &cli.encoders)
        .context("Failed to load ranking artifacts")?;
    let orchestrator = RankingOrchestrator::new(context);
    info!(
        "Ranking artifacts ready: {} rows, {} firms",
        orchestrator.pool().len(),
        orchestrator.pool().firm_count()
    );
    println!(
        "{} Loaded {} investors in {:?}",
        "✓".green(),
        orchestrator.pool().len(),
        start.elapsed()
    );

    match cli.command {
        Commands::Rank {
            funding,
            industry,
            stage,
            limit,
            explain,
        } => handle_rank(&orchestrator, funding, industry, stage, limit, explain)?,
        Commands::Investor { name } => handle_investor(&orchestrator, &name)?,
        Commands::Search { industry } => handle_search(&orchestrator, &industry),
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(orchestrator, requests, concurrent).await?,
    }

    Ok(())
}

/// Handle the 'rank' command
fn handle_rank(
    orchestrator: &RankingOrchestrator,
    funding: String,
    industry: String,
    stage: String,
    limit: usize,
    explain: bool,
) -> Result<()> {
    let query = StartupQuery::new(funding, industry, stage)?;
    info!(
        "Ranking for industry={} stage={} funding={}",
        query.industry, query.stage, query.funding_required
    );
    let outcome = orchestrator.rank(&query, limit)?;

    print_ranking(&outcome.investors);
    if explain {
        print_diagnostics(&outcome);
    }
    Ok(())
}

/// Handle the 'investor' command
fn handle_investor(orchestrator: &RankingOrchestrator, name: &str) -> Result<()> {
    let pool = orchestrator.pool();
    let rows: Vec<_> = pool.find_by_name(name).collect();
    if rows.is_empty() {
        bail!("Investor {} not found", name);
    }

    println!("{}", format!("Investor: {}", name).bold().blue());
    for (row_id, record) in rows {
        let canonical = pool
            .canonical_for_firm(&record.firm)
            .is_some_and(|c| std::ptr::eq(c, record));
        println!(
            "{} row {} - firm {}{}",
            "•".green(),
            row_id,
            record.firm,
            if canonical { " (canonical)" } else { "" }
        );
        print_record_details(record);
    }
    Ok(())
}

/// Handle the 'search' command
fn handle_search(orchestrator: &RankingOrchestrator, industry: &str) {
    let needle = industry.to_lowercase();
    let mut matches: Vec<&InvestorRecord> = orchestrator
        .pool()
        .records()
        .iter()
        .filter(|r| r.investor_industry.to_lowercase().contains(&needle))
        .collect();
    matches.sort_by(|a, b| b.success_rate.total_cmp(&a.success_rate));

    println!(
        "{}",
        format!("{} investors in '{}':", matches.len(), industry)
            .bold()
            .blue()
    );
    for record in matches.iter().take(20) {
        println!(
            "{} [{}] {} / {} - check {:.0}, success {:.1}",
            record.investor_name.as_deref().unwrap_or("(unnamed)"),
            record.firm,
            record.investor_stage,
            record.investor_industry,
            record.check_size,
            record.success_rate
        );
    }
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    orchestrator: RankingOrchestrator,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    if requests == 0 || concurrent == 0 {
        bail!("requests and concurrent must both be at least 1");
    }
    if orchestrator.pool().is_empty() {
        bail!("Cannot benchmark against an empty investor pool");
    }

    // Build queries from random pool rows so industries and stages are realistic
    let queries: Vec<StartupQuery> = {
        let mut rng = rand::rng();
        let records = orchestrator.pool().records();
        (0..requests)
            .map(|_| {
                let record = &records[rng.random_range(0..records.len())];
                let funding = rng.random_range(50_000..5_000_000u64);
                StartupQuery::new(
                    funding.to_string(),
                    record.investor_industry.clone(),
                    record.investor_stage.clone(),
                )
            })
            .collect::<Result<_, _>>()?
    };

    info!(
        "Running {} benchmark requests, at most {} at a time",
        requests, concurrent
    );
    let semaphore = Arc::new(Semaphore::new(concurrent));
    let wall = Instant::now();

    let mut handles = Vec::with_capacity(requests);
    for query in queries {
        let orchestrator = orchestrator.clone();
        let permit = semaphore.clone().acquire_owned().await?;
        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let start = Instant::now();
            orchestrator.rank(&query, 10)?;
            Ok::<_, anyhow::Error>(start.elapsed())
        }));
    }

    let mut timings = Vec::with_capacity(requests);
    for handle in handles {
        timings.push(handle.await??);
    }
    let wall = wall.elapsed();
    info!("Benchmark finished in {:?}", wall);

    timings.sort();
    let total: Duration = timings.iter().sum();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {} ({} concurrent)", requests, concurrent);
    println!("Total time: {:?}", wall);
    println!("Average latency: {:?}", total / timings.len() as u32);
    println!("P50 latency: {:?}", percentile(&timings, 0.50));
    println!("P95 latency: {:?}", percentile(&timings, 0.95));
    println!("P99 latency: {:?}", percentile(&timings, 0.99));
    println!(
        "Throughput: {:.2} requests/second",
        requests as f64 / wall.as_secs_f64()
    );

    Ok(())
}

/// Nearest-rank percentile of sorted timings
fn percentile(sorted: &[Duration], p: f64) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let rank = (p * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

fn print_ranking(investors: &[RankedResult]) {
    println!("{}", "Top Investors:".bold().blue());
    if investors.is_empty() {
        println!("  (no investors)");
        return;
    }

    for (i, investor) in investors.iter().enumerate() {
        println!(
            "{}. {} - Score: {:.3}",
            (i + 1).to_string().green(),
            investor.investor_name.bold(),
            investor.score
        );
        println!(
            "   {} / {} | check {:.0} | success {:.1}",
            investor.investor_stage,
            investor.investor_industry,
            investor.check_size,
            investor.success_rate
        );
        if let Some(previous) = &investor.previous_investments {
            println!("   Previous: {}", previous);
        }
    }
}

fn print_diagnostics(outcome: &RankingOutcome) {
    println!("{}", "Diagnostics:".bold().cyan());
    println!("{}Candidates scored: {}", "• ".cyan(), outcome.candidates);
    println!("{}Stage matches: {}", "• ".cyan(), outcome.stage_matched);
    if outcome.fell_back {
        println!(
            "{}{}",
            "• ".cyan(),
            "Industry filter too sparse, ranked the full pool".yellow()
        );
    }
    println!("{}NDCG@10: {:.4}", "• ".cyan(), outcome.ndcg);
}

fn print_record_details(record: &InvestorRecord) {
    println!("   Stage: {}", record.investor_stage);
    println!("   Industry: {}", record.investor_industry);
    println!("   Check size: {:.0}", record.check_size);
    println!("   Success rate: {:.1}", record.success_rate);
    if let Some(previous) = &record.previous_investments {
        println!("   Previous investments: {}", previous);
    }
    match record.relevance {
        Some(relevance) => println!("   Relevance label: {}", relevance),
        None => println!("   Relevance label: -"),
    }
}
