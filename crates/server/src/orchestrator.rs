//! # Ranking Orchestrator
//!
//! This module coordinates one ranking request end to end:
//! 1. Validate the request body into a `StartupQuery`
//! 2. Narrow the pool with the candidate filter (or fall back to all rows)
//! 3. Encode, score with the relevance model, blend in the heuristics
//! 4. Evaluate NDCG@10 against the pool's Relevance labels
//! 5. Sort, deduplicate and decode the top N
//!
//! Everything the orchestrator holds is immutable and behind `Arc`, so a
//! single instance is cloned into every worker and used without locks.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use serde_json::{Value, json};
use tracing::{error, info, instrument, warn};

use data_loader::InvestorPool;
use ml_model::{EncoderSet, ModelArtifacts, RelevanceModel};
use pipeline::{
    CandidateFilter, DEFAULT_TOP_N, NDCG_K, RankAggregator, RankedResult, ScoringPipeline,
    StartupQuery, evaluate_ndcg,
};

use crate::error::RankingError;
use crate::response::PredictResponse;

/// The artifacts loaded once at startup.
#[derive(Clone)]
pub struct RankingContext {
    pub pool: Arc<InvestorPool>,
    pub encoders: Arc<EncoderSet>,
    pub model: Arc<dyn RelevanceModel>,
}

impl RankingContext {
    /// Load the investor dataset, the encoders and the model.
    ///
    /// Any failure here is fatal: the service can't rank without all three.
    pub fn load(data_path: &Path, model_path: &Path, encoders_path: &Path) -> Result<Self> {
        let start = Instant::now();

        let pool = InvestorPool::load_from_file(data_path)
            .with_context(|| format!("Failed to load investor data from {}", data_path.display()))?;
        let artifacts = ModelArtifacts::load(model_path, encoders_path)
            .context("Failed to load model artifacts")?;

        info!(
            "Loaded {} investors and model {} in {:.2?}",
            pool.len(),
            artifacts.model.name(),
            start.elapsed()
        );
        Ok(Self::new(pool, artifacts))
    }

    pub fn new(pool: InvestorPool, artifacts: ModelArtifacts) -> Self {
        Self {
            pool: Arc::new(pool),
            encoders: artifacts.encoders,
            model: artifacts.model,
        }
    }
}

/// A ranked list plus the diagnostics gathered while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingOutcome {
    pub investors: Vec<RankedResult>,
    pub ndcg: f64,
    /// Rows that were scored
    pub candidates: usize,
    /// Filtered rows whose stage matched the query
    pub stage_matched: usize,
    /// True when the industry filter kept too few rows and the full pool was scored
    pub fell_back: bool,
}

/// Main orchestrator that coordinates the ranking pipeline
#[derive(Clone)]
pub struct RankingOrchestrator {
    pool: Arc<InvestorPool>,
    candidate_filter: Arc<CandidateFilter>,
    scoring: ScoringPipeline,
    aggregator: RankAggregator,
}

impl RankingOrchestrator {
    /// Wire the pipeline stages to the loaded artifacts
    pub fn new(context: RankingContext) -> Self {
        Self {
            candidate_filter: Arc::new(CandidateFilter::standard()),
            scoring: ScoringPipeline::new(context.encoders.clone(), context.model),
            aggregator: RankAggregator::new(context.encoders),
            pool: context.pool,
        }
    }

    pub fn pool(&self) -> &InvestorPool {
        &self.pool
    }

    /// Liveness probe body
    pub fn health(&self) -> Value {
        json!({"status": "healthy"})
    }

    /// Rank investors for an already validated query.
    ///
    /// # Returns
    /// At most `limit` results, highest score first, unique by Investor Name
    #[instrument(skip(self, query), fields(industry = %query.industry, stage = %query.stage))]
    pub fn rank(&self, query: &StartupQuery, limit: usize) -> Result<RankingOutcome, RankingError> {
        let start_time = Instant::now();

        let candidates = self
            .candidate_filter
            .apply(&self.pool, query)
            .context("Failed to apply filters")?;
        info!(
            "Filtered to {} candidates ({} matched stage{})",
            candidates.rows.len(),
            candidates.stage_matched,
            if candidates.fell_back { ", full pool fallback" } else { "" }
        );

        let scored = self
            .scoring
            .score(&candidates.rows, &self.pool, query)
            .context("Failed to score candidates")?;
        info!("Scored {} candidates", scored.len());

        let ndcg = evaluate_ndcg(&scored, &self.pool, NDCG_K);
        let investors = self.aggregator.top_n(scored, &self.pool, limit);

        info!(
            "Ranked {} investors (NDCG@{} = {:.4}) in {:.2?}",
            investors.len(),
            NDCG_K,
            ndcg,
            start_time.elapsed()
        );

        Ok(RankingOutcome {
            investors,
            ndcg,
            candidates: candidates.rows.len(),
            stage_matched: candidates.stage_matched,
            fell_back: candidates.fell_back,
        })
    }

    /// Validate and rank a JSON request body.
    pub fn rank_json(&self, body: &Value, limit: usize) -> Result<RankingOutcome, RankingError> {
        let query = StartupQuery::from_json(body)?;
        self.rank(&query, limit)
    }

    /// The predict endpoint: request body in, status code and body out.
    pub fn handle_request(&self, body: &Value) -> (u16, PredictResponse) {
        match self.rank_json(body, DEFAULT_TOP_N) {
            Ok(outcome) => (200, PredictResponse::success(outcome)),
            Err(err @ RankingError::Validation(_)) => {
                warn!("Rejected request: {}", err);
                (err.status_code(), PredictResponse::invalid(err.to_string()))
            }
            Err(err @ RankingError::Pipeline(_)) => {
                error!("Ranking failed: {}", err);
                (err.status_code(), PredictResponse::failed(err.to_string()))
            }
        }
    }
}
