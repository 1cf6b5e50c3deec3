//! Ranking pipeline for matching investors to a startup query.
//!
//! This crate provides:
//! - `StartupQuery` and its validation
//! - The Filter trait, `IndustryFilter` and `CandidateFilter` (with the
//!   sparse-result fallback)
//! - `ScoringPipeline` blending model relevance with stage and check-size
//!   heuristics
//! - `RankAggregator` for the deduplicated, decoded top-N list
//! - NDCG@K as a ranking quality diagnostic
//!
//! ## Architecture
//! A request flows through the stages in order:
//! 1. CandidateFilter narrows the pool (or keeps all of it when too sparse)
//! 2. ScoringPipeline encodes candidates, asks the model, applies boosts
//! 3. RankAggregator sorts, deduplicates by name and decodes labels
//! 4. `evaluate_ndcg` scores the ranking against ground-truth labels
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{CandidateFilter, RankAggregator, ScoringPipeline, StartupQuery};
//!
//! let query = StartupQuery::new("500000", "Fintech", "Seed")?;
//! let candidates = CandidateFilter::standard().apply(&pool, &query)?;
//!
//! let scorer = ScoringPipeline::new(encoders.clone(), model.clone());
//! let scored = scorer.score(&candidates.rows, &pool, &query)?;
//!
//! let ndcg = pipeline::evaluate_ndcg(&scored, &pool, pipeline::NDCG_K);
//! let top = RankAggregator::new(encoders).top_n(scored, &pool, 10);
//! ```

pub mod candidate_filter;
pub mod error;
pub mod features;
pub mod filters;
pub mod metrics;
pub mod query;
pub mod ranking;
pub mod scoring;
pub mod traits;

// Re-export main types
pub use candidate_filter::{CandidateFilter, CandidateSet};
pub use error::ValidationError;
pub use features::{EncodedRow, FeatureEncoder};
pub use metrics::{NDCG_K, evaluate_ndcg, ndcg_at_k};
pub use query::StartupQuery;
pub use ranking::{DEFAULT_TOP_N, RankAggregator, RankedResult};
pub use scoring::{ScoredCandidate, ScoringPipeline};
pub use traits::Filter;
