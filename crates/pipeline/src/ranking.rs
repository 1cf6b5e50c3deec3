//! RankAggregator: scored rows -> the top-N list callers see.
//!
//! ## Algorithm
//! 1. Sort by final score, highest first (stable, ties keep pool order)
//! 2. Join each row to its firm's canonical pool row for display fields
//! 3. Decode the candidate's encoded Investor Stage / Investor Industry
//! 4. Skip rows with no Investor Name, and names already emitted
//! 5. Stop at N
//!
//! Deduplicating after the sort means the row kept for a name is its
//! highest-scoring one.

use crate::scoring::ScoredCandidate;
use data_loader::InvestorPool;
use ml_model::{CategoricalColumn, EncoderSet};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Number of results returned when the caller doesn't ask otherwise
pub const DEFAULT_TOP_N: usize = 10;

/// One ranked investor as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    #[serde(rename = "Investor Name")]
    pub investor_name: String,
    #[serde(rename = "Investor Stage")]
    pub investor_stage: String,
    #[serde(rename = "Investor Industry")]
    pub investor_industry: String,
    #[serde(rename = "Check Size")]
    pub check_size: f64,
    #[serde(rename = "Previous Investments")]
    pub previous_investments: Option<String>,
    #[serde(rename = "Success Rate")]
    pub success_rate: f64,
    #[serde(rename = "Relevance")]
    pub relevance: Option<f64>,
    #[serde(rename = "Score")]
    pub score: f64,
}

#[derive(Clone)]
pub struct RankAggregator {
    encoders: Arc<EncoderSet>,
}

impl RankAggregator {
    pub fn new(encoders: Arc<EncoderSet>) -> Self {
        Self { encoders }
    }

    pub fn top_n(
        &self,
        mut scored: Vec<ScoredCandidate>,
        pool: &InvestorPool,
        n: usize,
    ) -> Vec<RankedResult> {
        scored.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));

        let mut seen: HashSet<String> = HashSet::new();
        let mut results = Vec::with_capacity(n.min(scored.len()));
        let mut unnamed = 0usize;
        let mut duplicates = 0usize;

        for candidate in &scored {
            if results.len() == n {
                break;
            }

            let Some(canonical) = pool
                .get(candidate.row_id)
                .and_then(|record| pool.canonical_for_firm(&record.firm))
            else {
                unnamed += 1;
                continue;
            };
            let Some(name) = canonical.investor_name.as_deref() else {
                unnamed += 1;
                continue;
            };
            if !seen.insert(name.to_string()) {
                duplicates += 1;
                continue;
            }

            results.push(RankedResult {
                investor_name: name.to_string(),
                investor_stage: self
                    .encoders
                    .decode(CategoricalColumn::InvestorStage, candidate.features.investor_stage),
                investor_industry: self.encoders.decode(
                    CategoricalColumn::InvestorIndustry,
                    candidate.features.investor_industry,
                ),
                check_size: canonical.check_size,
                previous_investments: canonical.previous_investments.clone(),
                success_rate: canonical.success_rate,
                relevance: canonical.relevance,
                score: candidate.final_score,
            });
        }

        debug!(
            "Ranked {} results from {} scored rows ({} unnamed, {} duplicate names skipped)",
            results.len(),
            scored.len(),
            unnamed,
            duplicates
        );
        results
    }
}
