//! ScoringPipeline: model relevance blended with business heuristics.
//!
//! ## Algorithm
//! 1. Encode each candidate against the query (see `features`)
//! 2. Ask the relevance model for a base score per row
//! 3. `stage_match`: 1 when the investor's own stage equals the query stage
//!    (trimmed, case-insensitive), else 0
//! 4. `check_proximity`: `1 / (1 + |check_size - funding_required|)`
//! 5. `final = 0.6 * base + 0.25 * stage_match + 0.15 * check_proximity`

use crate::features::FeatureEncoder;
use crate::query::StartupQuery;
use anyhow::{Context, Result, bail};
use data_loader::{InvestorPool, RowId};
use ml_model::{EncoderSet, FeatureRow, ModelError, RelevanceModel};
use std::sync::Arc;
use tracing::{debug, instrument};

pub const BASE_SCORE_WEIGHT: f64 = 0.6;
pub const STAGE_MATCH_WEIGHT: f64 = 0.25;
pub const CHECK_PROXIMITY_WEIGHT: f64 = 0.15;

/// Inverse-distance closeness of an investor's check to the ask, in (0, 1].
pub fn check_proximity(check_size: f64, funding_required: f64) -> f64 {
    1.0 / (1.0 + (check_size - funding_required).abs())
}

pub fn blend(base_score: f64, stage_match: bool, check_proximity: f64) -> f64 {
    let stage = if stage_match { 1.0 } else { 0.0 };
    BASE_SCORE_WEIGHT * base_score
        + STAGE_MATCH_WEIGHT * stage
        + CHECK_PROXIMITY_WEIGHT * check_proximity
}

/// A candidate with every score component kept for inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub row_id: RowId,
    pub features: FeatureRow,
    pub base_score: f64,
    pub stage_match: bool,
    pub check_proximity: f64,
    pub final_score: f64,
}

/// Scores candidate rows for one query.
#[derive(Clone)]
pub struct ScoringPipeline {
    encoder: FeatureEncoder,
    model: Arc<dyn RelevanceModel>,
}

impl ScoringPipeline {
    pub fn new(encoders: Arc<EncoderSet>, model: Arc<dyn RelevanceModel>) -> Self {
        Self {
            encoder: FeatureEncoder::new(encoders),
            model,
        }
    }

    /// Score every candidate, preserving input order.
    ///
    /// Any failure (unknown row, model error, wrong number of scores, a
    /// non-finite score) aborts the whole batch.
    #[instrument(skip_all, fields(candidates = candidates.len(), model = self.model.name()))]
    pub fn score(
        &self,
        candidates: &[RowId],
        pool: &InvestorPool,
        query: &StartupQuery,
    ) -> Result<Vec<ScoredCandidate>> {
        let encoded = self.encoder.encode_candidates(candidates, pool, query)?;
        debug!("Encoded {} candidate rows", encoded.len());

        let rows: Vec<FeatureRow> = encoded.iter().map(|e| e.features).collect();
        let base_scores = self
            .model
            .predict(&rows)
            .with_context(|| format!("Relevance model {} failed", self.model.name()))?;

        if base_scores.len() != rows.len() {
            return Err(ModelError::PredictionLengthMismatch {
                expected: rows.len(),
                found: base_scores.len(),
            })
            .with_context(|| format!("Relevance model {} misbehaved", self.model.name()));
        }
        debug!("Base scores predicted");

        let mut scored = Vec::with_capacity(encoded.len());
        for (row, base_score) in encoded.into_iter().zip(base_scores) {
            if !base_score.is_finite() {
                bail!("Relevance model produced {} for row {}", base_score, row.row_id);
            }

            // heuristics read the candidate's own values, not the encoded ones
            let record = pool
                .get(row.row_id)
                .with_context(|| format!("Candidate row {} is not in the pool", row.row_id))?;
            let stage_match = query.stage_matches(&record.investor_stage);
            let proximity = check_proximity(record.check_size, query.funding_required);

            scored.push(ScoredCandidate {
                row_id: row.row_id,
                features: row.features,
                base_score,
                stage_match,
                check_proximity: proximity,
                final_score: blend(base_score, stage_match, proximity),
            });
        }
        debug!("Final scores computed");

        Ok(scored)
    }
}
