//! Turning (query, candidate) pairs into model feature rows.
//!
//! Every candidate gets the query's Industry / Stage / Funding Required in
//! place of its own: the model is asked how well this investor fits this
//! startup, not how the investor's own history looks.

use crate::query::StartupQuery;
use anyhow::{Context, Result};
use data_loader::{InvestorPool, InvestorRecord, RowId};
use ml_model::{CategoricalColumn, EncoderSet, FeatureRow};
use std::sync::Arc;
use tracing::debug;

/// A candidate's working record after encoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodedRow {
    pub row_id: RowId,
    pub features: FeatureRow,
}

/// Encodes candidates against a query.
#[derive(Clone)]
pub struct FeatureEncoder {
    encoders: Arc<EncoderSet>,
}

impl FeatureEncoder {
    pub fn new(encoders: Arc<EncoderSet>) -> Self {
        Self { encoders }
    }

    /// Encode every candidate row.
    ///
    /// # Returns
    /// One EncodedRow per candidate, in the same order. Fails only when a
    /// candidate id doesn't exist in the pool.
    pub fn encode_candidates(
        &self,
        candidates: &[RowId],
        pool: &InvestorPool,
        query: &StartupQuery,
    ) -> Result<Vec<EncodedRow>> {
        // query-side columns are the same for every row
        let industry = self.encoders.encode(CategoricalColumn::Industry, &query.industry);
        let stage = self.encoders.encode(CategoricalColumn::Stage, &query.stage);
        let funding_required = query.normalized_funding();
        debug!(
            "Encoded query: industry={} stage={} funding={}",
            industry, stage, funding_required
        );

        candidates
            .iter()
            .map(|&row_id| {
                let record = pool
                    .get(row_id)
                    .with_context(|| format!("Candidate row {} is not in the pool", row_id))?;
                Ok(EncodedRow {
                    row_id,
                    features: FeatureRow {
                        industry,
                        stage,
                        funding_required,
                        ..self.encode_investor(record)
                    },
                })
            })
            .collect()
    }

    /// Candidate-side columns; query-side ones are left zeroed
    fn encode_investor(&self, record: &InvestorRecord) -> FeatureRow {
        FeatureRow {
            industry: 0,
            stage: 0,
            funding_required: 0.0,
            investor_industry: self
                .encoders
                .encode(CategoricalColumn::InvestorIndustry, &record.investor_industry),
            investor_stage: self
                .encoders
                .encode(CategoricalColumn::InvestorStage, &record.investor_stage),
            check_size: record.check_size,
            success_rate: record.success_rate,
            firm: self.encoders.encode(CategoricalColumn::Firm, &record.firm),
        }
    }
}
