//! Keep investors whose industry mentions the query's industry.

use crate::query::StartupQuery;
use crate::traits::Filter;
use anyhow::{Context, Result};
use data_loader::{InvestorPool, RowId};

/// Case-insensitive substring match of the query Industry inside
/// Investor Industry.
///
/// "Fintech" keeps "Fintech Solutions" and "B2B FINTECH". An empty query
/// industry keeps every row.
pub struct IndustryFilter;

impl Filter for IndustryFilter {
    fn name(&self) -> &str {
        "IndustryFilter"
    }

    fn apply(
        &self,
        candidates: Vec<RowId>,
        pool: &InvestorPool,
        query: &StartupQuery,
    ) -> Result<Vec<RowId>> {
        let needle = query.industry.to_lowercase();
        let mut kept = Vec::with_capacity(candidates.len());

        for row_id in candidates {
            let record = pool
                .get(row_id)
                .with_context(|| format!("Candidate row {} is not in the pool", row_id))?;
            if record.investor_industry.to_lowercase().contains(&needle) {
                kept.push(row_id);
            }
        }

        Ok(kept)
    }
}
