//! The CandidateFilter narrows the pool to the rows worth scoring.
//!
//! Filters run in sequence over row ids. If what survives is too sparse
//! (under 1% of the pool) the filtering is discarded and the whole pool is
//! scored instead; the heuristic boosts then do the narrowing.

use crate::filters::IndustryFilter;
use crate::query::StartupQuery;
use crate::traits::Filter;
use anyhow::Result;
use data_loader::{InvestorPool, RowId};
use tracing::{debug, warn};

/// Minimum share of the pool, in percent, a filtered set must reach
pub const SPARSE_FALLBACK_PERCENT: usize = 1;

/// Output of the candidate stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSet {
    /// Rows to score, in pool order
    pub rows: Vec<RowId>,
    /// How many rows the filters kept, before any fallback
    pub filtered_count: usize,
    /// Filtered rows whose stage matches the query (diagnostic only)
    pub stage_matched: usize,
    /// True when the filtered set was too sparse and the full pool is used
    pub fell_back: bool,
}

/// `kept < 1% of total`, in integer arithmetic
pub fn is_sparse(kept: usize, total: usize) -> bool {
    kept * 100 < total * SPARSE_FALLBACK_PERCENT
}

/// Chains filters and applies the sparse fallback.
///
/// ## Usage
/// ```ignore
/// let filter = CandidateFilter::standard();
/// let candidates = filter.apply(&pool, &query)?;
/// ```
pub struct CandidateFilter {
    filters: Vec<Box<dyn Filter>>,
}

impl CandidateFilter {
    /// Create a new CandidateFilter with no filters.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// The filter used for ranking requests: industry substring match
    pub fn standard() -> Self {
        Self::new().add_filter(IndustryFilter)
    }

    /// Add a filter (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Run every filter, count stage matches, then apply the fallback.
    ///
    /// ## Algorithm
    /// 1. Start from every row id in the pool
    /// 2. Apply each filter in order
    /// 3. Count filtered rows whose stage matches (logged, not used to filter)
    /// 4. If fewer than 1% of the pool survived, use the whole pool
    pub fn apply(&self, pool: &InvestorPool, query: &StartupQuery) -> Result<CandidateSet> {
        let mut current: Vec<RowId> = (0..pool.len()).collect();
        for filter in &self.filters {
            debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current, pool, query)?;
            debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }

        let filtered_count = current.len();
        let stage_matched = current
            .iter()
            .filter_map(|&row_id| pool.get(row_id))
            .filter(|record| query.stage_matches(&record.investor_stage))
            .count();
        debug!("Stage matched rows: {}", stage_matched);

        let fell_back = is_sparse(filtered_count, pool.len());
        if fell_back {
            warn!(
                "Too few matches ({} of {}), using full dataset",
                filtered_count,
                pool.len()
            );
            current = (0..pool.len()).collect();
        }

        Ok(CandidateSet {
            rows: current,
            filtered_count,
            stage_matched,
            fell_back,
        })
    }
}

impl Default for CandidateFilter {
    fn default() -> Self {
        Self::standard()
    }
}
