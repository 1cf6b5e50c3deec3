//! Core traits for candidate filtering.
//!
//! This module defines the Filter trait that lets the candidate stage be
//! composed from independent row predicates.

use crate::query::StartupQuery;
use anyhow::Result;
use data_loader::{InvestorPool, RowId};

/// Core trait for narrowing the candidate rows.
///
/// All filters must implement this trait to be used in the CandidateFilter.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be shared by concurrent requests
/// - Candidates are row ids into the shared pool, never copies of records,
///   so the pool itself is never touched
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of candidate rows.
    ///
    /// # Arguments
    /// * `candidates` - The candidate row ids (takes ownership)
    /// * `pool` - The investor pool the ids point into
    /// * `query` - The startup query being ranked for
    ///
    /// # Returns
    /// * `Ok(Vec<RowId>)` - The surviving rows, in input order
    /// * `Err` - If filtering fails
    fn apply(
        &self,
        candidates: Vec<RowId>,
        pool: &InvestorPool,
        query: &StartupQuery,
    ) -> Result<Vec<RowId>>;
}
