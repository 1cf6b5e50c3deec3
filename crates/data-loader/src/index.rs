//! InvestorPool loading.
//!
//! Reads the CSV, cleans every row in parallel with Rayon, then builds the
//! pool (and its Firm index) in file order.

use crate::error::Result;
use crate::parser::{self, RawInvestorRow};
use crate::types::{InvestorPool, InvestorRecord};
use rayon::prelude::*;
use std::io::Read;
use std::path::Path;
use tracing::info;

impl InvestorPool {
    /// Load the investor dataset from a CSV file
    ///
    /// Steps:
    /// 1. Parse the raw rows (header check included)
    /// 2. Normalize numeric cells and default empty strings
    /// 3. Insert in order, building the Firm index on the way
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading investor dataset from {:?}", path);
        let raw = parser::parse_investor_file(path)?;
        let pool = Self::from_raw_rows(raw);
        info!(
            "Investor data loaded: {} rows, {} firms",
            pool.len(),
            pool.firm_count()
        );
        Ok(pool)
    }

    /// Load from an in-memory or streamed CSV source
    pub fn load_from_reader<R: Read>(reader: R) -> Result<Self> {
        let raw = parser::parse_investors(reader)?;
        Ok(Self::from_raw_rows(raw))
    }

    fn from_raw_rows(raw: Vec<RawInvestorRow>) -> Self {
        // Vec's parallel iterator is indexed, so collect keeps file order
        let records: Vec<InvestorRecord> = raw
            .into_par_iter()
            .map(RawInvestorRow::into_record)
            .collect();
        Self::from_records(records)
    }

    /// Get counts for debugging/validation: (rows, firms, rows with a label)
    pub fn counts(&self) -> (usize, usize, usize) {
        let labelled = self
            .records
            .par_iter()
            .filter(|r| r.relevance.is_some())
            .count();
        (self.records.len(), self.firm_index.len(), labelled)
    }
}
