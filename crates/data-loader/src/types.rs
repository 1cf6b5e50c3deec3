//! Core domain types for the investor dataset.
//!
//! - `InvestorRecord` is one normalized row of the pool
//! - `InvestorPool` owns every row plus the Firm index used to recover
//!   display fields after scoring
//!
//! Rows are identified by their position in the pool (`RowId`). Nothing
//! outside this crate gets a mutable handle on a loaded pool, so it can be
//! shared behind an `Arc` across requests.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Position of a row in the pool (0-based, file order)
pub type RowId = usize;

// =============================================================================
// InvestorRecord
// =============================================================================

/// One investor row after load-time cleaning.
///
/// String categoricals are never absent (missing cells become `""`), numeric
/// scoring fields are never NaN (malformed cells become `0.0`). Display-only
/// fields stay optional so the output can report them as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestorRecord {
    /// Firm identity, also the join key for display fields
    pub firm: String,
    pub investor_name: Option<String>,
    pub investor_stage: String,
    pub investor_industry: String,
    /// Typical check size this investor writes
    pub check_size: f64,
    /// Free text passthrough ("12", "Stripe, Plaid", ...)
    pub previous_investments: Option<String>,
    /// 0-100 or a fraction, whatever the dataset uses
    pub success_rate: f64,
    /// Ground-truth label, only used for NDCG
    pub relevance: Option<f64>,
}

impl InvestorRecord {
    /// Minimal record with empty categoricals and zeroed numerics.
    ///
    /// Handy for tests and for building pools in code.
    pub fn new(firm: impl Into<String>) -> Self {
        Self {
            firm: firm.into(),
            investor_name: None,
            investor_stage: String::new(),
            investor_industry: String::new(),
            check_size: 0.0,
            previous_investments: None,
            success_rate: 0.0,
            relevance: None,
        }
    }
}

// =============================================================================
// InvestorPool - The In-Memory Dataset
// =============================================================================

/// All investor rows plus a Firm -> first row index.
///
/// The Firm index is built as rows are inserted, so the canonical row for a
/// firm is always the first one seen. That mirrors how display fields are
/// joined back: several investors at one firm all report the first one's
/// name and numbers.
#[derive(Debug, Default)]
pub struct InvestorPool {
    pub(crate) records: Vec<InvestorRecord>,
    pub(crate) firm_index: HashMap<String, RowId>,
}

impl InvestorPool {
    /// Creates a new, empty pool
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            firm_index: HashMap::new(),
        }
    }

    /// Build a pool from already-cleaned rows, keeping their order
    pub fn from_records(records: Vec<InvestorRecord>) -> Self {
        let mut pool = Self {
            records: Vec::with_capacity(records.len()),
            firm_index: HashMap::with_capacity(records.len()),
        };
        for record in records {
            pool.insert_investor(record);
        }
        pool
    }

    /// Append a row and register its firm if this is the firm's first row
    pub fn insert_investor(&mut self, record: InvestorRecord) -> RowId {
        let row_id = self.records.len();
        self.firm_index.entry(record.firm.clone()).or_insert(row_id);
        self.records.push(record);
        row_id
    }

    /// Get a row by position
    pub fn get(&self, row_id: RowId) -> Option<&InvestorRecord> {
        self.records.get(row_id)
    }

    /// Every row, in load order
    pub fn records(&self) -> &[InvestorRecord] {
        &self.records
    }

    /// The first row loaded for `firm`
    pub fn canonical_for_firm(&self, firm: &str) -> Option<&InvestorRecord> {
        self.firm_index
            .get(firm)
            .and_then(|&row_id| self.records.get(row_id))
    }

    /// Rows whose investor name matches exactly
    pub fn find_by_name<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = (RowId, &'a InvestorRecord)> + 'a {
        self.records
            .iter()
            .enumerate()
            .filter(move |(_, r)| r.investor_name.as_deref() == Some(name))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of distinct firms
    pub fn firm_count(&self) -> usize {
        self.firm_index.len()
    }
}
