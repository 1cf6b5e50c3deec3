//! # Data Loader Crate
//!
//! Loads the investor pool the ranker scores against.
//!
//! ## Main Components
//!
//! - **types**: `InvestorRecord` and `InvestorPool` (rows + Firm index)
//! - **parser**: CSV parsing into raw, all-text rows
//! - **normalize**: numeric cleaning for formatted amounts (`"$1,200,000"`)
//! - **index**: building the pool from a file or reader
//! - **error**: error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::InvestorPool;
//! use std::path::Path;
//!
//! let pool = InvestorPool::load_from_file(Path::new("data/investors.csv"))?;
//! let firm = pool.canonical_for_firm("Acme Ventures");
//! ```
//!
//! The pool is loaded once and then only read. Share it with `Arc`.

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod normalize;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use normalize::normalize;
pub use types::{InvestorPool, InvestorRecord, RowId};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_creation() {
        let pool = InvestorPool::new();
        assert!(pool.is_empty());
        assert_eq!(pool.firm_count(), 0);
    }

    #[test]
    fn test_insert_investor() {
        let mut pool = InvestorPool::new();

        let mut record = InvestorRecord::new("Acme");
        record.investor_name = Some("Alice".to_string());
        record.check_size = 250_000.0;

        let row_id = pool.insert_investor(record);
        assert_eq!(row_id, 0);

        let retrieved = pool.get(0).unwrap();
        assert_eq!(retrieved.firm, "Acme");
        assert_eq!(retrieved.check_size, 250_000.0);
    }

    #[test]
    fn test_second_row_of_firm_does_not_move_index() {
        let mut pool = InvestorPool::new();
        let mut first = InvestorRecord::new("Acme");
        first.investor_name = Some("Alice".to_string());
        let mut second = InvestorRecord::new("Acme");
        second.investor_name = Some("Carol".to_string());

        pool.insert_investor(first);
        pool.insert_investor(second);

        assert_eq!(pool.len(), 2);
        assert_eq!(pool.firm_count(), 1);
        assert_eq!(
            pool.canonical_for_firm("Acme").unwrap().investor_name.as_deref(),
            Some("Alice")
        );
    }

    #[test]
    fn test_find_by_name() {
        let mut pool = InvestorPool::new();
        let mut a = InvestorRecord::new("Acme");
        a.investor_name = Some("Alice".to_string());
        pool.insert_investor(a);
        pool.insert_investor(InvestorRecord::new("Beta"));

        let found: Vec<_> = pool.find_by_name("Alice").collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, 0);
    }

    #[test]
    fn test_empty_queries() {
        let pool = InvestorPool::new();
        assert!(pool.get(0).is_none());
        assert!(pool.canonical_for_firm("Acme").is_none());
        assert_eq!(pool.find_by_name("Alice").count(), 0);
    }
}
