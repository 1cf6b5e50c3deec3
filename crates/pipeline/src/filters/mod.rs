//! Filter implementations for the candidate stage.

pub mod industry;

// Re-export for convenience
pub use industry::IndustryFilter;
