//! The relevance model seam.

use crate::error::Result;
use crate::features::FeatureRow;

/// A pre-trained scorer: one base relevance score per feature row.
///
/// Implementations are read-only after construction (`Send + Sync`), so one
/// instance serves every request.
pub trait RelevanceModel: Send + Sync {
    /// Returns the name of this model (for logging/debugging)
    fn name(&self) -> &str;

    /// Score a batch of rows.
    ///
    /// # Returns
    /// * `Ok(Vec<f64>)` - One score per row, in input order
    /// * `Err` - If the model can't evaluate the batch
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>>;
}
