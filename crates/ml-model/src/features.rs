//! The model's input row.

/// Number of features the relevance model consumes
pub const NUM_FEATURES: usize = 8;

/// One (query, candidate) pair, categoricals already encoded.
///
/// [`FeatureRow::to_array`] is the only place the model's column order is
/// spelled out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRow {
    pub industry: u32,
    pub stage: u32,
    pub funding_required: f64,
    pub investor_industry: u32,
    pub investor_stage: u32,
    pub check_size: f64,
    pub success_rate: f64,
    pub firm: u32,
}

impl FeatureRow {
    /// Dense f32 vector, the precision tree thresholds are stored in
    pub fn to_array(&self) -> [f32; NUM_FEATURES] {
        [
            self.industry as f32,
            self.stage as f32,
            self.funding_required as f32,
            self.investor_industry as f32,
            self.investor_stage as f32,
            self.check_size as f32,
            self.success_rate as f32,
            self.firm as f32,
        ]
    }
}
