//! Loading the trained artifacts at process start.

use crate::encoder::EncoderSet;
use crate::error::Result;
use crate::relevance::RelevanceModel;
use crate::xgboost::TreeEnsemble;
use std::path::Path;
use std::sync::Arc;

/// The trained model and its encoders, shared read-only across requests.
#[derive(Clone)]
pub struct ModelArtifacts {
    pub model: Arc<dyn RelevanceModel>,
    pub encoders: Arc<EncoderSet>,
}

impl ModelArtifacts {
    /// Load both artifacts. Any failure here should abort startup.
    pub fn load(model_path: &Path, encoders_path: &Path) -> Result<Self> {
        let model = TreeEnsemble::load(model_path)?;
        let encoders = EncoderSet::load(encoders_path)?;
        Ok(Self {
            model: Arc::new(model),
            encoders: Arc::new(encoders),
        })
    }

    /// Wrap already-built components (tests, alternative models)
    pub fn new(model: Arc<dyn RelevanceModel>, encoders: Arc<EncoderSet>) -> Self {
        Self { model, encoders }
    }
}
