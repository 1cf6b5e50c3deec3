//! Model-side components of the investor ranker.
//!
//! This crate provides everything the ranker consumes as pre-built
//! artifacts:
//! - Categorical encoders with fallback-on-unseen (`EncoderSet`)
//! - The `RelevanceModel` trait and the feature row it scores
//! - `TreeEnsemble`, an XGBoost JSON model evaluated in-process
//! - `ModelArtifacts`, loading both at startup
//!
//! Nothing here is trained or mutated at runtime.

pub mod artifacts;
pub mod encoder;
pub mod error;
pub mod features;
pub mod relevance;
pub mod xgboost;

pub use artifacts::ModelArtifacts;
pub use encoder::{CategoricalColumn, CategoricalEncoder, EncoderSet, UNKNOWN_LABEL};
pub use error::{ModelError, Result};
pub use features::{FeatureRow, NUM_FEATURES};
pub use relevance::RelevanceModel;
pub use xgboost::{Link, TreeEnsemble};
