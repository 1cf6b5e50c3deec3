//! Errors raised while loading or running model artifacts.

use thiserror::Error;

/// Errors that can occur when loading encoders or scoring with the model
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {what}: {source}")]
    Json {
        what: String,
        source: serde_json::Error,
    },

    #[error("Missing encoder table for column: {0}")]
    MissingEncoder(String),

    #[error("Encoder for column {0} has no classes")]
    EmptyVocabulary(String),

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Invalid tree {tree}: {reason}")]
    InvalidTree { tree: usize, reason: String },

    #[error("Model expects {expected} features but rows carry {found}")]
    FeatureCountMismatch { expected: usize, found: usize },

    #[error("Model returned {found} scores for {expected} rows")]
    PredictionLengthMismatch { expected: usize, found: usize },
}

pub type Result<T> = std::result::Result<T, ModelError>;
