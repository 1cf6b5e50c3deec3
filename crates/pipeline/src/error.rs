//! Request validation errors.
//!
//! These are reported before any pipeline work starts. Failures inside the
//! pipeline itself travel as `anyhow::Error`.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Request body must be a JSON object")]
    NotAnObject,

    /// Message matches what callers already parse: `Missing required field: Stage`
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}
