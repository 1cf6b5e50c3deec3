//! Server crate for the investor ranking service.
//!
//! This crate owns the loaded artifacts and the orchestrator that runs a
//! request through the pipeline, plus the JSON request boundary.

pub mod error;
pub mod orchestrator;
pub mod response;

pub use error::RankingError;
pub use orchestrator::{RankingContext, RankingOrchestrator, RankingOutcome};
pub use response::PredictResponse;
