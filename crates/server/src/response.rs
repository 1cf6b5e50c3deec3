//! JSON bodies returned by the request boundary.

use crate::orchestrator::RankingOutcome;
use pipeline::RankedResult;
use serde::Serialize;

/// Response body of a predict request; the variant decides the shape.
///
/// - `Success`: `{"investors": [...], "ndcg": 0.83, "status": "success"}`
/// - `Invalid`: `{"error": "Missing required field: Stage"}`
/// - `Failed`: `{"error": "...", "status": "error"}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PredictResponse {
    Success {
        investors: Vec<RankedResult>,
        ndcg: f64,
        status: &'static str,
    },
    Invalid {
        error: String,
    },
    Failed {
        error: String,
        status: &'static str,
    },
}

impl PredictResponse {
    pub fn success(outcome: RankingOutcome) -> Self {
        PredictResponse::Success {
            investors: outcome.investors,
            ndcg: outcome.ndcg,
            status: "success",
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        PredictResponse::Invalid {
            error: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        PredictResponse::Failed {
            error: message.into(),
            status: "error",
        }
    }
}
