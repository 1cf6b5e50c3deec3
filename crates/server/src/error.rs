use pipeline::ValidationError;
use thiserror::Error;

/// Everything a ranking request can fail with.
#[derive(Error, Debug)]
pub enum RankingError {
    /// The request itself is unusable (400)
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Something broke while ranking a valid request (500)
    #[error("{0:#}")]
    Pipeline(#[from] anyhow::Error),
}

impl RankingError {
    pub fn status_code(&self) -> u16 {
        match self {
            RankingError::Validation(_) => 400,
            RankingError::Pipeline(_) => 500,
        }
    }
}
