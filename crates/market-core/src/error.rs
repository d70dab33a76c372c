use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarketError {
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Malformed payload: {0}")]
    Parse(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Solver did not converge: {0}")]
    NonConvergence(String),
}
