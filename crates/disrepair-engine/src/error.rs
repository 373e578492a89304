//! Error types for disrepair-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DisrepairError {
    /// Missing or malformed request data (periods array, period fields).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A date string that none of the accepted formats could parse.
    #[error("Malformed date: '{0}'")]
    MalformedDate(String),

    /// The aggregator was handed something validation should have rejected.
    #[error("Computation error: {0}")]
    Computation(String),
}

impl DisrepairError {
    /// Whether the error is the caller's fault (bad request) rather than an internal failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DisrepairError::InvalidInput(_) | DisrepairError::MalformedDate(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DisrepairError>;
