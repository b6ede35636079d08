use thiserror::Error;

use crate::diagnostics::Diagnostics;

pub type GenesisResult<T> = Result<T, GenesisError>;

#[derive(Debug, Error)]
pub enum GenesisError {
    /// Validation reported at least one error.
    #[error("genesis configuration is invalid:\n{0}")]
    Invalid(Diagnostics),

    #[error("allocation {index}: {reason}")]
    Address { index: usize, reason: String },

    #[error("allocation {index}: amount {amount} cannot be expressed in wei")]
    Amount { index: usize, amount: f64 },

    #[error("serialize genesis: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("genesis builder has shut down")]
    BuilderClosed,
}
