use std::time::Duration;

use l1_step_tracker::StepTrackerError;
use thiserror::Error;

use crate::{request::PreconditionError, step::RegistrationStep, store::CheckpointStoreError};

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("precondition: {0}")]
    Precondition(#[from] PreconditionError),

    #[error("{step}: missing {artifact}, retry from {retry_from}")]
    MissingArtifact {
        step: RegistrationStep,
        artifact: &'static str,
        retry_from: RegistrationStep,
    },

    #[error("{step} failed: {message}")]
    StepFailed {
        step: RegistrationStep,
        message: String,
    },

    #[error("p-chain tx {tx_id} not committed after {attempts} attempts in {elapsed:?}")]
    PollTimedOut {
        tx_id: String,
        attempts: u32,
        elapsed: Duration,
    },

    #[error("p-chain tx {tx_id} dropped: {reason}")]
    TxDropped { tx_id: String, reason: String },

    #[error("tracker: {0}")]
    Tracker(#[from] StepTrackerError),

    #[error("checkpoint: {0}")]
    Checkpoint(#[from] CheckpointStoreError),

    #[error("no checkpoint for registration {0}")]
    CheckpointNotFound(String),

    #[error("registration {0} already complete")]
    AlreadyComplete(String),
}

impl RegistrationError {
    pub fn step_failed(step: RegistrationStep, message: impl Into<String>) -> Self {
        Self::StepFailed {
            step,
            message: message.into(),
        }
    }

    pub fn missing(
        step: RegistrationStep,
        artifact: &'static str,
        retry_from: RegistrationStep,
    ) -> Self {
        Self::MissingArtifact {
            step,
            artifact,
            retry_from,
        }
    }
}
