//! Checkpoint persistence for resuming an interrupted registration.

mod memory;
mod sled_store;

use l1_step_tracker::StepTracker;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use self::{memory::MemoryCheckpointStore, sled_store::SledCheckpointStore};
use crate::{context::RegistrationContext, request::RegistrationRequest, step::RegistrationStep};

#[derive(Debug, Error)]
pub enum CheckpointStoreError {
    #[error("sled: {0}")]
    Sled(#[from] sled::Error),

    #[error("codec: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Everything needed to pick a registration back up after a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationCheckpoint {
    pub id: String,
    pub request: RegistrationRequest,
    pub context: RegistrationContext,
    pub tracker: StepTracker<RegistrationStep>,
    /// Unix seconds of the last write.
    pub updated_at: u64,
}

impl RegistrationCheckpoint {
    pub fn is_complete(&self) -> bool {
        self.tracker.is_complete()
    }
}

/// Durable storage of [`RegistrationCheckpoint`]s keyed by registration id.
///
/// Calls are synchronous and expected to be quick; `save` must be durable
/// when it returns.
pub trait CheckpointStore: Send + Sync + 'static {
    fn save(&self, checkpoint: &RegistrationCheckpoint) -> Result<(), CheckpointStoreError>;

    fn load(&self, id: &str) -> Result<Option<RegistrationCheckpoint>, CheckpointStoreError>;

    fn remove(&self, id: &str) -> Result<(), CheckpointStoreError>;

    /// All stored checkpoints ordered by id.
    fn list(&self) -> Result<Vec<RegistrationCheckpoint>, CheckpointStoreError>;
}
