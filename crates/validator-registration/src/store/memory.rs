use std::collections::BTreeMap;

use parking_lot::Mutex;

use super::{CheckpointStore, CheckpointStoreError, RegistrationCheckpoint};

/// In-process [`CheckpointStore`], lost on exit.
#[derive(Debug, Default)]
pub struct MemoryCheckpointStore {
    inner: Mutex<BTreeMap<String, RegistrationCheckpoint>>,
}

impl MemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CheckpointStore for MemoryCheckpointStore {
    fn save(&self, checkpoint: &RegistrationCheckpoint) -> Result<(), CheckpointStoreError> {
        self.inner
            .lock()
            .insert(checkpoint.id.clone(), checkpoint.clone());
        Ok(())
    }

    fn load(&self, id: &str) -> Result<Option<RegistrationCheckpoint>, CheckpointStoreError> {
        Ok(self.inner.lock().get(id).cloned())
    }

    fn remove(&self, id: &str) -> Result<(), CheckpointStoreError> {
        self.inner.lock().remove(id);
        Ok(())
    }

    fn list(&self) -> Result<Vec<RegistrationCheckpoint>, CheckpointStoreError> {
        Ok(self.inner.lock().values().cloned().collect())
    }
}
