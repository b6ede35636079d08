use std::path::Path;

use tracing::debug;

use super::{CheckpointStore, CheckpointStoreError, RegistrationCheckpoint};

const CHECKPOINT_TREE: &str = "registration_checkpoints";

/// [`CheckpointStore`] backed by a sled tree of JSON-encoded checkpoints.
#[derive(Debug, Clone)]
pub struct SledCheckpointStore {
    tree: sled::Tree,
}

impl SledCheckpointStore {
    /// Opens (creating if needed) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CheckpointStoreError> {
        let db = sled::open(path)?;
        Self::from_db(&db)
    }

    pub fn from_db(db: &sled::Db) -> Result<Self, CheckpointStoreError> {
        Ok(Self {
            tree: db.open_tree(CHECKPOINT_TREE)?,
        })
    }
}

impl CheckpointStore for SledCheckpointStore {
    fn save(&self, checkpoint: &RegistrationCheckpoint) -> Result<(), CheckpointStoreError> {
        let value = serde_json::to_vec(checkpoint)?;
        self.tree.insert(checkpoint.id.as_bytes(), value)?;
        self.tree.flush()?;
        debug!(id = %checkpoint.id, "saved registration checkpoint");
        Ok(())
    }

    fn load(&self, id: &str) -> Result<Option<RegistrationCheckpoint>, CheckpointStoreError> {
        self.tree
            .get(id.as_bytes())?
            .map(|v| serde_json::from_slice(&v))
            .transpose()
            .map_err(Into::into)
    }

    fn remove(&self, id: &str) -> Result<(), CheckpointStoreError> {
        self.tree.remove(id.as_bytes())?;
        self.tree.flush()?;
        Ok(())
    }

    fn list(&self) -> Result<Vec<RegistrationCheckpoint>, CheckpointStoreError> {
        self.tree
            .iter()
            .values()
            .map(|v| -> Result<RegistrationCheckpoint, CheckpointStoreError> {
                Ok(serde_json::from_slice(&v?)?)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use l1_step_tracker::{StepStatus, StepTracker};

    use super::*;
    use crate::{
        context::RegistrationContext, request::tests::sample_request, step::RegistrationStep,
    };

    fn checkpoint(id: &str) -> RegistrationCheckpoint {
        let mut tracker = StepTracker::new();
        tracker.start();
        tracker
            .update_status(RegistrationStep::InitializeRegistration, StepStatus::Success)
            .unwrap();
        RegistrationCheckpoint {
            id: id.to_owned(),
            request: sample_request(),
            context: RegistrationContext {
                pchain_tx_id: Some("2Z4UtHnj".into()),
                ..Default::default()
            },
            tracker,
            updated_at: 1_700_000_000,
        }
    }

    #[test]
    fn test_save_load_remove() {
        let db = sled::Config::new().temporary(true).open().unwrap();
        let store = SledCheckpointStore::from_db(&db).unwrap();

        assert!(store.load("a").unwrap().is_none());
        store.save(&checkpoint("a")).unwrap();
        store.save(&checkpoint("b")).unwrap();

        let loaded = store.load("a").unwrap().unwrap();
        assert_eq!(loaded, checkpoint("a"));
        assert_eq!(
            loaded.tracker.current_step(),
            Some(RegistrationStep::SignMessage)
        );

        let ids: Vec<_> = store.list().unwrap().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, ["a", "b"]);

        store.remove("a").unwrap();
        assert!(store.load("a").unwrap().is_none());
    }

    #[test]
    fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = SledCheckpointStore::open(dir.path()).unwrap();
            store.save(&checkpoint("x")).unwrap();
        }
        let store = SledCheckpointStore::open(dir.path()).unwrap();
        assert_eq!(store.load("x").unwrap(), Some(checkpoint("x")));
    }
}
