//! Process-wide state keyed by chain ID.
//!
//! Each chain gets its own independently owned value with an explicit
//! lifecycle: it must be created before it can be read or updated, and
//! `reset` restores the value it was created with.

use std::{collections::HashMap, fmt};

use parking_lot::RwLock;
use thiserror::Error;
use tracing::debug;

/// Errors returned by [`ChainRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// An entry for this chain already exists.
    #[error("state for chain {0} already exists")]
    AlreadyExists(u64),

    /// No entry exists for this chain.
    #[error("no state registered for chain {0}")]
    NotFound(u64),
}

struct Entry<T> {
    initial: T,
    current: T,
}

/// Registry of per-chain state.
pub struct ChainRegistry<T> {
    entries: RwLock<HashMap<u64, Entry<T>>>,
}

impl<T> fmt::Debug for ChainRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainRegistry")
            .field("chains", &self.entries.read().len())
            .finish()
    }
}

impl<T> Default for ChainRegistry<T> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<T: Clone> ChainRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `initial` as the state for `chain_id`.
    pub fn create(&self, chain_id: u64, initial: T) -> Result<(), RegistryError> {
        let mut entries = self.entries.write();
        if entries.contains_key(&chain_id) {
            return Err(RegistryError::AlreadyExists(chain_id));
        }
        debug!(%chain_id, "creating chain state");
        entries.insert(
            chain_id,
            Entry {
                current: initial.clone(),
                initial,
            },
        );
        Ok(())
    }

    /// Returns a clone of the current state for `chain_id`.
    pub fn get(&self, chain_id: u64) -> Option<T> {
        self.entries.read().get(&chain_id).map(|e| e.current.clone())
    }

    /// Returns the current state, creating it with `init` if missing.
    pub fn get_or_create(&self, chain_id: u64, init: impl FnOnce() -> T) -> T {
        let mut entries = self.entries.write();
        let entry = entries.entry(chain_id).or_insert_with(|| {
            let initial = init();
            Entry {
                current: initial.clone(),
                initial,
            }
        });
        entry.current.clone()
    }

    /// Applies `f` to the state of `chain_id` and returns its result.
    pub fn update<R>(&self, chain_id: u64, f: impl FnOnce(&mut T) -> R) -> Result<R, RegistryError> {
        let mut entries = self.entries.write();
        let entry = entries
            .get_mut(&chain_id)
            .ok_or(RegistryError::NotFound(chain_id))?;
        Ok(f(&mut entry.current))
    }

    /// Restores the state of `chain_id` to the value it was created with.
    pub fn reset(&self, chain_id: u64) -> Result<(), RegistryError> {
        let mut entries = self.entries.write();
        let entry = entries
            .get_mut(&chain_id)
            .ok_or(RegistryError::NotFound(chain_id))?;
        debug!(%chain_id, "resetting chain state");
        entry.current = entry.initial.clone();
        Ok(())
    }

    /// Removes the state for `chain_id`, returning its last value.
    pub fn remove(&self, chain_id: u64) -> Option<T> {
        self.entries.write().remove(&chain_id).map(|e| e.current)
    }

    /// Returns the registered chain IDs in ascending order.
    pub fn chain_ids(&self) -> Vec<u64> {
        let mut ids: Vec<_> = self.entries.read().keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_get_update_reset() {
        let registry = ChainRegistry::new();
        registry.create(43114, vec![1u32]).unwrap();

        registry.update(43114, |v| v.push(2)).unwrap();
        assert_eq!(registry.get(43114), Some(vec![1, 2]));

        registry.reset(43114).unwrap();
        assert_eq!(registry.get(43114), Some(vec![1]));
    }

    #[test]
    fn test_create_twice_fails() {
        let registry = ChainRegistry::new();
        registry.create(1, 0u8).unwrap();
        assert_eq!(registry.create(1, 5), Err(RegistryError::AlreadyExists(1)));
        assert_eq!(registry.get(1), Some(0));
    }

    #[test]
    fn test_missing_chain() {
        let registry: ChainRegistry<u8> = ChainRegistry::new();
        assert_eq!(registry.get(7), None);
        assert_eq!(registry.update(7, |_| ()), Err(RegistryError::NotFound(7)));
        assert_eq!(registry.reset(7), Err(RegistryError::NotFound(7)));
    }

    #[test]
    fn test_chains_are_independent() {
        let registry = ChainRegistry::new();
        registry.create(1, String::from("a")).unwrap();
        let b = registry.get_or_create(2, || String::from("b"));
        assert_eq!(b, "b");

        registry.update(1, |s| s.push('x')).unwrap();
        assert_eq!(registry.get(1).as_deref(), Some("ax"));
        assert_eq!(registry.get(2).as_deref(), Some("b"));
        assert_eq!(registry.chain_ids(), vec![1, 2]);

        assert_eq!(registry.remove(1).as_deref(), Some("ax"));
        assert_eq!(registry.chain_ids(), vec![2]);
    }
}
