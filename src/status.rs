// ABOUTME: Memoized answer to "are settings currently stored?", backed by one reserved registry key.
// ABOUTME: Toggling the flag always drops the cached answer so the next check re-queries.

use crate::error::StoreError;
use crate::executor::CommandExecutor;
use crate::store::RegistryStore;

/// Cached knowledge of the status flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagState {
    #[default]
    Unknown,
    Present,
    Absent,
}

#[derive(Debug, Clone)]
pub struct StatusCache {
    key: String,
    state: FlagState,
}

impl StatusCache {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            state: FlagState::Unknown,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn state(&self) -> FlagState {
        self.state
    }

    pub fn invalidate(&mut self) {
        self.state = FlagState::Unknown;
    }

    /// Whether the flag exists, querying the store at most once per invalidation.
    pub fn is_stored<E: CommandExecutor>(&mut self, store: &RegistryStore<E>) -> bool {
        if self.state == FlagState::Unknown {
            self.state = match store.query(&self.key) {
                Some(_) => FlagState::Present,
                None => FlagState::Absent,
            };
            tracing::debug!("Status flag {} is {:?}", self.key, self.state);
        }
        self.state == FlagState::Present
    }

    pub fn mark_stored<E: CommandExecutor>(
        &mut self,
        store: &RegistryStore<E>,
    ) -> Result<(), StoreError> {
        let result = store.add(&self.key, "");
        self.invalidate();
        result
    }

    pub fn mark_unstored<E: CommandExecutor>(
        &mut self,
        store: &RegistryStore<E>,
    ) -> Result<(), StoreError> {
        let result = store.delete(&self.key);
        self.invalidate();
        result
    }
}
