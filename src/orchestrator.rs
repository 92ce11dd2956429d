// ABOUTME: Walks the descriptor table to store, clean, or read back settings in the registry.
// ABOUTME: Per-key failures are logged and counted but never stop the remaining keys.

use regprefs_host::{Host, Value};
use serde::Serialize;

use crate::descriptor::SettingDescriptor;
use crate::error::StoreError;
use crate::executor::CommandExecutor;
use crate::status::StatusCache;
use crate::store::RegistryStore;

/// What storing one descriptor does to its key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Action {
    Write { key: String, value: String },
    Delete { key: String },
}

impl Action {
    pub fn key(&self) -> &str {
        match self {
            Action::Write { key, .. } | Action::Delete { key } => key,
        }
    }
}

/// Outcome counts for one pass over the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StoreReport {
    pub written: usize,
    pub deleted: usize,
    pub failed: usize,
    /// Failures caused by the reg command being missing or not runnable.
    pub unavailable: usize,
}

impl StoreReport {
    /// True when nothing succeeded because the store could not be reached at all.
    pub fn store_unreachable(&self) -> bool {
        self.failed > 0 && self.unavailable == self.failed && self.written + self.deleted == 0
    }

    fn record(&mut self, action: &Action, result: &Result<(), StoreError>) {
        match (result, action) {
            (Ok(()), Action::Write { .. }) => self.written += 1,
            (Ok(()), Action::Delete { .. }) => self.deleted += 1,
            (Err(e), _) => {
                self.failed += 1;
                if matches!(e, StoreError::Unavailable(_)) {
                    self.unavailable += 1;
                }
            }
        }
    }
}

/// Decide the action for one descriptor. Source failures clear the key.
pub fn plan_one(descriptor: &SettingDescriptor, host: &dyn Host) -> Action {
    let key = descriptor.key.to_string();
    let value = match descriptor.source.resolve(host) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!("No value for {key}: {e}");
            return Action::Delete { key };
        }
    };
    match descriptor.encode(&value) {
        Some(value) => Action::Write { key, value },
        None => Action::Delete { key },
    }
}

/// Persists a descriptor table into a registry store.
pub struct Persister<'t, E> {
    store: RegistryStore<E>,
    status: StatusCache,
    table: &'t [SettingDescriptor],
}

impl<'t, E: CommandExecutor> Persister<'t, E> {
    pub fn new(store: RegistryStore<E>, status: StatusCache, table: &'t [SettingDescriptor]) -> Self {
        Self {
            store,
            status,
            table,
        }
    }

    pub fn is_stored(&mut self) -> bool {
        self.status.is_stored(&self.store)
    }

    /// Actions `store_all` would issue, in table order, without touching the store.
    pub fn plan(&self, host: &dyn Host) -> Vec<Action> {
        self.table.iter().map(|d| plan_one(d, host)).collect()
    }

    /// Mark settings stored, then write or clear every key in the table.
    pub fn store_all(&mut self, host: &dyn Host) -> StoreReport {
        if let Err(e) = self.status.mark_stored(&self.store) {
            tracing::warn!("Failed to set status flag {}: {e}", self.status.key());
        }

        let mut report = StoreReport::default();
        for descriptor in self.table {
            let action = plan_one(descriptor, host);
            let result = self.apply(&action);
            report.record(&action, &result);
        }

        self.finish("Stored", &report);
        report
    }

    /// Delete every key the table could have written, then clear the status flag.
    pub fn clean_all(&mut self) -> StoreReport {
        let mut report = StoreReport::default();
        for descriptor in self.table {
            let action = Action::Delete {
                key: descriptor.key.to_string(),
            };
            let result = self.apply(&action);
            report.record(&action, &result);
        }

        if let Err(e) = self.status.mark_unstored(&self.store) {
            tracing::warn!("Failed to clear status flag {}: {e}", self.status.key());
        }

        self.finish("Cleaned", &report);
        report
    }

    /// Stored values decoded back into host values, in table order.
    pub fn fetch_decoded(&self) -> Vec<(&'static str, Option<Value>)> {
        self.table
            .iter()
            .map(|d| (d.key, self.store.query(d.key).and_then(|text| d.decode(&text))))
            .collect()
    }

    /// Currently stored value of every key, in table order.
    pub fn fetch_all(&self) -> Vec<(&'static str, Option<String>)> {
        self.table
            .iter()
            .map(|d| (d.key, self.store.query(d.key)))
            .collect()
    }

    fn apply(&self, action: &Action) -> Result<(), StoreError> {
        let result = match action {
            Action::Write { key, value } => self.store.add(key, value),
            Action::Delete { key } => self.store.delete(key),
        };
        if let Err(e) = &result {
            tracing::warn!("Registry update of {} failed: {e}", action.key());
        }
        result
    }

    fn finish(&self, verb: &str, report: &StoreReport) {
        if report.store_unreachable() {
            tracing::warn!(
                "{} could not be run for any key under {}; settings were not changed",
                self.store.program(),
                self.store.root()
            );
            return;
        }
        tracing::info!(
            "{verb} settings under {}: {} written, {} deleted, {} failed",
            self.store.root(),
            report.written,
            report.deleted,
            report.failed
        );
    }
}
