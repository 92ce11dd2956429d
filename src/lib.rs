// ABOUTME: Persists window display settings into a per-user registry key for the next launch.
// ABOUTME: Wires the descriptor table, encoders, reg adapter, and status cache into a Persister.

pub mod config;
pub mod descriptor;
pub mod encode;
pub mod error;
pub mod executor;
pub mod orchestrator;
pub mod status;
pub mod store;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use descriptor::{DISPLAY_SETTINGS, EncodingKind, STATUS_FLAG, SettingDescriptor, ValueSource};
pub use error::{StoreError, TableError};
pub use executor::{CommandExecutor, CommandOutput, ProcessExecutor};
pub use orchestrator::{Action, Persister, StoreReport};
pub use regprefs_host::{Host, SnapshotHost, SourceError, Value};
pub use status::StatusCache;
pub use store::RegistryStore;

/// Build a persister for `table` that runs the configured reg command.
pub fn persister_from_config<'t>(
    config: &Config,
    table: &'t [SettingDescriptor],
) -> Result<Persister<'t, ProcessExecutor>, TableError> {
    descriptor::validate_table(table, &config.store.status_key)?;
    let store = RegistryStore::new(
        ProcessExecutor::new(config.store.timeout()),
        config.store.command.clone(),
        config.store.root.clone(),
    );
    Ok(Persister::new(
        store,
        StatusCache::new(config.store.status_key.clone()),
        table,
    ))
}
