// ABOUTME: Error types for command execution, the registry adapter, configuration, and tables.
// ABOUTME: Query misses are not errors; they surface as None from the adapter.

use std::path::PathBuf;
use std::time::Duration;

/// Failure running the external command itself.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("i/o error talking to {program}: {source}")]
    Io {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} did not finish within {timeout:?}")]
    TimedOut { program: String, timeout: Duration },
}

/// Failure of an add or delete against the registry.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("registry command unavailable: {0}")]
    Unavailable(String),

    #[error("registry command exited with {status}: {stderr}")]
    CommandFailed { status: i32, stderr: String },

    #[error("registry command timed out after {0:?}")]
    TimedOut(Duration),
}

impl From<ExecError> for StoreError {
    fn from(e: ExecError) -> Self {
        match e {
            ExecError::Spawn { .. } | ExecError::Io { .. } => StoreError::Unavailable(e.to_string()),
            ExecError::TimedOut { timeout, .. } => StoreError::TimedOut(timeout),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A descriptor table that cannot be persisted safely.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableError {
    #[error("duplicate key in descriptor table: {0}")]
    DuplicateKey(String),

    #[error("descriptor key {0} collides with the status flag")]
    ReservedKey(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_failure_maps_to_unavailable() {
        let e = ExecError::Spawn {
            program: "reg".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        let store: StoreError = e.into();
        assert!(matches!(store, StoreError::Unavailable(ref msg) if msg.contains("reg")));
    }

    #[test]
    fn timeout_keeps_duration() {
        let e = ExecError::TimedOut {
            program: "reg".to_string(),
            timeout: Duration::from_millis(250),
        };
        let store: StoreError = e.into();
        assert!(matches!(store, StoreError::TimedOut(d) if d == Duration::from_millis(250)));
    }

    #[test]
    fn command_failed_display_includes_status_and_stderr() {
        let e = StoreError::CommandFailed {
            status: 1,
            stderr: "Access is denied.".to_string(),
        };
        let display = e.to_string();
        assert!(display.contains("exited with 1"));
        assert!(display.contains("Access is denied."));
    }
}
