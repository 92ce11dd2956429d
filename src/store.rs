// ABOUTME: Adapter over the reg command: add, delete, and query of string values under one root key.
// ABOUTME: Builds the command lines, classifies exit status, and parses query output.

use crate::error::StoreError;
use crate::executor::CommandExecutor;

/// Registry value type used for every entry written.
pub const VALUE_TYPE: &str = "REG_SZ";

/// Column separator reg uses when printing a value line.
const COLUMN_SEP: &str = "    ";

/// String-valued key/value store living under a fixed registry path.
pub struct RegistryStore<E> {
    executor: E,
    program: String,
    root: String,
}

impl<E: CommandExecutor> RegistryStore<E> {
    pub fn new(executor: E, program: impl Into<String>, root: impl Into<String>) -> Self {
        Self {
            executor,
            program: program.into(),
            root: root.into(),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Upsert `key = value`, overwriting any existing entry.
    pub fn add(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let args = to_args(&["add", &self.root, "/v", key, "/t", VALUE_TYPE, "/d", value, "/f"]);
        tracing::debug!("{} add {key} = {value:?}", self.program);
        let output = self.executor.execute(&self.program, &args)?;
        if !output.success() {
            return Err(StoreError::CommandFailed {
                status: output.status,
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(())
    }

    /// Remove `key`. Removing a key that does not exist succeeds.
    pub fn delete(&self, key: &str) -> Result<(), StoreError> {
        let args = to_args(&["delete", &self.root, "/v", key, "/f"]);
        tracing::debug!("{} delete {key}", self.program);
        let output = self.executor.execute(&self.program, &args)?;
        if output.success() || is_not_found(&output.stderr) {
            return Ok(());
        }
        // reg localizes its messages; a key that no longer reads back is gone.
        if self.query(key).is_none() {
            tracing::debug!("{key} already absent: {}", output.stderr.trim());
            return Ok(());
        }
        Err(StoreError::CommandFailed {
            status: output.status,
            stderr: output.stderr.trim().to_string(),
        })
    }

    /// Stored value of `key`, or None when absent or unreadable.
    pub fn query(&self, key: &str) -> Option<String> {
        let args = to_args(&["query", &self.root, "/v", key]);
        let output = match self.executor.execute(&self.program, &args) {
            Ok(output) => output,
            Err(e) => {
                tracing::debug!("Query of {key} failed: {e}");
                return None;
            }
        };
        if !output.success() {
            return None;
        }
        parse_query_output(&output.stdout, key)
    }
}

fn to_args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

/// reg reports a missing key or value with this phrase on stderr.
fn is_not_found(stderr: &str) -> bool {
    stderr.to_ascii_lowercase().contains("unable to find")
}

/// Extract the value of `key` from `reg query` output.
///
/// Value lines look like `    <key>    REG_SZ    <value>`.
pub fn parse_query_output(stdout: &str, key: &str) -> Option<String> {
    stdout.lines().find_map(|line| parse_value_line(line, key))
}

fn parse_value_line(line: &str, key: &str) -> Option<String> {
    let line = line.trim_end_matches('\r');
    if !line.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = line.trim_start().strip_prefix(key)?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim_start().strip_prefix(VALUE_TYPE)?;
    if rest.trim().is_empty() {
        return Some(String::new());
    }
    rest.strip_prefix(COLUMN_SEP).map(str::to_string)
}
