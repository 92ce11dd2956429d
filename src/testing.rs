// ABOUTME: In-memory stand-in for the reg command, used by unit tests.
// ABOUTME: Emulates add/delete/query exit codes and output text and records every invocation.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use crate::error::ExecError;
use crate::executor::{CommandExecutor, CommandOutput};

const NOT_FOUND: &str =
    "ERROR: The system was unable to find the specified registry key or value.\r\n";

const NOT_FOUND_DE: &str =
    "FEHLER: Der angegebene Registrierungsschl\u{fc}ssel bzw. Wert wurde nicht gefunden.\r\n";

/// Fake registry keyed by value name under a single root.
#[derive(Default)]
pub struct FakeRegistry {
    values: RefCell<BTreeMap<String, String>>,
    calls: RefCell<Vec<Vec<String>>>,
    denied: BTreeSet<String>,
    unavailable: bool,
    hang: bool,
    localized: bool,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every invocation fails as if the executable were missing.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Every invocation fails as if the command hung past its timeout.
    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::default()
        }
    }

    /// Error messages come out in German, as on a localized Windows.
    pub fn localized() -> Self {
        Self {
            localized: true,
            ..Self::default()
        }
    }

    /// Writes and deletes of `key` exit non-zero with "Access is denied."
    pub fn deny(mut self, key: &str) -> Self {
        self.denied.insert(key.to_string());
        self
    }

    pub fn with_value(self, key: &str, value: &str) -> Self {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    pub fn contents(&self) -> BTreeMap<String, String> {
        self.values.borrow().clone()
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }

    /// Subcommand and value name of each call, e.g. `("add", "Frame.ToolBar")`.
    pub fn operations(&self) -> Vec<(String, String)> {
        self.calls
            .borrow()
            .iter()
            .map(|args| {
                let op = args.first().cloned().unwrap_or_default();
                let key = arg_after(args, "/v").unwrap_or_default();
                (op, key)
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn denied_output(&self) -> CommandOutput {
        let stderr = if self.localized {
            "FEHLER: Zugriff verweigert\r\n"
        } else {
            "ERROR: Access is denied.\r\n"
        };
        CommandOutput {
            status: 1,
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }

    fn not_found_output(&self) -> CommandOutput {
        let stderr = if self.localized { NOT_FOUND_DE } else { NOT_FOUND };
        CommandOutput {
            status: 1,
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }
}

fn arg_after(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

impl CommandExecutor for FakeRegistry {
    fn execute(&self, program: &str, args: &[String]) -> Result<CommandOutput, ExecError> {
        self.calls.borrow_mut().push(args.to_vec());

        if self.unavailable {
            return Err(ExecError::Spawn {
                program: program.to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        if self.hang {
            return Err(ExecError::TimedOut {
                program: program.to_string(),
                timeout: Duration::from_millis(1),
            });
        }

        let op = args.first().map(String::as_str).unwrap_or_default();
        let root = args.get(1).cloned().unwrap_or_default();
        let Some(key) = arg_after(args, "/v") else {
            return Ok(CommandOutput {
                status: 1,
                stdout: String::new(),
                stderr: "ERROR: Invalid syntax.\r\n".to_string(),
            });
        };

        match op {
            "add" => {
                if self.denied.contains(&key) {
                    return Ok(self.denied_output());
                }
                let data = arg_after(args, "/d").unwrap_or_default();
                self.values.borrow_mut().insert(key, data);
                Ok(CommandOutput {
                    status: 0,
                    stdout: "The operation completed successfully.\r\n".to_string(),
                    stderr: String::new(),
                })
            }
            "delete" => {
                if self.denied.contains(&key) {
                    return Ok(self.denied_output());
                }
                match self.values.borrow_mut().remove(&key) {
                    Some(_) => Ok(CommandOutput {
                        status: 0,
                        stdout: "The operation completed successfully.\r\n".to_string(),
                        stderr: String::new(),
                    }),
                    None => Ok(self.not_found_output()),
                }
            }
            "query" => match self.values.borrow().get(&key) {
                Some(data) => Ok(CommandOutput {
                    status: 0,
                    stdout: format!("\r\n{root}\r\n    {key}    REG_SZ    {data}\r\n\r\n"),
                    stderr: String::new(),
                }),
                None => Ok(self.not_found_output()),
            },
            _ => Ok(CommandOutput {
                status: 1,
                stdout: String::new(),
                stderr: "ERROR: Invalid syntax.\r\n".to_string(),
            }),
        }
    }
}
