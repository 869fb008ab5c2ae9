// ABOUTME: Builds the variable map used as template data and by the `val` function
// ABOUTME: Environment entries are applied first, then --set overrides in the order given

use std::collections::HashMap;
use tracing::{debug, warn};

use super::error::{Result, ValueError};

/// Variable name to value. Built once per invocation and never mutated after rendering starts.
pub type VariableMap = HashMap<String, String>;

/// Split a `NAME=VALUE` entry at the first `=`.
///
/// Everything after the first `=` belongs to the value, so `A=b=c` yields `("A", "b=c")`.
/// Entries without `=` or with an empty name are rejected.
pub fn parse_assignment(entry: &str) -> Result<(&str, &str)> {
    match entry.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name, value)),
        _ => Err(ValueError::MalformedVariableAssignment(entry.to_string())),
    }
}

/// Accumulates variables layer by layer; later layers win.
#[derive(Debug, Default, Clone)]
pub struct ValueResolver {
    values: VariableMap,
}

impl ValueResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Import every variable of the current process environment.
    ///
    /// Entries that are not valid UTF-8 can't be represented as string variables and are skipped.
    pub fn with_process_environment(mut self) -> Self {
        let mut skipped = 0usize;
        for (name, value) in std::env::vars_os() {
            match (name.into_string(), value.into_string()) {
                (Ok(name), Ok(value)) => {
                    self.values.insert(name, value);
                }
                (name, _) => {
                    skipped += 1;
                    warn!(
                        "Skipping non UTF-8 environment variable {:?}",
                        name.unwrap_or_else(|n| n.to_string_lossy().into_owned())
                    );
                }
            }
        }
        debug!(
            "Imported {} environment variables ({} skipped)",
            self.values.len(),
            skipped
        );
        self
    }

    /// Import environment entries given as `NAME=VALUE` strings.
    pub fn with_env_entries<I, S>(mut self, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for entry in entries {
            let (name, value) = parse_assignment(entry.as_ref())?;
            self.values.insert(name.to_string(), value.to_string());
        }
        Ok(self)
    }

    /// Apply explicit overrides in order. Each one replaces any earlier value for the same name.
    pub fn with_overrides<I, S>(mut self, overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut applied = 0usize;
        for entry in overrides {
            let (name, value) = parse_assignment(entry.as_ref())?;
            if self.values.insert(name.to_string(), value.to_string()).is_some() {
                debug!("Override replaces existing value for {}", name);
            }
            applied += 1;
        }
        debug!("Applied {} variable overrides", applied);
        Ok(self)
    }

    pub fn resolve(self) -> VariableMap {
        self.values
    }
}

/// Merge `NAME=VALUE` environment entries with overrides: overrides win, later overrides win.
pub fn resolve_variables<E, O, S, T>(env: E, overrides: O) -> Result<VariableMap>
where
    E: IntoIterator<Item = S>,
    S: AsRef<str>,
    O: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    Ok(ValueResolver::new()
        .with_env_entries(env)?
        .with_overrides(overrides)?
        .resolve())
}
