/// Name-to-implementation registries for commands, tests and comparators.
pub mod catalog;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::commands::SieveCommand;
use crate::comparators::Comparator;
use crate::conditions::SieveTest;
use crate::config::{ConfigError, RegistryConfig};
use crate::error::{LookupKind, SieveError};

/// What `register` does when the name is already taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    #[default]
    Reject,
    Overwrite,
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("{kind} '{name}' is already registered")]
    Duplicate { kind: LookupKind, name: String },
}

pub struct Registry<T: ?Sized> {
    kind: LookupKind,
    policy: DuplicatePolicy,
    entries: HashMap<String, Arc<T>>,
}

pub type CommandManager = Registry<dyn SieveCommand>;
pub type TestManager = Registry<dyn SieveTest>;
pub type ComparatorManager = Registry<dyn Comparator>;

impl<T: ?Sized> Registry<T> {
    pub fn new(kind: LookupKind) -> Self {
        Self::with_policy(kind, DuplicatePolicy::default())
    }

    pub fn with_policy(kind: LookupKind, policy: DuplicatePolicy) -> Self {
        Self {
            kind,
            policy,
            entries: HashMap::new(),
        }
    }

    pub fn kind(&self) -> LookupKind {
        self.kind
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Add an implementation, honouring the duplicate policy.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        implementation: Arc<T>,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if self.policy == DuplicatePolicy::Reject && self.entries.contains_key(&name) {
            return Err(RegistryError::Duplicate {
                kind: self.kind,
                name,
            });
        }
        self.entries.insert(name, implementation);
        Ok(())
    }

    /// Add or replace an implementation, ignoring the policy.
    pub fn insert(&mut self, name: impl Into<String>, implementation: Arc<T>) {
        self.entries.insert(name.into(), implementation);
    }

    /// Exact, case-sensitive lookup.
    pub fn lookup(&self, name: &str) -> Result<Arc<T>, SieveError> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| SieveError::not_registered(self.kind, name))
    }

    pub fn get(&self, name: &str) -> Option<&Arc<T>> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: ?Sized> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("kind", &self.kind)
            .field("policy", &self.policy)
            .field("names", &self.names())
            .finish()
    }
}

/// The three managers, built once and shared read-only.
#[derive(Debug)]
pub struct Registries {
    pub commands: CommandManager,
    pub tests: TestManager,
    pub comparators: ComparatorManager,
    /// When true, extensions must be declared with `require` before use.
    pub enforce_require: bool,
}

impl Registries {
    pub fn empty(policy: DuplicatePolicy) -> Self {
        Self {
            commands: Registry::with_policy(LookupKind::Command, policy),
            tests: Registry::with_policy(LookupKind::Test, policy),
            comparators: Registry::with_policy(LookupKind::Comparator, policy),
            enforce_require: false,
        }
    }

    /// Build from a configuration, resolving each implementation id
    /// against the built-in catalog.
    pub fn from_config(config: &RegistryConfig) -> Result<Self, ConfigError> {
        let mut registries = Self::empty(config.duplicate_policy);
        registries.enforce_require = config.enforce_require;

        for (name, id) in &config.commands {
            let implementation =
                catalog::command(id).ok_or_else(|| unknown(LookupKind::Command, name, id))?;
            registries.commands.register(name.as_str(), implementation)?;
        }
        for (name, id) in &config.tests {
            let implementation =
                catalog::condition(id).ok_or_else(|| unknown(LookupKind::Test, name, id))?;
            registries.tests.register(name.as_str(), implementation)?;
        }
        for (name, id) in &config.comparators {
            let implementation =
                catalog::comparator(id).ok_or_else(|| unknown(LookupKind::Comparator, name, id))?;
            registries.comparators.register(name.as_str(), implementation)?;
        }
        Ok(registries)
    }

    /// Whether `require` may name this capability: a command or test
    /// registered as an extension, or `comparator-<name>` for any registered
    /// comparator. Core commands and tests such as `if` cannot be required.
    pub fn is_extension_available(&self, name: &str) -> bool {
        match name.strip_prefix("comparator-") {
            Some(comparator) => self.comparators.contains(comparator),
            None => {
                self.commands.get(name).is_some_and(|c| c.is_extension())
                    || self.tests.get(name).is_some_and(|t| t.is_extension())
            }
        }
    }
}

fn unknown(kind: LookupKind, name: &str, implementation: &str) -> ConfigError {
    ConfigError::UnknownImplementation {
        kind,
        name: name.to_string(),
        implementation: implementation.to_string(),
    }
}

/// The RFC 3028 set: every built-in registered under its own name.
impl Default for Registries {
    fn default() -> Self {
        let mut registries = Self::empty(DuplicatePolicy::default());
        for (name, implementation) in catalog::all_commands() {
            registries.commands.insert(name, implementation);
        }
        for (name, implementation) in catalog::all_tests() {
            registries.tests.insert(name, implementation);
        }
        for (name, implementation) in catalog::all_comparators() {
            registries.comparators.insert(name, implementation);
        }
        registries
    }
}
