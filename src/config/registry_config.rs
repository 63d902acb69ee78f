use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::paths;
use crate::config::ConfigError;
use crate::registry::catalog;
use crate::registry::DuplicatePolicy;

/// Which implementation backs each Sieve name.
///
/// Each table maps a Sieve identifier to a built-in implementation id.
/// A table left out of the JSON keeps its default contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub commands: BTreeMap<String, String>,
    pub tests: BTreeMap<String, String>,
    pub comparators: BTreeMap<String, String>,
    pub duplicate_policy: DuplicatePolicy,
    pub enforce_require: bool,
}

fn identity(ids: &[&str]) -> BTreeMap<String, String> {
    ids.iter().map(|id| (id.to_string(), id.to_string())).collect()
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            commands: identity(catalog::COMMANDS),
            tests: identity(catalog::TESTS),
            comparators: identity(catalog::COMPARATORS),
            duplicate_policy: DuplicatePolicy::default(),
            enforce_require: false,
        }
    }
}

impl RegistryConfig {
    pub fn from_json(data: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        debug!(path = %path.display(), "registry configuration loaded");
        Self::from_json(&data)
    }

    /// Load `<config_dir>/registry.json`, falling back to the default when
    /// there is no such file.
    pub fn load_default() -> Result<Self, ConfigError> {
        let Some(path) = paths::registry_path() else {
            return Ok(Self::default());
        };
        match Self::load(&path) {
            Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            other => other,
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registries;

    #[test]
    fn test_missing_tables_keep_defaults() {
        assert!(!RegistryConfig::default().enforce_require);
        let config = RegistryConfig::from_json(r#"{"enforce_require": true}"#).unwrap();
        assert!(config.enforce_require);
        assert_eq!(config.commands, RegistryConfig::default().commands);
    }

    #[test]
    fn test_alias_and_restrict() {
        let config = RegistryConfig::from_json(
            r#"{"commands": {"keep": "keep", "file": "fileinto"}, "tests": {"true": "true"}}"#,
        )
        .unwrap();
        let registries = Registries::from_config(&config).unwrap();
        assert_eq!(registries.commands.names(), vec!["file", "keep"]);
        assert_eq!(registries.commands.policy(), DuplicatePolicy::Reject);
        assert!(registries.commands.get("file").unwrap().is_extension());
        assert!(registries.tests.lookup("header").is_err());
        assert_eq!(registries.comparators.len(), 2);
    }

    #[test]
    fn test_bad_json() {
        let err = RegistryConfig::from_json("{ commands: }").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("registry.json");
        let mut config = RegistryConfig::default();
        config.duplicate_policy = DuplicatePolicy::Overwrite;
        config.save(&path).unwrap();

        let loaded = RegistryConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"duplicate_policy\": \"overwrite\""));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = RegistryConfig::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
