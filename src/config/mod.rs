pub mod paths;
pub mod registry_config;

pub use registry_config::RegistryConfig;

use crate::error::LookupKind;
use crate::registry::RegistryError;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{kind} '{name}' maps to unknown implementation '{implementation}'")]
    UnknownImplementation {
        kind: LookupKind,
        name: String,
        implementation: String,
    },
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
