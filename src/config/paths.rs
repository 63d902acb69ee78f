use directories::ProjectDirs;
use std::path::PathBuf;

const REGISTRY_FILE: &str = "registry.json";

pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "sievers-interp").map(|d| d.config_dir().to_path_buf())
}

/// `<config_dir>/registry.json`, where the default registry configuration
/// is looked for.
pub fn registry_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join(REGISTRY_FILE))
}
