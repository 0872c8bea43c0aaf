use std::sync::{Arc, OnceLock};

use super::StaticConfig;

static CONFIG: OnceLock<Arc<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Returns an Arc pointer to the configuration, which is cheap to clone
/// and doesn't hold any locks. Falls back to defaults if `init_config`
/// was never called.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get_or_init(|| Arc::new(StaticConfig::default()))
        .clone()
}

/// Initialize the global configuration from `path`
///
/// If the file doesn't exist, uses in-memory defaults plus `IPC__*` env overrides.
/// Only the first call has an effect.
pub fn init_config(path: &str) {
    CONFIG.get_or_init(|| Arc::new(StaticConfig::load(path)));
}

/// Install an already-built configuration (first call wins)
pub fn init_config_with(config: StaticConfig) {
    CONFIG.get_or_init(|| Arc::new(config));
}
