use std::sync::{Arc, OnceLock};

use super::StaticConfig;

static CONFIG: OnceLock<Arc<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Falls back to defaults if [`init_config`] was never called.
pub fn get_config() -> Arc<StaticConfig> {
    Arc::clone(CONFIG.get_or_init(|| Arc::new(StaticConfig::default())))
}

/// Install the global configuration
///
/// Only the first call takes effect; the configuration is fixed for the
/// lifetime of the process. Returns `false` if a configuration was already
/// installed.
pub fn init_config(config: StaticConfig) -> bool {
    CONFIG.set(Arc::new(config)).is_ok()
}
