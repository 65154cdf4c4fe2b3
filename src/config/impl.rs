use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::StaticConfig;

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Returns an Arc pointer to the configuration, which is cheap to clone
/// and doesn't hold any locks. Falls back to defaults when `init_config`
/// was never called (tests, embedding).
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get_or_init(|| ArcSwap::from_pointee(StaticConfig::default()))
        .load_full()
}

/// Initialize the global configuration
///
/// The first call wins the slot; later calls replace the contents so CLI
/// overrides applied after loading are visible everywhere.
pub fn init_config(config: StaticConfig) {
    let slot = CONFIG.get_or_init(|| ArcSwap::from_pointee(StaticConfig::default()));
    slot.store(Arc::new(config));
}
