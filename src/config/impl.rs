use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::StaticConfig;

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Returns an Arc pointer to the configuration, which is cheap to clone
/// and doesn't hold any locks. Falls back to defaults (plus environment
/// overrides) when `init_config` was never called, which keeps library
/// users and tests free of setup boilerplate.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get_or_init(|| ArcSwap::from_pointee(StaticConfig::load(DEFAULT_CONFIG_PATH)))
        .load_full()
}

/// Initialize the global configuration from `config.toml`
///
/// # Examples
/// ```no_run
/// use adscope::config::init_config;
/// init_config();
/// ```
pub fn init_config() {
    init_config_from(DEFAULT_CONFIG_PATH);
}

/// Initialize the global configuration from an explicit path
///
/// Only the first initialization wins.
pub fn init_config_from(path: &str) {
    CONFIG.get_or_init(|| ArcSwap::from_pointee(StaticConfig::load(path)));
}

/// Replace the active configuration
pub fn set_config(config: StaticConfig) {
    match CONFIG.get() {
        Some(current) => current.store(Arc::new(config)),
        None => {
            let _ = CONFIG.set(ArcSwap::from_pointee(config));
        }
    }
}
