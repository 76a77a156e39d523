//! Configuration module

mod plugin;

pub use plugin::{
    PluginConfig, DEFAULT_AVAILABILITY_TIMEOUT_MS, DEFAULT_INTENT_CATEGORY,
    DEFAULT_PACKAGE_NAME, DEFAULT_PROFILE_NAME, ENV_AVAILABILITY_TIMEOUT_MS,
    ENV_INTENT_ACTION, ENV_INTENT_CATEGORY, ENV_PACKAGE_NAME, ENV_PROFILE_NAME,
    PLUGIN_CONFIG_FILE,
};
