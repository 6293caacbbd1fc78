use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding store.json and the log file.
    /// If absent, `$XDG_DATA_HOME/daylist` is used.
    #[serde(default)]
    pub data_dir: Option<String>,
    /// How long a write waits for further changes before hitting disk
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Writes larger than this fail with a quota error. 0 disables the check.
    #[serde(default = "default_quota_bytes")]
    pub quota_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            data_dir: None,
            debounce_ms: default_debounce_ms(),
            quota_bytes: default_quota_bytes(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    100
}

fn default_quota_bytes() -> u64 {
    5 * 1024 * 1024
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    /// Forces the "system" theme signal ("light" or "dark").
    /// Absent = detect from the terminal.
    #[serde(default)]
    pub system_theme: Option<String>,
    #[serde(default)]
    pub show_key_hints: bool,
    #[serde(default)]
    pub colors: ThemeColors,
}

/// Per-theme colour overrides, hex strings keyed by palette slot
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ThemeColors {
    #[serde(default)]
    pub light: HashMap<String, String>,
    #[serde(default)]
    pub dark: HashMap<String, String>,
}
