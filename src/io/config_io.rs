use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

/// Error type for config file operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("could not edit {path}: {source}")]
    EditError {
        path: PathBuf,
        source: toml_edit::TomlError,
    },
    #[error("unknown config key '{0}'")]
    UnknownKey(String),
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

/// Get the config file path, respecting XDG_CONFIG_HOME
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"));
    config_dir.join("daylist").join("config.toml")
}

/// Default data directory, respecting XDG_DATA_HOME
pub fn default_data_dir() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local").join("share"))
        .join("daylist")
}

/// Data directory in effect: the command-line override, then
/// `storage.data_dir`, then the XDG default.
pub fn resolve_data_dir(config: &Config, override_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir.to_path_buf();
    }
    match &config.storage.data_dir {
        Some(dir) => expand_home(dir),
        None => default_data_dir(),
    }
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => home_dir().join(rest),
        None => PathBuf::from(path),
    }
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Read the config at `path`. A missing file yields the defaults.
pub fn read_config_from(path: &Path) -> Result<Config, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

pub fn read_config() -> Result<Config, ConfigError> {
    read_config_from(&config_path())
}

// ---------------------------------------------------------------------------
// Editing
// ---------------------------------------------------------------------------

/// Set a dotted key (`storage.debounce_ms`, `ui.colors.dark.accent`, ...)
/// in the config file at `path`, preserving existing formatting and
/// comments. The file is created if missing. The edited document must still
/// parse as a valid config.
pub fn set_config_value(path: &Path, key: &str, raw_value: &str) -> Result<(), ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    let mut doc: toml_edit::DocumentMut =
        text.parse().map_err(|e| ConfigError::EditError {
            path: path.to_path_buf(),
            source: e,
        })?;

    let value = typed_value(key, raw_value)?;
    set_dotted(&mut doc, key, value)?;

    let edited = doc.to_string();
    toml::from_str::<Config>(&edited).map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        reason: e.message().to_string(),
    })?;

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| ConfigError::WriteError {
            path: dir.to_path_buf(),
            source: e,
        })?;
    }
    fs::write(path, edited).map_err(|e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Convert the raw command-line value to the TOML type the key expects.
fn typed_value(key: &str, raw: &str) -> Result<toml_edit::Item, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    };
    match key {
        "storage.debounce_ms" | "storage.quota_bytes" => {
            let n: i64 = raw
                .parse()
                .map_err(|_| invalid("expected a whole number"))?;
            if n < 0 {
                return Err(invalid("must not be negative"));
            }
            Ok(toml_edit::value(n))
        }
        "ui.show_key_hints" => {
            let b: bool = raw.parse().map_err(|_| invalid("expected true or false"))?;
            Ok(toml_edit::value(b))
        }
        "ui.system_theme" => match raw {
            "light" | "dark" => Ok(toml_edit::value(raw)),
            _ => Err(invalid("expected light or dark")),
        },
        "storage.data_dir" => Ok(toml_edit::value(raw)),
        k if k.starts_with("ui.colors.light.") || k.starts_with("ui.colors.dark.") => {
            Ok(toml_edit::value(raw))
        }
        _ => Err(ConfigError::UnknownKey(key.to_string())),
    }
}

/// Walk/create tables for every segment but the last, then set the leaf.
fn set_dotted(
    doc: &mut toml_edit::DocumentMut,
    key: &str,
    value: toml_edit::Item,
) -> Result<(), ConfigError> {
    let parts: Vec<&str> = key.split('.').collect();
    let Some((leaf, tables)) = parts.split_last() else {
        return Err(ConfigError::UnknownKey(key.to_string()));
    };

    let mut table = doc.as_table_mut();
    for part in tables {
        if !table.contains_key(part) {
            let mut child = toml_edit::Table::new();
            child.set_implicit(true);
            table.insert(part, toml_edit::Item::Table(child));
        }
        table = table[*part]
            .as_table_mut()
            .ok_or_else(|| ConfigError::InvalidValue {
                key: key.to_string(),
                reason: format!("'{}' is not a table", part),
            })?;
    }
    table[*leaf] = value;
    Ok(())
}
