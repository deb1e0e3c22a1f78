use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::io::paths::config_path;
use crate::io::storage::atomic_write;
use crate::model::config::AppConfig;

/// Error type for config I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not parse config.toml: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not parse config.toml: {0}")]
    Edit(#[from] toml_edit::TomlError),
    #[error("unknown config key '{0}' (expected: ui.show_key_hints, ui.autofocus_add, ui.colors.<name>, log.level, defaults.priority)")]
    UnknownKey(String),
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// Read config.toml, returning both the parsed config and the raw
/// toml_edit document for formatting-preserving edits.
///
/// A missing file yields the defaults and an empty document.
pub fn read_config(data_dir: &Path) -> Result<(AppConfig, toml_edit::DocumentMut), ConfigError> {
    let path = config_path(data_dir);
    let text = match fs::read_to_string(&path) {
        Ok(t) => t,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(ConfigError::ReadError { path, source: e }),
    };
    let config: AppConfig = toml::from_str(&text)?;
    let doc: toml_edit::DocumentMut = text.parse()?;
    Ok((config, doc))
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(data_dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    let path = config_path(data_dir);
    fs::create_dir_all(data_dir).map_err(|e| ConfigError::WriteError {
        path: data_dir.to_path_buf(),
        source: e,
    })?;
    atomic_write(&path, doc.to_string().as_bytes())
        .map_err(|e| ConfigError::WriteError { path, source: e })
}

/// Set a dotted key like `ui.show_key_hints` in the document.
///
/// The edited document is re-parsed as [`AppConfig`] so a bad value is
/// rejected before anything reaches disk.
pub fn set_config_value(
    doc: &mut toml_edit::DocumentMut,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    let parts: Vec<&str> = key.split('.').collect();
    let item = match parts.as_slice() {
        ["ui", "show_key_hints"] | ["ui", "autofocus_add"] => {
            let flag = parse_bool(value).ok_or_else(|| ConfigError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
                reason: "expected true or false".into(),
            })?;
            toml_edit::value(flag)
        }
        ["ui", "colors", _] | ["log", "level"] | ["defaults", "priority"] => {
            toml_edit::value(value)
        }
        _ => return Err(ConfigError::UnknownKey(key.to_string())),
    };

    let (table_path, leaf) = parts.split_at(parts.len() - 1);
    let mut table = doc.as_table_mut();
    for (i, name) in table_path.iter().copied().enumerate() {
        if !table.contains_key(name) {
            let mut t = toml_edit::Table::new();
            // `[ui]` stays implicit when only `[ui.colors]` is needed
            t.set_implicit(i + 1 < table_path.len());
            table.insert(name, toml_edit::Item::Table(t));
        }
        table = table[name]
            .as_table_mut()
            .ok_or_else(|| ConfigError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
                reason: format!("'{}' is not a table", name),
            })?;
    }
    table[leaf[0]] = item;

    toml::from_str::<AppConfig>(&doc.to_string()).map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: e.message().to_string(),
    })?;
    Ok(())
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}
