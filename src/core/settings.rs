// webpify/src/core/settings.rs
use super::{
    DEFAULT_DELETE_ORIGINALS, DEFAULT_MAX_HEIGHT, DEFAULT_MAX_WIDTH, DEFAULT_QUALITY, Result,
    WebpifyError,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const KEY_MAX_WIDTH: &str = "max_width";
pub const KEY_MAX_HEIGHT: &str = "max_height";
pub const KEY_QUALITY: &str = "quality";
pub const KEY_DELETE_ORIGINALS: &str = "delete_originals";

pub const KNOWN_KEYS: [&str; 4] = [KEY_MAX_WIDTH, KEY_MAX_HEIGHT, KEY_QUALITY, KEY_DELETE_ORIGINALS];

#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Int(i64),
    Bool(bool),
    Text(String),
}

impl SettingValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Bool(b) => Some(i64::from(*b)),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Boolean-like coercion: numbers are true when non-zero.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Int(v) => Some(*v != 0),
            Self::Bool(b) => Some(*b),
            Self::Text(s) => match s.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Some(true),
                "0" | "false" | "no" | "off" | "" => Some(false),
                _ => None,
            },
        }
    }

    fn from_toml(value: &toml::Value) -> Option<Self> {
        match value {
            toml::Value::Integer(v) => Some(Self::Int(*v)),
            toml::Value::Boolean(b) => Some(Self::Bool(*b)),
            toml::Value::String(s) => Some(Self::Text(s.clone())),
            toml::Value::Float(f) => Some(Self::Int(*f as i64)),
            _ => None,
        }
    }

    fn to_toml(&self) -> toml::Value {
        match self {
            Self::Int(v) => toml::Value::Integer(*v),
            Self::Bool(b) => toml::Value::Boolean(*b),
            Self::Text(s) => toml::Value::String(s.clone()),
        }
    }
}

/// Read-only key/value source of plugin settings.
pub trait ConfigProvider {
    fn get(&self, key: &str) -> Option<SettingValue>;

    fn get_int(&self, key: &str, default: i64) -> i64 {
        self.get(key).and_then(|v| v.as_int()).unwrap_or(default)
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(|v| v.as_bool()).unwrap_or(default)
    }
}

/// Effective, sanitized settings for one upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub max_width: u32,
    pub max_height: u32,
    pub quality: u8,
    pub delete_originals: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
            quality: DEFAULT_QUALITY,
            delete_originals: DEFAULT_DELETE_ORIGINALS,
        }
    }
}

impl Settings {
    pub fn from_provider(config: &dyn ConfigProvider) -> Self {
        Self {
            max_width: sanitize_dimension(config.get_int(KEY_MAX_WIDTH, DEFAULT_MAX_WIDTH.into())),
            max_height: sanitize_dimension(config.get_int(KEY_MAX_HEIGHT, DEFAULT_MAX_HEIGHT.into())),
            quality: sanitize_quality(config.get_int(KEY_QUALITY, DEFAULT_QUALITY.into())),
            delete_originals: config.get_bool(KEY_DELETE_ORIGINALS, DEFAULT_DELETE_ORIGINALS),
        }
    }
}

pub fn sanitize_quality(input: i64) -> u8 {
    input.clamp(0, 100) as u8
}

/// Absolute value, saturating at `u32::MAX`.
pub fn sanitize_dimension(input: i64) -> u32 {
    u32::try_from(input.unsigned_abs()).unwrap_or(u32::MAX)
}

/// Normalizes an administrator-supplied value for `key`.
pub fn sanitize_value(key: &str, value: &SettingValue) -> Result<SettingValue> {
    let invalid = || WebpifyError::InvalidParameter(format!("Invalid value for {}: {:?}", key, value));

    match key {
        KEY_MAX_WIDTH | KEY_MAX_HEIGHT => {
            let v = value.as_int().ok_or_else(invalid)?;
            Ok(SettingValue::Int(sanitize_dimension(v).into()))
        }
        KEY_QUALITY => {
            let v = value.as_int().ok_or_else(invalid)?;
            Ok(SettingValue::Int(sanitize_quality(v).into()))
        }
        KEY_DELETE_ORIGINALS => {
            let v = value.as_bool().ok_or_else(invalid)?;
            Ok(SettingValue::Bool(v))
        }
        other => Err(WebpifyError::Config(format!("Unknown setting: {}", other))),
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryConfig {
    values: HashMap<String, SettingValue>,
}

impl MemoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: SettingValue) -> Self {
        self.values.insert(key.to_string(), value);
        self
    }

    pub fn insert(&mut self, key: &str, value: SettingValue) {
        self.values.insert(key.to_string(), value);
    }
}

impl ConfigProvider for MemoryConfig {
    fn get(&self, key: &str) -> Option<SettingValue> {
        self.values.get(key).cloned()
    }
}

/// Settings persisted in a TOML file. A missing file yields defaults.
#[derive(Debug, Clone)]
pub struct TomlConfig {
    path: PathBuf,
    table: toml::Table,
}

impl TomlConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let table = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            content
                .parse::<toml::Table>()
                .map_err(|e| WebpifyError::Config(format!("Failed to parse {}: {}", path.display(), e)))?
        } else {
            log::debug!("Settings file {} not found, using defaults", path.display());
            toml::Table::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            table,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sanitizes and stores `value`; call [`TomlConfig::save`] to persist.
    pub fn set(&mut self, key: &str, value: SettingValue) -> Result<SettingValue> {
        let sanitized = sanitize_value(key, &value)?;
        self.table.insert(key.to_string(), sanitized.to_toml());
        Ok(sanitized)
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(&self.table)
            .map_err(|e| WebpifyError::Config(format!("Failed to serialize settings: {}", e)))?;
        std::fs::write(&self.path, content)?;

        log::info!("Saved settings to {}", self.path.display());
        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn get(&self, key: &str) -> Option<SettingValue> {
        self.table.get(key).and_then(SettingValue::from_toml)
    }
}
