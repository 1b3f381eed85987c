use std::io::Write as _;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::ConfigError;
use crate::keys::{ConfigKey, ValueKind};
use crate::paths;

/// A loaded configuration file plus the path it was loaded from.
///
/// Every accessor resolves precedence **env var > config file > default**;
/// consumers never see the raw [`serde_json::Value`].
#[derive(Debug, Clone)]
pub struct Config {
    path: PathBuf,
    values: Value,
}

impl Config {
    /// Load from the default XDG location. A missing file is not an error —
    /// it is treated as an empty document, matching the skip registry's
    /// "absent file means empty map" rule.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(paths::config_file()?)
    }

    pub fn load_from(path: PathBuf) -> Result<Self, ConfigError> {
        let values = match std::fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => Value::Object(Default::default()),
            Ok(raw) => serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Value::Object(Default::default())
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.clone(),
                    source,
                });
            }
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file_value(&self, key: ConfigKey) -> Option<&Value> {
        let mut cursor = &self.values;
        for segment in key.dotted().split('.') {
            cursor = cursor.as_object()?.get(segment)?;
        }
        Some(cursor)
    }

    fn env_value(key: ConfigKey) -> Option<String> {
        std::env::var(key.env_var()).ok().filter(|v| !v.is_empty())
    }

    pub fn get_int(&self, key: ConfigKey, default: i64) -> Result<i64, ConfigError> {
        debug_assert_eq!(key.kind(), ValueKind::Int);
        if let Some(raw) = Self::env_value(key) {
            return raw.trim().parse::<i64>().map_err(|_| ConfigError::TypeMismatch {
                key: key.dotted().to_string(),
                expected: ValueKind::Int.name(),
                found: raw,
            });
        }
        match self.file_value(key) {
            Some(Value::Number(n)) => n.as_i64().ok_or_else(|| ConfigError::TypeMismatch {
                key: key.dotted().to_string(),
                expected: ValueKind::Int.name(),
                found: n.to_string(),
            }),
            Some(other) => Err(ConfigError::TypeMismatch {
                key: key.dotted().to_string(),
                expected: ValueKind::Int.name(),
                found: kind_of(other),
            }),
            None => Ok(default),
        }
    }

    pub fn get_bool(&self, key: ConfigKey, default: bool) -> Result<bool, ConfigError> {
        debug_assert_eq!(key.kind(), ValueKind::Bool);
        if let Some(raw) = Self::env_value(key) {
            return Ok(is_truthy(&raw));
        }
        match self.file_value(key) {
            Some(Value::Bool(b)) => Ok(*b),
            Some(other) => Err(ConfigError::TypeMismatch {
                key: key.dotted().to_string(),
                expected: ValueKind::Bool.name(),
                found: kind_of(other),
            }),
            None => Ok(default),
        }
    }

    pub fn get_string(&self, key: ConfigKey, default: &str) -> Result<String, ConfigError> {
        debug_assert_eq!(key.kind(), ValueKind::String);
        if let Some(raw) = Self::env_value(key) {
            return Ok(raw);
        }
        match self.file_value(key) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Err(ConfigError::TypeMismatch {
                key: key.dotted().to_string(),
                expected: ValueKind::String.name(),
                found: kind_of(other),
            }),
            None => Ok(default.to_string()),
        }
    }

    /// The effective timeout in seconds, clamped to a minimum of one.
    pub fn validate_timeout_secs(&self) -> Result<u64, ConfigError> {
        Ok(self.get_int(ConfigKey::ValidateTimeout, 60)?.max(1) as u64)
    }

    pub fn validate_cooldown_secs(&self) -> Result<u64, ConfigError> {
        Ok(self.get_int(ConfigKey::ValidateCooldown, 5)?.max(0) as u64)
    }

    pub fn debug_enabled(&self) -> bool {
        self.get_bool(ConfigKey::DebugEnabled, false).unwrap_or(false)
    }

    /// Set a key's value in the in-memory document (caller calls [`Config::save`]
    /// to flush). Performs the same type check a reader would.
    pub fn set(&mut self, key: ConfigKey, raw: &str) -> Result<(), ConfigError> {
        let value = match key.kind() {
            ValueKind::Int => raw
                .parse::<i64>()
                .map(|n| Value::Number(n.into()))
                .map_err(|_| ConfigError::TypeMismatch {
                    key: key.dotted().to_string(),
                    expected: ValueKind::Int.name(),
                    found: raw.to_string(),
                })?,
            ValueKind::Bool => Value::Bool(is_truthy(raw)),
            ValueKind::String => Value::String(raw.to_string()),
        };
        let mut cursor = &mut self.values;
        let segments: Vec<&str> = key.dotted().split('.').collect();
        for segment in &segments[..segments.len() - 1] {
            if !cursor.is_object() {
                *cursor = Value::Object(Default::default());
            }
            cursor = cursor
                .as_object_mut()
                .expect("just ensured object")
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Default::default()));
        }
        if !cursor.is_object() {
            *cursor = Value::Object(Default::default());
        }
        cursor
            .as_object_mut()
            .expect("just ensured object")
            .insert(segments[segments.len() - 1].to_string(), value);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.values = Value::Object(Default::default());
    }

    pub fn list(&self) -> Vec<(String, Value)> {
        ConfigKey::ALL
            .iter()
            .filter_map(|key| self.file_value(*key).map(|v| (key.dotted().to_string(), v.clone())))
            .collect()
    }

    /// Atomically persist the in-memory document: write to a temp file in the
    /// same directory, then rename over the target. Readers never observe a
    /// partially-written file.
    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::SaveFailed {
                path: self.path.clone(),
                source,
            })?;
        }
        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut temp = tempfile::NamedTempFile::new_in(parent).map_err(|source| ConfigError::SaveFailed {
            path: self.path.clone(),
            source,
        })?;
        let mut rendered =
            serde_json::to_vec_pretty(&self.values).expect("config document always serializes");
        rendered.push(b'\n');
        temp.write_all(&rendered).map_err(|source| ConfigError::SaveFailed {
            path: self.path.clone(),
            source,
        })?;
        temp.as_file().sync_all().map_err(|source| ConfigError::SaveFailed {
            path: self.path.clone(),
            source,
        })?;
        temp.persist(&self.path)
            .map_err(|err| ConfigError::SaveFailed {
                path: self.path.clone(),
                source: err.error,
            })?;
        Ok(())
    }
}

fn is_truthy(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

fn kind_of(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::String(_) => "string".to_string(),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}
