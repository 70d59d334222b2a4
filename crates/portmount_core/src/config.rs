//! Configuration surfaces: mount options and logging setup.
//!
//! # Responsibility
//! - Deserialize mount options and logging settings from host configuration.
//! - Reject unknown or malformed option fields before any mount happens.
//!
//! # Invariants
//! - `MountOptions::path`, when present, is non-empty and has no blank names.

use crate::error::{PortError, PortResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// Options recognised when embedding a module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MountOptions {
    /// Module path inside the namespace, e.g. `["Elements", "Button"]`.
    /// Only optional when the namespace holds a single module.
    #[serde(default)]
    pub path: Option<Vec<String>>,
}

impl MountOptions {
    pub fn with_path<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: Some(path.into_iter().map(Into::into).collect()),
        }
    }

    /// Parses and validates options from an untyped JSON value.
    ///
    /// `null` is treated as absent options.
    ///
    /// # Errors
    /// - `InvalidOpts` for non-object values, unknown fields, or a `path`
    ///   that is not a non-empty list of non-empty strings.
    pub fn from_json(value: &Value) -> PortResult<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        if !value.is_object() {
            return Err(PortError::InvalidOpts(format!(
                "options must be an object, got {}",
                json_type_name(value)
            )));
        }
        let options = Self::deserialize(value)
            .map_err(|err| PortError::InvalidOpts(err.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Validates shape invariants that serde cannot express.
    pub fn validate(&self) -> PortResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if path.is_empty() {
            return Err(PortError::InvalidOpts(
                "path must contain at least one name".to_string(),
            ));
        }
        if let Some(index) = path.iter().position(|name| name.trim().is_empty()) {
            return Err(PortError::InvalidOpts(format!(
                "path segment {index} must not be empty"
            )));
        }
        Ok(())
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

const DEFAULT_MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const DEFAULT_MAX_LOG_FILES: usize = 5;

/// File logging settings consumed by [`crate::logging::init_logging`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// One of `trace|debug|info|warn|error`.
    #[serde(default = "default_level_string")]
    pub level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: PathBuf,
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

impl LoggingConfig {
    pub fn new(level: impl Into<String>, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            level: level.into(),
            log_dir: log_dir.into(),
            max_file_size_bytes: DEFAULT_MAX_LOG_FILE_SIZE_BYTES,
            max_files: DEFAULT_MAX_LOG_FILES,
        }
    }
}

fn default_level_string() -> String {
    crate::logging::default_log_level().to_string()
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_LOG_FILE_SIZE_BYTES
}

fn default_max_files() -> usize {
    DEFAULT_MAX_LOG_FILES
}
