//! TOML-based configuration for the language services.
//!
//! Supports a config file (ppl-services.toml) with environment variable
//! expansion.
//!
//! Example configuration:
//! ```toml
//! [worker]
//! build_version = "${BUILD_HASH}"
//! path = "./target/release/ppl-services"
//! timeout_ms = 5000
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Worker configuration.
    #[serde(default)]
    pub worker: WorkerSettings,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from an optional path, falling back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, SettingsError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}

/// Worker configuration, injected into the worker handle factory.
///
/// The build version has no default on purpose: spawning a worker without
/// one is a configuration error, never a silent fallback.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkerSettings {
    /// Build version used to derive cache-busted worker addresses.
    pub build_version: Option<String>,

    /// Path to the worker host binary (defaults to the current executable).
    pub path: Option<String>,

    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl WorkerSettings {
    /// Default per-request timeout (5 seconds).
    pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

    /// Create settings with a build version and defaults for the rest.
    pub fn with_build_version(build_version: impl Into<String>) -> Self {
        Self {
            build_version: Some(build_version.into()),
            ..Self::default()
        }
    }

    /// The build version with environment variables expanded.
    pub fn resolved_build_version(&self) -> Result<Option<String>, SettingsError> {
        self.build_version
            .as_deref()
            .map(expand_env_vars)
            .transpose()
    }

    /// The worker binary path with environment variables expanded.
    pub fn resolved_path(&self) -> Result<Option<PathBuf>, SettingsError> {
        Ok(self
            .path
            .as_deref()
            .map(expand_env_vars)
            .transpose()?
            .map(PathBuf::from))
    }

    /// The per-request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        let ms = if self.timeout_ms == 0 {
            Self::DEFAULT_TIMEOUT_MS
        } else {
            self.timeout_ms
        };
        Duration::from_millis(ms)
    }
}

/// Expand `${ENV_VAR}` references in a string.
fn expand_env_vars(input: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find('}')
            .ok_or_else(|| SettingsError::MissingEnvVar(after.to_string()))?;
        let name = &after[..end];
        let value =
            env::var(name).map_err(|_| SettingsError::MissingEnvVar(name.to_string()))?;
        result.push_str(&value);
        rest = &after[end + 1..];
    }
    result.push_str(rest);
    Ok(result)
}
