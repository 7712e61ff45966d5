//! Configuration module: loading stack records and syntax validation.

pub mod validation;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::StackConfig;

/// Errors raised while reading a stack configuration file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),
}

/// Serialization format of a stack configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("json") => Ok(ConfigFormat::Json),
            _ => Err(LoadError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Parse a stack record from a string.
pub fn parse(source: &str, format: ConfigFormat) -> Result<StackConfig, LoadError> {
    let config = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(source)?,
        ConfigFormat::Json => serde_json::from_str(source)?,
    };
    Ok(config)
}

/// Read and parse a stack record, choosing the format by extension.
pub fn load(path: &Path) -> Result<StackConfig, LoadError> {
    let format = ConfigFormat::from_path(path)?;
    let source = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("Loaded stack configuration from {}", path.display());
    parse(&source, format)
}
