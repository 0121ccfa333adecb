//! Error types for glassheart_core
//!
//! The filter pipeline itself never fails; errors only come from loading
//! configuration.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading Glassheart configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration is not valid TOML or has the wrong shape
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type for glassheart_core operations
pub type Result<T> = std::result::Result<T, ConfigError>;
