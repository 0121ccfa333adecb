//! Error types for glassheart_app

use glassheart_core::ConfigError;
use thiserror::Error;

/// Errors that can occur in a Glassheart application
#[derive(Error, Debug)]
pub enum GlassError {
    /// Failed to load `glassheart.toml`
    #[error("configuration failed: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for glassheart_app operations
pub type Result<T> = std::result::Result<T, GlassError>;
