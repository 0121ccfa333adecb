//! Glassheart configuration
//!
//! Effect options can be overridden per element; cache limits are set once per
//! application context. Both can be loaded from a `glassheart.toml` file:
//!
//! ```toml
//! [effect]
//! depth = 8.0
//! strength = 100.0
//! chromatic_aberration = 0.0
//! blur = 2.0
//!
//! [cache]
//! capacity = 100
//! max_age_ms = 300000
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Default distortion depth in pixels
pub const DEFAULT_DEPTH: f32 = 8.0;

/// Default displacement scale
pub const DEFAULT_STRENGTH: f32 = 100.0;

/// Chromatic aberration is off unless requested
pub const DEFAULT_CHROMATIC_ABERRATION: f32 = 0.0;

/// Default backdrop blur in pixels
pub const DEFAULT_BLUR: f32 = 2.0;

/// Default number of cached filters
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Default cache entry lifetime (5 minutes)
pub const DEFAULT_CACHE_MAX_AGE_MS: u64 = 5 * 60 * 1000;

// =============================================================================
// Effect options
// =============================================================================

/// Per-element liquid glass options
///
/// Every field is optional in configuration files and falls back to its default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlassOptions {
    /// Distortion depth at rest, amplified while pressed
    pub depth: f32,
    /// Displacement scale of the red/green channels
    pub strength: f32,
    /// Extra per-channel scale offset, 0 disables the effect
    #[serde(alias = "chromaticAberration")]
    pub chromatic_aberration: f32,
    /// Backdrop blur; half of it is applied before displacement
    pub blur: f32,
}

impl Default for GlassOptions {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            strength: DEFAULT_STRENGTH,
            chromatic_aberration: DEFAULT_CHROMATIC_ABERRATION,
            blur: DEFAULT_BLUR,
        }
    }
}

impl GlassOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(mut self, depth: f32) -> Self {
        self.depth = depth;
        self
    }

    pub fn strength(mut self, strength: f32) -> Self {
        self.strength = strength;
        self
    }

    pub fn chromatic_aberration(mut self, aberration: f32) -> Self {
        self.chromatic_aberration = aberration;
        self
    }

    pub fn blur(mut self, blur: f32) -> Self {
        self.blur = blur;
        self
    }

    /// Replace non-finite values with defaults and negative values with zero
    pub fn sanitized(&self) -> Self {
        Self {
            depth: sanitize(self.depth, DEFAULT_DEPTH),
            strength: sanitize(self.strength, DEFAULT_STRENGTH),
            chromatic_aberration: sanitize(
                self.chromatic_aberration,
                DEFAULT_CHROMATIC_ABERRATION,
            ),
            blur: sanitize(self.blur, DEFAULT_BLUR),
        }
    }
}

fn sanitize(value: f32, default: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        default
    }
}

// =============================================================================
// Cache limits
// =============================================================================

/// Limits of the shared filter cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached filters
    pub capacity: usize,
    /// Entries older than this are dropped, in milliseconds
    pub max_age_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
            max_age_ms: DEFAULT_CACHE_MAX_AGE_MS,
        }
    }
}

impl CacheConfig {
    pub fn new(capacity: usize, max_age: Duration) -> Self {
        Self {
            capacity,
            max_age_ms: max_age.as_millis().min(u64::MAX as u128) as u64,
        }
    }

    pub fn max_age(&self) -> Duration {
        Duration::from_millis(self.max_age_ms)
    }
}

// =============================================================================
// glassheart.toml
// =============================================================================

/// Application-wide configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlassConfig {
    /// Default effect options for elements bound without overrides
    pub effect: GlassOptions,
    /// Shared cache limits
    pub cache: CacheConfig,
}

impl GlassConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!("loaded glassheart config from {}", path.display());
        Ok(config)
    }
}
