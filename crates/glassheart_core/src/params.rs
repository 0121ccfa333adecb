//! Filter parameters
//!
//! `FilterParameters` is the full input of the filter pipeline. Two equal
//! parameter sets always produce byte-identical filters, which is what makes
//! them usable as a cache key.

use std::fmt;

use glassheart_svg::{assemble, generate, sanitize_length};

/// Everything that determines a generated displacement filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParameters {
    /// Rendered width in whole pixels, at least 1
    pub width: u32,
    /// Rendered height in whole pixels, at least 1
    pub height: u32,
    /// Resolved corner radius in pixels
    pub radius: f32,
    /// Distortion depth, already adjusted for interaction state
    pub depth: f32,
    /// Displacement scale
    pub strength: f32,
    /// Extra per-channel scale offset
    pub chromatic_aberration: f32,
}

impl FilterParameters {
    /// Create a parameter set, clamping sizes to one pixel and replacing
    /// non-finite or negative lengths with zero
    pub fn new(
        width: u32,
        height: u32,
        radius: f32,
        depth: f32,
        strength: f32,
        chromatic_aberration: f32,
    ) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            radius: sanitize_length(radius),
            depth: sanitize_length(depth),
            strength: sanitize_length(strength),
            chromatic_aberration: sanitize_length(chromatic_aberration),
        }
    }

    /// Deterministic cache key covering every field
    pub fn cache_key(&self) -> FilterKey {
        FilterKey(format!(
            "{}x{}_r{}_d{}_s{}_c{}",
            self.width,
            self.height,
            self.radius,
            self.depth,
            self.strength,
            self.chromatic_aberration
        ))
    }

    /// Generate the displacement map and wrap it into a filter data URI
    pub fn build_filter(&self) -> String {
        let map = generate(self.width, self.height, self.radius, self.depth);
        assemble(
            &map,
            self.width,
            self.height,
            self.strength,
            self.chromatic_aberration,
        )
    }
}

/// Serialized form of `FilterParameters` used to index the filter cache
///
/// Float fields use their shortest round-trip representation, so two keys are
/// equal exactly when the parameter sets are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FilterKey(String);

impl FilterKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
