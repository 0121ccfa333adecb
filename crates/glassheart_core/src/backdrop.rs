//! CSS `backdrop-filter` composition
//!
//! The generated filter is sandwiched between two blurs: half the blur softens
//! the backdrop before displacement, the full blur plus a brightness/saturation
//! boost afterwards compensates for the darkening the displacement causes.

use std::time::Instant;

use glassheart_svg::sanitize_length;

use crate::cache::FilterCache;
use crate::config::{GlassOptions, DEFAULT_BLUR};
use crate::dimensions::Dimensions;
use crate::params::FilterParameters;

const TONE: &str = "brightness(1.1) saturate(1.5)";

/// Wrap a filter URI into a `backdrop-filter` value
pub fn compose_backdrop_filter(filter_uri: &str, blur: f32) -> String {
    let blur = sanitize_length(blur);
    format!(
        "blur({}px) url('{}') blur({}px) {}",
        blur / 2.0,
        filter_uri,
        blur,
        TONE
    )
}

/// `backdrop-filter` value used while the element has no size
///
/// A zero or invalid blur falls back to [`DEFAULT_BLUR`] before halving.
pub fn fallback_backdrop_filter(blur: f32) -> String {
    let blur = if blur.is_finite() && blur > 0.0 {
        blur
    } else {
        DEFAULT_BLUR
    };
    format!("blur({}px) {}", blur / 2.0, TONE)
}

/// Resolve the `backdrop-filter` for an element
///
/// Zero-sized elements get the blur-only fallback. Otherwise the filter for
/// `(dimensions, depth, options)` is served from `cache`, generated on a miss.
pub fn resolve_backdrop_filter(
    cache: &mut FilterCache,
    dimensions: Dimensions,
    depth: f32,
    options: &GlassOptions,
    now: Instant,
) -> String {
    if dimensions.is_empty() {
        return fallback_backdrop_filter(options.blur);
    }

    let params = FilterParameters::new(
        dimensions.width,
        dimensions.height,
        dimensions.radius,
        depth,
        options.strength,
        options.chromatic_aberration,
    );
    let filter = cache.get_or_insert_with(&params, now, || params.build_filter());
    compose_backdrop_filter(&filter, options.blur)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose() {
        assert_eq!(
            compose_backdrop_filter("data:x#displace", 2.0),
            "blur(1px) url('data:x#displace') blur(2px) brightness(1.1) saturate(1.5)"
        );
        assert_eq!(
            compose_backdrop_filter("u", 5.0),
            "blur(2.5px) url('u') blur(5px) brightness(1.1) saturate(1.5)"
        );
    }

    #[test]
    fn test_fallback_uses_half_blur() {
        assert_eq!(
            fallback_backdrop_filter(2.0),
            "blur(1px) brightness(1.1) saturate(1.5)"
        );
        assert_eq!(
            fallback_backdrop_filter(5.0),
            "blur(2.5px) brightness(1.1) saturate(1.5)"
        );
        // Zero blur falls back to the default
        assert_eq!(
            fallback_backdrop_filter(0.0),
            "blur(1px) brightness(1.1) saturate(1.5)"
        );
        assert_eq!(fallback_backdrop_filter(f32::NAN), fallback_backdrop_filter(2.0));
    }

    #[test]
    fn test_empty_dimensions_skip_the_cache() {
        let mut cache = FilterCache::new();
        let value = resolve_backdrop_filter(
            &mut cache,
            Dimensions::default(),
            8.0,
            &GlassOptions::default(),
            Instant::now(),
        );

        assert_eq!(value, fallback_backdrop_filter(2.0));
        assert!(cache.is_empty());
        assert_eq!(cache.stats().misses, 0);
    }

    #[test]
    fn test_resolve_caches_the_filter() {
        let mut cache = FilterCache::new();
        let options = GlassOptions::default();
        let dims = Dimensions::new(200, 50, 25.0);
        let now = Instant::now();

        let first = resolve_backdrop_filter(&mut cache, dims, 8.0, &options, now);
        let second = resolve_backdrop_filter(&mut cache, dims, 8.0, &options, now);

        assert_eq!(first, second);
        assert!(first.starts_with("blur(1px) url('data:image/svg+xml;utf8,"));
        assert!(first.ends_with("#displace') blur(2px) brightness(1.1) saturate(1.5)"));

        let stats = cache.stats();
        assert_eq!(stats.len, 1);
        assert_eq!(stats.hits, 1);
    }

    #[test]
    fn test_depth_changes_the_filter() {
        let mut cache = FilterCache::new();
        let options = GlassOptions::default();
        let dims = Dimensions::new(200, 50, 25.0);
        let now = Instant::now();

        let rest = resolve_backdrop_filter(&mut cache, dims, 8.0, &options, now);
        let pressed = resolve_backdrop_filter(&mut cache, dims, 8.0 / 0.7, &options, now);

        assert_ne!(rest, pressed);
        assert_eq!(cache.len(), 2);
    }
}
