//! SVG synthesis for Glassheart liquid glass effects
//!
//! This crate turns element geometry into the two SVG documents the effect
//! needs, both delivered as `data:` URIs:
//!
//! - **Displacement map**: an image whose red/green channels encode the X/Y
//!   offset of every pixel, neutral in the interior and graded near the edges
//! - **Filter chain**: an SVG `<filter>` that loads the map and applies one or
//!   three `feDisplacementMap` passes (the latter for chromatic aberration)
//!
//! Both steps are pure functions of their inputs.
//!
//! # Example
//!
//! ```rust
//! use glassheart_svg::{assemble, generate};
//!
//! let map = generate(200, 50, 25.0, 8.0);
//! let filter = assemble(&map, 200, 50, 100.0, 0.0);
//!
//! assert!(filter.starts_with("data:image/svg+xml;utf8,"));
//! assert!(filter.ends_with("#displace"));
//! ```

mod displacement;
mod encode;
mod filter;
mod units;

pub use displacement::{
    generate, DisplacementMap, GradientBand, MAX_STOP_PERCENT, MIN_STOP_PERCENT,
};
pub use encode::{encode_uri_component, svg_data_uri, SVG_DATA_URI_PREFIX};
pub use filter::{assemble, Channel, DisplacementPass, FilterChain, FILTER_ID};
pub use units::sanitize_length;
