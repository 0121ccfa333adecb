//! Displacement map generation
//!
//! A displacement map is an SVG image read by `feDisplacementMap`: the red
//! channel carries the X offset and the green channel the Y offset of each
//! pixel, with 50% gray meaning "no displacement". The map built here keeps the
//! interior of the element neutral and concentrates the gradients in a band
//! whose width follows the corner radius, so the refraction hugs the rounded
//! edges of the element.

use std::fmt::{self, Write};

use crate::encode::svg_data_uri;
use crate::units::sanitize_length;

/// Lowest percentage a gradient stop may sit at
pub const MIN_STOP_PERCENT: f32 = 2.0;

/// Highest percentage a gradient stop may sit at
pub const MAX_STOP_PERCENT: f32 = 98.0;

/// Neutral gray, the "no displacement" value for both channels
const NEUTRAL_FILL: &str = "#808080";

/// Dark blue base the channel gradients are screened onto
const BASE_FILL: &str = "#000080";

/// Blur applied to the whole gradient group to soften banding
const GROUP_BLUR_PX: f32 = 0.5;

/// Interior blur radius as a fraction of depth
const INTERIOR_BLUR_FACTOR: f32 = 0.3;

/// Interior blur never goes below this many pixels
const MIN_INTERIOR_BLUR_PX: f32 = 0.5;

/// Largest inset a stop may take; both stops meet at the axis midpoint
const MAX_INSET_PERCENT: f32 = 50.0;

/// Where a channel gradient starts and ends along its axis, in percent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientBand {
    pub start: f32,
    pub end: f32,
}

impl GradientBand {
    /// Band for an axis of `extent` pixels on an element with `radius` corners
    ///
    /// Each stop is inset by half the radius (as a percentage of the extent)
    /// and clamped into `[MIN_STOP_PERCENT, MAX_STOP_PERCENT]`. The inset stops
    /// growing at the midpoint, so `start <= end` for every radius.
    pub fn for_axis(radius: f32, extent: u32) -> Self {
        let extent = extent.max(1) as f32;
        let inset = (sanitize_length(radius) / extent * 100.0 * 0.5).min(MAX_INSET_PERCENT);

        Self {
            start: inset.clamp(MIN_STOP_PERCENT, MAX_STOP_PERCENT),
            end: (100.0 - inset).clamp(MIN_STOP_PERCENT, MAX_STOP_PERCENT),
        }
    }
}

/// Geometry of a displacement map
///
/// Construction never fails: zero sizes are raised to one pixel and
/// non-finite or negative lengths are treated as zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplacementMap {
    width: u32,
    height: u32,
    radius: f32,
    depth: f32,
}

impl DisplacementMap {
    pub fn new(width: u32, height: u32, radius: f32, depth: f32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            radius: sanitize_length(radius),
            depth: sanitize_length(depth),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    /// Distance of the flat interior from each edge, at least one pixel
    pub fn inset(&self) -> f32 {
        self.depth.max(1.0)
    }

    /// Blur radius of the flat interior
    pub fn interior_blur(&self) -> f32 {
        (self.depth * INTERIOR_BLUR_FACTOR).max(MIN_INTERIOR_BLUR_PX)
    }

    /// Red channel gradient band (X displacement)
    pub fn horizontal_band(&self) -> GradientBand {
        GradientBand::for_axis(self.radius, self.width)
    }

    /// Green channel gradient band (Y displacement)
    pub fn vertical_band(&self) -> GradientBand {
        GradientBand::for_axis(self.radius, self.height)
    }

    /// Render the map as a standalone SVG document
    pub fn to_svg(&self) -> String {
        let mut svg = String::with_capacity(1536);
        // Writing into a String cannot fail
        let _ = self.write_svg(&mut svg);
        svg
    }

    fn write_svg(&self, out: &mut String) -> fmt::Result {
        let (w, h) = (self.width, self.height);
        let x_band = self.horizontal_band();
        let y_band = self.vertical_band();
        let inset = self.inset();
        let inner_w = (w as f32 - 2.0 * inset).max(0.0);
        let inner_h = (h as f32 - 2.0 * inset).max(0.0);

        write!(
            out,
            r#"<svg height="{h}" width="{w}" viewBox="0 0 {w} {h}" xmlns="http://www.w3.org/2000/svg">"#
        )?;
        out.push_str("<style>.mix { mix-blend-mode: screen; }</style>");
        out.push_str("<defs>");
        write!(
            out,
            r##"<linearGradient id="Y" x1="0" x2="0" y1="{}%" y2="{}%"><stop offset="0%" stop-color="#0F0"/><stop offset="100%" stop-color="#000"/></linearGradient>"##,
            y_band.start, y_band.end
        )?;
        write!(
            out,
            r##"<linearGradient id="X" x1="{}%" x2="{}%" y1="0" y2="0"><stop offset="0%" stop-color="#F00"/><stop offset="100%" stop-color="#000"/></linearGradient>"##,
            x_band.start, x_band.end
        )?;
        out.push_str("</defs>");

        write!(
            out,
            r#"<rect x="0" y="0" height="{h}" width="{w}" fill="{NEUTRAL_FILL}"/>"#
        )?;
        write!(out, r#"<g filter="blur({GROUP_BLUR_PX}px)">"#)?;
        write!(
            out,
            r#"<rect x="0" y="0" height="{h}" width="{w}" fill="{BASE_FILL}"/>"#
        )?;
        write!(
            out,
            r##"<rect x="0" y="0" height="{h}" width="{w}" fill="url(#Y)" class="mix"/>"##
        )?;
        write!(
            out,
            r##"<rect x="0" y="0" height="{h}" width="{w}" fill="url(#X)" class="mix"/>"##
        )?;
        write!(
            out,
            r#"<rect x="{inset}" y="{inset}" height="{inner_h}" width="{inner_w}" fill="{NEUTRAL_FILL}" rx="{r}" ry="{r}" filter="blur({blur}px)"/>"#,
            r = self.radius,
            blur = self.interior_blur(),
        )?;
        out.push_str("</g></svg>");
        Ok(())
    }

    /// Render the map as a `data:image/svg+xml` URI
    pub fn to_data_uri(&self) -> String {
        svg_data_uri(&self.to_svg())
    }
}

/// Build a displacement map data URI for an element's geometry
pub fn generate(width: u32, height: u32, radius: f32, depth: f32) -> String {
    DisplacementMap::new(width, height, radius, depth).to_data_uri()
}
