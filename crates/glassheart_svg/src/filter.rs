//! SVG filter chain assembly
//!
//! Wraps a displacement map into an SVG `<filter>` that can be referenced from
//! a CSS `backdrop-filter` via `url('…#displace')`.
//!
//! Without chromatic aberration the chain is a single `feDisplacementMap`.
//! With aberration, three displacement passes at decreasing scales each keep
//! one color channel, and the three results are screened back together so the
//! channels separate slightly at the distorted edges.

use std::fmt::{self, Write};

use smallvec::SmallVec;

use crate::encode::svg_data_uri;
use crate::units::sanitize_length;

/// Id of the generated `<filter>` element
pub const FILTER_ID: &str = "displace";

/// Result name the displacement map image is bound to inside the filter
const MAP_RESULT: &str = "displacementMap";

/// Color channel isolated by a displacement pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    /// `feColorMatrix` values keeping only this channel (and alpha)
    fn color_matrix(self) -> &'static str {
        match self {
            Channel::Red => "1 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 1 0",
            Channel::Green => "0 0 0 0 0 0 1 0 0 0 0 0 0 0 0 0 0 0 1 0",
            Channel::Blue => "0 0 0 0 0 0 0 0 0 0 0 0 1 0 0 0 0 0 1 0",
        }
    }

    fn result_name(self) -> &'static str {
        match self {
            Channel::Red => "displacedR",
            Channel::Green => "displacedG",
            Channel::Blue => "displacedB",
        }
    }
}

/// One `feDisplacementMap` step of the chain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplacementPass {
    /// Displacement scale handed to `feDisplacementMap`
    pub scale: f32,
    /// Channel kept after this pass, `None` for the single-pass chain
    pub channel: Option<Channel>,
}

/// A displacement filter ready to be serialized
#[derive(Debug, Clone, PartialEq)]
pub struct FilterChain {
    map_uri: String,
    width: u32,
    height: u32,
    strength: f32,
    chromatic_aberration: f32,
}

impl FilterChain {
    pub fn new(
        map_uri: impl Into<String>,
        width: u32,
        height: u32,
        strength: f32,
        chromatic_aberration: f32,
    ) -> Self {
        Self {
            map_uri: map_uri.into(),
            width: width.max(1),
            height: height.max(1),
            strength: sanitize_length(strength),
            chromatic_aberration: sanitize_length(chromatic_aberration),
        }
    }

    /// Whether the chain splits channels for chromatic aberration
    pub fn has_aberration(&self) -> bool {
        self.chromatic_aberration > 0.0
    }

    /// Displacement passes in document order
    pub fn passes(&self) -> SmallVec<[DisplacementPass; 3]> {
        let mut passes = SmallVec::new();

        if !self.has_aberration() {
            passes.push(DisplacementPass {
                scale: self.strength,
                channel: None,
            });
            return passes;
        }

        let aberration = self.chromatic_aberration;
        passes.push(DisplacementPass {
            scale: self.strength + aberration * 2.0,
            channel: Some(Channel::Red),
        });
        passes.push(DisplacementPass {
            scale: self.strength + aberration,
            channel: Some(Channel::Green),
        });
        passes.push(DisplacementPass {
            scale: self.strength,
            channel: Some(Channel::Blue),
        });
        passes
    }

    /// Render the filter as a standalone SVG document
    pub fn to_svg(&self) -> String {
        let mut svg = String::with_capacity(self.map_uri.len() + 1536);
        // Writing into a String cannot fail
        let _ = self.write_svg(&mut svg);
        svg
    }

    /// Render the filter as a `data:` URI pointing at the filter element
    pub fn to_data_uri(&self) -> String {
        let mut uri = svg_data_uri(&self.to_svg());
        uri.push('#');
        uri.push_str(FILTER_ID);
        uri
    }

    fn write_svg(&self, out: &mut String) -> fmt::Result {
        let (w, h) = (self.width, self.height);

        write!(
            out,
            r#"<svg height="{h}" width="{w}" viewBox="0 0 {w} {h}" xmlns="http://www.w3.org/2000/svg">"#
        )?;
        out.push_str("<defs>");
        write!(
            out,
            r#"<filter id="{FILTER_ID}" color-interpolation-filters="sRGB" x="0%" y="0%" width="100%" height="100%">"#
        )?;
        write!(
            out,
            r#"<feImage x="0" y="0" height="{h}" width="{w}" href="{}" result="{MAP_RESULT}"/>"#,
            self.map_uri
        )?;

        for pass in self.passes() {
            write!(
                out,
                r#"<feDisplacementMap in="SourceGraphic" in2="{MAP_RESULT}" scale="{}" xChannelSelector="R" yChannelSelector="G"/>"#,
                pass.scale
            )?;
            if let Some(channel) = pass.channel {
                write!(
                    out,
                    r#"<feColorMatrix type="matrix" values="{}" result="{}"/>"#,
                    channel.color_matrix(),
                    channel.result_name()
                )?;
            }
        }

        if self.has_aberration() {
            write!(
                out,
                r#"<feBlend in="{}" in2="{}" mode="screen"/>"#,
                Channel::Red.result_name(),
                Channel::Green.result_name()
            )?;
            write!(
                out,
                r#"<feBlend in2="{}" mode="screen"/>"#,
                Channel::Blue.result_name()
            )?;
        }

        out.push_str("</filter></defs></svg>");
        Ok(())
    }
}

/// Build a displacement filter data URI around a displacement map URI
pub fn assemble(
    map_uri: &str,
    width: u32,
    height: u32,
    strength: f32,
    chromatic_aberration: f32,
) -> String {
    FilterChain::new(map_uri, width, height, strength, chromatic_aberration).to_data_uri()
}
