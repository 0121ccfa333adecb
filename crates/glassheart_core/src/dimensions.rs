//! Element dimension tracking
//!
//! The filter must match the element's rendered box exactly, so every layout
//! change (window resize, content-driven resize) triggers a new measurement.
//! Measurements are coalesced to one per animation frame: `notify` only asks
//! the caller for a frame when none is pending, and `commit` reports the new
//! dimensions only when they actually changed.
//!
//! Widths and heights are rounded to whole pixels so sub-pixel layout jitter
//! never produces a new cache key.

use nom::number::complete::float;

/// Rendered box of an element in CSS pixels, as reported by layout
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutBox {
    pub width: f32,
    pub height: f32,
}

impl LayoutBox {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Measured geometry of a bound element
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
    pub radius: f32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32, radius: f32) -> Self {
        Self {
            width,
            height,
            radius,
        }
    }

    /// Build dimensions from a layout box and a resolved `border-radius` value
    pub fn measure(layout: LayoutBox, border_radius: &str) -> Self {
        Self {
            width: round_px(layout.width),
            height: round_px(layout.height),
            radius: parse_border_radius(border_radius),
        }
    }

    /// Zero-sized, e.g. detached or not laid out yet
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Round a CSS pixel length to a whole pixel count
fn round_px(value: f32) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.round() as u32
    } else {
        0
    }
}

/// Read the leading number of a resolved `border-radius` value
///
/// `"25px"` and `"25px 10px"` both give `25.0`. Anything unparsable,
/// non-finite or negative gives `0.0`.
pub fn parse_border_radius(value: &str) -> f32 {
    match float::<_, nom::error::Error<&str>>(value.trim_start()) {
        Ok((_, radius)) if radius.is_finite() => radius.max(0.0),
        _ => 0.0,
    }
}

/// What caused a dimension check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeTrigger {
    /// The viewport was resized
    Window,
    /// The element itself was resized (resize observer)
    Element,
}

/// Which resize sources the host can observe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ObservationMode {
    #[default]
    ElementAndWindow,
    /// Host has no per-element resize observer
    WindowOnly,
}

impl ObservationMode {
    pub fn for_host(supports_resize_observer: bool) -> Self {
        if supports_resize_observer {
            ObservationMode::ElementAndWindow
        } else {
            ObservationMode::WindowOnly
        }
    }

    pub fn accepts(&self, trigger: ResizeTrigger) -> bool {
        match self {
            ObservationMode::ElementAndWindow => true,
            ObservationMode::WindowOnly => trigger == ResizeTrigger::Window,
        }
    }
}

/// Per-element dimension tracker with per-frame coalescing
#[derive(Debug, Clone, Default)]
pub struct DimensionObserver {
    mode: ObservationMode,
    current: Option<Dimensions>,
    frame_pending: bool,
}

impl DimensionObserver {
    pub fn new(mode: ObservationMode) -> Self {
        Self {
            mode,
            current: None,
            frame_pending: false,
        }
    }

    pub fn mode(&self) -> ObservationMode {
        self.mode
    }

    /// Last committed dimensions, zero before the first measurement
    pub fn current(&self) -> Dimensions {
        self.current.unwrap_or_default()
    }

    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    /// Record a resize; returns true when the caller must request a frame
    pub fn notify(&mut self, trigger: ResizeTrigger) -> bool {
        if !self.mode.accepts(trigger) {
            return false;
        }
        self.request_measure()
    }

    /// Ask for a measurement regardless of trigger
    pub fn request_measure(&mut self) -> bool {
        if self.frame_pending {
            return false;
        }
        self.frame_pending = true;
        true
    }

    /// Store a frame's measurement; returns it if it differs from the last one
    pub fn commit(&mut self, measured: Dimensions) -> Option<Dimensions> {
        self.frame_pending = false;
        if self.current == Some(measured) {
            return None;
        }
        self.current = Some(measured);
        Some(measured)
    }

    /// Forget a pending frame (its callback was cancelled)
    pub fn cancel(&mut self) {
        self.frame_pending = false;
    }
}
