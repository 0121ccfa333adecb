//! Glassheart Application Layer
//!
//! Binds liquid glass effects to host elements. Toolkit adapters implement
//! [`ElementHost`] for their element type, forward pointer and resize events to
//! the [`GlassBinding`], and drive the [`GlassContext`] scheduler from their
//! event loop.
//!
//! # Example
//!
//! ```rust
//! use glassheart_app::prelude::*;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use std::time::Duration;
//!
//! #[derive(Clone, Default)]
//! struct Element {
//!     style: Rc<RefCell<String>>,
//! }
//!
//! impl ElementHost for Element {
//!     fn layout_box(&self) -> Option<LayoutBox> {
//!         Some(LayoutBox::new(200.0, 50.0))
//!     }
//!
//!     fn border_radius(&self) -> String {
//!         "25px".to_string()
//!     }
//!
//!     fn apply_backdrop_filter(&self, value: &str) {
//!         *self.style.borrow_mut() = value.to_string();
//!     }
//! }
//!
//! let ctx = GlassContext::default();
//! let element = Element::default();
//! let glass = ctx.bind(element.clone(), GlassOptions::new().chromatic_aberration(5.0));
//!
//! // First frame measures the element
//! ctx.run_frame();
//! assert!(element.style.borrow().contains("#displace"));
//!
//! glass.pointer_enter();
//! ctx.advance_by(Duration::from_millis(16));
//! glass.pointer_down();
//! assert_eq!(glass.phase(), InteractionPhase::Pressed);
//! ```

mod binding;
mod context;
mod error;


pub use binding::{ElementHost, GlassBinding};
pub use context::GlassContext;
pub use error::{GlassError, Result};

// Re-export core types adapters need
pub use glassheart_core::{
    CacheStats, Dimensions, GlassConfig, GlassOptions, InteractionPhase, LayoutBox,
    ObservationMode, ResizeTrigger,
};
pub use glassheart_svg::FILTER_ID;

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::binding::{ElementHost, GlassBinding};
    pub use crate::context::GlassContext;
    pub use crate::error::{GlassError, Result};

    pub use glassheart_core::{
        CacheConfig, Dimensions, GlassConfig, GlassOptions, InteractionPhase, LayoutBox,
        ObservationMode, ResizeTrigger,
    };
}
