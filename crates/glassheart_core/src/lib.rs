//! Glassheart Core
//!
//! Everything between an element's geometry and its `backdrop-filter` value,
//! independent of any UI toolkit.
//!
//! # Features
//!
//! - **Filter Parameters**: The full, hashable input of filter generation
//! - **Filter Cache**: Bounded, age-limited memo of generated filters shared by
//!   every element
//! - **Interaction States**: Idle/Hovered/Pressed with a debounced hover and a
//!   deeper distortion while pressed
//! - **Dimension Tracking**: Pixel-rounded measurement coalesced to one per frame
//! - **Task Scheduler**: Cancellable timeouts and frame callbacks on a
//!   host-driven clock
//! - **Configuration**: Effect defaults and cache limits from `glassheart.toml`
//!
//! # Example
//!
//! ```rust
//! use glassheart_core::{resolve_backdrop_filter, Dimensions, FilterCache, GlassOptions};
//! use std::time::Instant;
//!
//! let mut cache = FilterCache::new();
//! let value = resolve_backdrop_filter(
//!     &mut cache,
//!     Dimensions::new(200, 50, 25.0),
//!     8.0,
//!     &GlassOptions::default(),
//!     Instant::now(),
//! );
//!
//! assert!(value.starts_with("blur(1px) url('data:image/svg+xml;utf8,"));
//! assert_eq!(cache.len(), 1);
//! ```

pub mod backdrop;
pub mod cache;
pub mod config;
pub mod dimensions;
pub mod error;
pub mod interaction;
pub mod params;
pub mod scheduler;

pub use backdrop::{compose_backdrop_filter, fallback_backdrop_filter, resolve_backdrop_filter};
pub use cache::{CacheEntry, CacheStats, FilterCache, SharedFilterCache};
pub use config::{CacheConfig, GlassConfig, GlassOptions};
pub use dimensions::{
    parse_border_radius, DimensionObserver, Dimensions, LayoutBox, ObservationMode, ResizeTrigger,
};
pub use error::{ConfigError, Result};
pub use interaction::{
    DebounceAction, InteractionOutcome, InteractionPhase, InteractionState, PointerEvent,
    HOVER_DEBOUNCE, PRESS_DEPTH_FACTOR,
};
pub use params::{FilterKey, FilterParameters};
pub use scheduler::{FrameScheduler, SchedulerHandle, TaskHandle, TaskId};
