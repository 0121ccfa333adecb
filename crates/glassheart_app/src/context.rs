//! Application context for glassheart_app
//!
//! One `GlassContext` per application. It owns the filter cache shared by all
//! bindings and the scheduler the host drives from its event loop:
//!
//! ```ignore
//! // on every timer tick
//! ctx.advance_to(Instant::now());
//! // on every animation frame
//! ctx.run_frame();
//! ```

use std::path::Path;
use std::time::{Duration, Instant};

use glassheart_core::{
    CacheStats, FilterCache, FrameScheduler, GlassConfig, GlassOptions, SchedulerHandle,
    SharedFilterCache,
};

use crate::binding::{ElementHost, GlassBinding};
use crate::error::Result;

/// Shared state of every glass element in an application
pub struct GlassContext {
    config: GlassConfig,
    cache: SharedFilterCache,
    scheduler: FrameScheduler,
}

impl GlassContext {
    pub fn new(config: GlassConfig) -> Self {
        Self::with_scheduler(config, FrameScheduler::new())
    }

    /// Create a context driven by an explicit scheduler (e.g. one starting at
    /// a fixed instant in tests)
    pub fn with_scheduler(config: GlassConfig, scheduler: FrameScheduler) -> Self {
        tracing::debug!(
            "glass context created (cache capacity {}, max age {:?})",
            config.cache.capacity,
            config.cache.max_age()
        );
        Self {
            cache: FilterCache::with_config(config.cache).into_shared(),
            config,
            scheduler,
        }
    }

    /// Create a context from a `glassheart.toml` file
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(GlassConfig::load(path)?))
    }

    /// Bind a glass effect with explicit options to `host`
    pub fn bind<H: ElementHost>(&self, host: H, options: GlassOptions) -> GlassBinding<H> {
        GlassBinding::new(host, options, self.cache.clone(), self.scheduler.handle())
    }

    /// Bind a glass effect with the configured default options to `host`
    pub fn bind_default<H: ElementHost>(&self, host: H) -> GlassBinding<H> {
        self.bind(host, self.config.effect)
    }

    /// Run every timer due at `now`
    pub fn advance_to(&self, now: Instant) -> usize {
        self.scheduler.advance_to(now)
    }

    pub fn advance_by(&self, delta: Duration) -> usize {
        self.scheduler.advance_by(delta)
    }

    /// Run one animation frame (pending measurements)
    pub fn run_frame(&self) -> usize {
        self.scheduler.run_frame()
    }

    pub fn now(&self) -> Instant {
        self.scheduler.now()
    }

    /// Number of timers and frame callbacks waiting to run
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending_count()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.borrow().stats()
    }

    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
    }

    /// The filter cache shared by every binding of this context
    ///
    /// Bindings timestamp entries with the scheduler clock. Direct callers
    /// should pass [`now`](Self::now) to `get_at`/`put_at` so expiry is measured
    /// on the same clock.
    pub fn cache(&self) -> SharedFilterCache {
        self.cache.clone()
    }

    pub fn scheduler_handle(&self) -> SchedulerHandle {
        self.scheduler.handle()
    }

    pub fn config(&self) -> &GlassConfig {
        &self.config
    }
}

impl Default for GlassContext {
    fn default() -> Self {
        Self::new(GlassConfig::default())
    }
}
