//! Per-element glass bindings
//!
//! A [`GlassBinding`] connects one host element to the shared filter cache and
//! scheduler. The host adapter forwards pointer and resize events; the binding
//! keeps the element's `backdrop-filter` in sync with its latest dimensions and
//! interaction state, writing to the host only when the value changes.
//!
//! Deferred work (hover debounce, frame-coalesced measurement) is scheduled
//! through the context's scheduler and holds only a weak reference back to the
//! binding, so a dropped binding is never kept alive by its own timers.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Instant;

use glassheart_core::{
    resolve_backdrop_filter, DebounceAction, DimensionObserver, Dimensions, GlassOptions,
    InteractionPhase, InteractionState, LayoutBox, ObservationMode, PointerEvent, ResizeTrigger,
    SchedulerHandle, SharedFilterCache, TaskHandle, HOVER_DEBOUNCE,
};

/// The element a glass effect is applied to
///
/// Implemented by toolkit adapters. Methods take `&self`; hosts that need to
/// mutate state on `apply_backdrop_filter` use interior mutability, the same
/// way a DOM node is mutated through a shared reference.
///
/// The binding holds no borrow of its own state while calling into the host,
/// so host methods may query the [`GlassBinding`] they belong to.
pub trait ElementHost: 'static {
    /// Rendered box in CSS pixels, `None` while detached or not laid out
    fn layout_box(&self) -> Option<LayoutBox>;

    /// Resolved `border-radius` value, e.g. `"25px"`
    fn border_radius(&self) -> String;

    /// Write the element's `backdrop-filter` style
    fn apply_backdrop_filter(&self, value: &str);

    /// Whether the host can report resizes of the element itself
    fn supports_resize_observer(&self) -> bool {
        true
    }
}

/// A style write computed under the binding's borrow, applied after it ends
struct StyleWrite<H: ElementHost> {
    host: Rc<H>,
    value: String,
}

impl<H: ElementHost> StyleWrite<H> {
    fn apply(self) {
        self.host.apply_backdrop_filter(&self.value);
    }
}

fn measure<H: ElementHost>(host: &H) -> Dimensions {
    match host.layout_box() {
        Some(layout) => Dimensions::measure(layout, &host.border_radius()),
        None => Dimensions::default(),
    }
}

struct BindingInner<H: ElementHost> {
    host: Rc<H>,
    options: GlassOptions,
    interaction: InteractionState,
    observer: DimensionObserver,
    cache: SharedFilterCache,
    scheduler: SchedulerHandle,
    hover_task: Option<TaskHandle>,
    frame_task: Option<TaskHandle>,
    last_applied: Option<String>,
    bound: bool,
}

impl<H: ElementHost> BindingInner<H> {
    /// Recompute the filter from the current state
    ///
    /// Returns the write to perform when the value changed.
    #[must_use]
    fn refresh(&mut self) -> Option<StyleWrite<H>> {
        let depth = self.interaction.effective_depth(self.options.depth);
        let now = self.scheduler.now().unwrap_or_else(Instant::now);
        let value = resolve_backdrop_filter(
            &mut self.cache.borrow_mut(),
            self.observer.current(),
            depth,
            &self.options,
            now,
        );

        if self.last_applied.as_deref() == Some(value.as_str()) {
            return None;
        }
        self.last_applied = Some(value.clone());
        Some(StyleWrite {
            host: Rc::clone(&self.host),
            value,
        })
    }

    fn cancel_tasks(&mut self) {
        if let Some(task) = self.hover_task.take() {
            task.cancel();
        }
        if let Some(task) = self.frame_task.take() {
            task.cancel();
        }
        self.observer.cancel();
    }
}

/// Liquid glass effect bound to one host element
///
/// Created by [`GlassContext::bind`](crate::GlassContext::bind). Dropping the
/// binding unbinds it.
pub struct GlassBinding<H: ElementHost> {
    inner: Rc<RefCell<BindingInner<H>>>,
}

impl<H: ElementHost> GlassBinding<H> {
    pub(crate) fn new(
        host: H,
        options: GlassOptions,
        cache: SharedFilterCache,
        scheduler: SchedulerHandle,
    ) -> Self {
        let mode = ObservationMode::for_host(host.supports_resize_observer());
        if mode == ObservationMode::WindowOnly {
            tracing::debug!("element resize observation unavailable, tracking window resizes only");
        }

        let inner = Rc::new(RefCell::new(BindingInner {
            host: Rc::new(host),
            options: options.sanitized(),
            interaction: InteractionState::new(),
            observer: DimensionObserver::new(mode),
            cache,
            scheduler,
            hover_task: None,
            frame_task: None,
            last_applied: None,
            bound: true,
        }));

        // Unmeasured elements start with the blur-only fallback
        let write = inner.borrow_mut().refresh();
        if let Some(write) = write {
            write.apply();
        }
        Self::request_measure(&inner, None);

        tracing::debug!("glass binding attached ({:?})", mode);
        Self { inner }
    }

    pub fn pointer_enter(&self) {
        self.handle_pointer(PointerEvent::Enter);
    }

    pub fn pointer_leave(&self) {
        self.handle_pointer(PointerEvent::Leave);
    }

    pub fn pointer_down(&self) {
        self.handle_pointer(PointerEvent::Down);
    }

    pub fn pointer_up(&self) {
        self.handle_pointer(PointerEvent::Up);
    }

    /// Report a window or element resize
    ///
    /// The element is measured on the next frame; several resizes before that
    /// frame share one measurement.
    pub fn notify_resize(&self, trigger: ResizeTrigger) {
        Self::request_measure(&self.inner, Some(trigger));
    }

    /// The `backdrop-filter` value last written to the host
    pub fn backdrop_filter(&self) -> String {
        self.inner.borrow().last_applied.clone().unwrap_or_default()
    }

    pub fn phase(&self) -> InteractionPhase {
        self.inner.borrow().interaction.phase()
    }

    pub fn dimensions(&self) -> Dimensions {
        self.inner.borrow().observer.current()
    }

    /// Depth the current filter is rendered with
    pub fn effective_depth(&self) -> f32 {
        let inner = self.inner.borrow();
        inner.interaction.effective_depth(inner.options.depth)
    }

    pub fn options(&self) -> GlassOptions {
        self.inner.borrow().options
    }

    pub fn observation_mode(&self) -> ObservationMode {
        self.inner.borrow().observer.mode()
    }

    pub fn is_bound(&self) -> bool {
        self.inner.borrow().bound
    }

    /// Detach from the element
    ///
    /// Pending timers and frames are cancelled and later events are ignored.
    /// The last applied style is left on the host.
    pub fn unbind(&self) {
        let mut inner = self.inner.borrow_mut();
        if !inner.bound {
            return;
        }
        inner.bound = false;
        inner.cancel_tasks();
        tracing::debug!("glass binding detached");
    }

    fn handle_pointer(&self, event: PointerEvent) {
        let write = {
            let mut inner = self.inner.borrow_mut();
            if !inner.bound {
                return;
            }

            let mut write = None;
            let outcome = inner.interaction.handle(event);
            match outcome.debounce {
                DebounceAction::Schedule => {
                    let weak = Rc::downgrade(&self.inner);
                    // Replacing the handle cancels a debounce already running
                    inner.hover_task = inner
                        .scheduler
                        .set_timeout(HOVER_DEBOUNCE, move || Self::settle_hover(&weak));

                    if inner.hover_task.is_none() && inner.interaction.settle_hover() {
                        write = inner.refresh();
                    }
                }
                DebounceAction::Cancel => {
                    if let Some(task) = inner.hover_task.take() {
                        task.cancel();
                    }
                }
                DebounceAction::None => {}
            }

            if outcome.changed {
                write = inner.refresh().or(write);
            }
            write
        };

        if let Some(write) = write {
            write.apply();
        }
    }

    fn settle_hover(weak: &Weak<RefCell<BindingInner<H>>>) {
        let Some(this) = weak.upgrade() else {
            return;
        };
        let write = {
            let mut inner = this.borrow_mut();
            inner.hover_task = None;
            if inner.bound && inner.interaction.settle_hover() {
                inner.refresh()
            } else {
                None
            }
        };
        if let Some(write) = write {
            write.apply();
        }
    }

    fn request_measure(this: &Rc<RefCell<BindingInner<H>>>, trigger: Option<ResizeTrigger>) {
        let host = {
            let mut inner = this.borrow_mut();
            if !inner.bound {
                return;
            }

            let needs_frame = match trigger {
                Some(trigger) => inner.observer.notify(trigger),
                None => inner.observer.request_measure(),
            };
            if !needs_frame {
                return;
            }

            let weak = Rc::downgrade(this);
            inner.frame_task = inner
                .scheduler
                .request_frame(move || Self::run_measure(&weak));
            if inner.frame_task.is_some() {
                return;
            }

            // Scheduler is gone, measure now
            inner.observer.cancel();
            Rc::clone(&inner.host)
        };
        Self::commit_measurement(this, measure(&*host));
    }

    fn run_measure(weak: &Weak<RefCell<BindingInner<H>>>) {
        let Some(this) = weak.upgrade() else {
            return;
        };
        let host = {
            let mut inner = this.borrow_mut();
            inner.frame_task = None;
            if !inner.bound {
                return;
            }
            Rc::clone(&inner.host)
        };
        Self::commit_measurement(&this, measure(&*host));
    }

    fn commit_measurement(this: &Rc<RefCell<BindingInner<H>>>, measured: Dimensions) {
        let write = {
            let mut inner = this.borrow_mut();
            if !inner.bound {
                return;
            }
            match inner.observer.commit(measured) {
                Some(dimensions) => {
                    tracing::trace!(
                        "glass element measured {}x{} r{}",
                        dimensions.width,
                        dimensions.height,
                        dimensions.radius
                    );
                    inner.refresh()
                }
                None => None,
            }
        };
        if let Some(write) = write {
            write.apply();
        }
    }
}

impl<H: ElementHost> Drop for GlassBinding<H> {
    fn drop(&mut self) {
        self.unbind();
    }
}

impl<H: ElementHost> std::fmt::Debug for GlassBinding<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("GlassBinding")
            .field("phase", &inner.interaction.phase())
            .field("dimensions", &inner.observer.current())
            .field("bound", &inner.bound)
            .finish()
    }
}
