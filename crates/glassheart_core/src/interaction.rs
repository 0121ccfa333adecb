//! Pointer interaction states
//!
//! Each bound element runs a small state machine:
//!
//! ```text
//! Idle --enter (after 16ms)--> Hovered --down--> Pressed
//!  ^  <--------leave---------    |   <----up-----   |
//!  '-------------------------leave------------------'
//! ```
//!
//! Entering does not hover immediately. The caller schedules a 16ms debounce
//! (one frame at 60fps) and reports back through [`InteractionState::settle_hover`];
//! leaving before the debounce fires cancels it, so a pointer passing over an
//! element never triggers a filter regeneration.
//!
//! Pressing amplifies the distortion: [`InteractionState::effective_depth`]
//! divides the base depth by [`PRESS_DEPTH_FACTOR`] while pressed.

use std::time::Duration;

/// Delay between pointer enter and the hovered state
pub const HOVER_DEBOUNCE: Duration = Duration::from_millis(16);

/// Depth is divided by this factor while pressed (about +43%)
pub const PRESS_DEPTH_FACTOR: f32 = 0.7;

/// Pointer events an element reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEvent {
    Enter,
    Leave,
    Down,
    Up,
}

/// Events driving the phase transition table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum PhaseEvent {
    HoverSettled,
    Leave,
    Down,
    Up,
}

/// Interaction phase of one element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InteractionPhase {
    #[default]
    Idle,
    Hovered,
    Pressed,
}

impl InteractionPhase {
    /// Next phase for an event, or `None` if the event is ignored
    fn on_event(&self, event: PhaseEvent) -> Option<Self> {
        use InteractionPhase::*;
        match (self, event) {
            (Idle, PhaseEvent::HoverSettled) => Some(Hovered),
            (Hovered, PhaseEvent::Leave) => Some(Idle),

            (Hovered, PhaseEvent::Down) => Some(Pressed),
            // Touch: no hover first
            (Idle, PhaseEvent::Down) => Some(Pressed),

            (Pressed, PhaseEvent::Up) => Some(Hovered),
            (Pressed, PhaseEvent::Leave) => Some(Idle),
            _ => None,
        }
    }
}

/// What the caller has to do with the hover debounce timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebounceAction {
    #[default]
    None,
    /// (Re)start a `HOVER_DEBOUNCE` timer that calls `settle_hover`
    Schedule,
    /// Cancel the pending timer, if any
    Cancel,
}

/// Result of feeding a pointer event to [`InteractionState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InteractionOutcome {
    /// The phase changed
    pub changed: bool,
    /// Timer work the caller must perform
    pub debounce: DebounceAction,
}

/// Hover/press state of one element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InteractionState {
    phase: InteractionPhase,
    hover_pending: bool,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> InteractionPhase {
        self.phase
    }

    /// Pointer is over the element (hovered or pressed)
    pub fn hovered(&self) -> bool {
        matches!(
            self.phase,
            InteractionPhase::Hovered | InteractionPhase::Pressed
        )
    }

    pub fn pressed(&self) -> bool {
        self.phase == InteractionPhase::Pressed
    }

    /// A pointer enter is waiting for its debounce to elapse
    pub fn hover_pending(&self) -> bool {
        self.hover_pending
    }

    /// Depth to render with, amplified while pressed
    pub fn effective_depth(&self, base_depth: f32) -> f32 {
        if self.pressed() {
            base_depth / PRESS_DEPTH_FACTOR
        } else {
            base_depth
        }
    }

    /// Feed a pointer event
    pub fn handle(&mut self, event: PointerEvent) -> InteractionOutcome {
        match event {
            PointerEvent::Enter => {
                if self.phase != InteractionPhase::Idle {
                    return InteractionOutcome::default();
                }
                // Restarting the debounce on repeated enters
                self.hover_pending = true;
                InteractionOutcome {
                    changed: false,
                    debounce: DebounceAction::Schedule,
                }
            }
            PointerEvent::Leave => self.transition(PhaseEvent::Leave, true),
            PointerEvent::Down => self.transition(PhaseEvent::Down, true),
            PointerEvent::Up => self.transition(PhaseEvent::Up, false),
        }
    }

    /// The hover debounce elapsed
    ///
    /// Ignored unless an enter is still pending, so a timer that fires after
    /// the pointer already left cannot hover the element.
    pub fn settle_hover(&mut self) -> bool {
        if !self.hover_pending {
            return false;
        }
        self.hover_pending = false;
        self.transition(PhaseEvent::HoverSettled, false).changed
    }

    fn transition(&mut self, event: PhaseEvent, cancels_hover: bool) -> InteractionOutcome {
        let debounce = if cancels_hover && self.hover_pending {
            self.hover_pending = false;
            DebounceAction::Cancel
        } else {
            DebounceAction::None
        };

        let changed = match self.phase.on_event(event) {
            Some(next) => {
                tracing::trace!("interaction {:?} -> {:?} on {:?}", self.phase, next, event);
                self.phase = next;
                true
            }
            None => false,
        };

        InteractionOutcome { changed, debounce }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hovered() -> InteractionState {
        let mut state = InteractionState::new();
        state.handle(PointerEvent::Enter);
        state.settle_hover();
        state
    }

    #[test]
    fn test_enter_waits_for_debounce() {
        let mut state = InteractionState::new();

        let outcome = state.handle(PointerEvent::Enter);
        assert_eq!(outcome.debounce, DebounceAction::Schedule);
        assert!(!outcome.changed);
        assert_eq!(state.phase(), InteractionPhase::Idle);
        assert!(state.hover_pending());

        assert!(state.settle_hover());
        assert_eq!(state.phase(), InteractionPhase::Hovered);
        assert!(state.hovered());
        assert!(!state.pressed());
    }

    #[test]
    fn test_leave_cancels_pending_hover() {
        let mut state = InteractionState::new();
        state.handle(PointerEvent::Enter);

        let outcome = state.handle(PointerEvent::Leave);
        assert_eq!(outcome.debounce, DebounceAction::Cancel);
        assert!(!outcome.changed);

        // A late timer must not hover the element
        assert!(!state.settle_hover());
        assert_eq!(state.phase(), InteractionPhase::Idle);
    }

    #[test]
    fn test_press_cycle() {
        let mut state = hovered();

        assert!(state.handle(PointerEvent::Down).changed);
        assert_eq!(state.phase(), InteractionPhase::Pressed);
        assert!(state.hovered());

        assert!(state.handle(PointerEvent::Up).changed);
        assert_eq!(state.phase(), InteractionPhase::Hovered);

        assert!(state.handle(PointerEvent::Leave).changed);
        assert_eq!(state.phase(), InteractionPhase::Idle);
    }

    #[test]
    fn test_leave_while_pressed_clears_press() {
        let mut state = hovered();
        state.handle(PointerEvent::Down);

        assert!(state.handle(PointerEvent::Leave).changed);
        assert_eq!(state.phase(), InteractionPhase::Idle);
        assert!(!state.pressed());
    }

    #[test]
    fn test_touch_press_without_hover() {
        let mut state = InteractionState::new();
        state.handle(PointerEvent::Enter);

        let outcome = state.handle(PointerEvent::Down);
        assert!(outcome.changed);
        assert_eq!(outcome.debounce, DebounceAction::Cancel);
        assert_eq!(state.phase(), InteractionPhase::Pressed);
        assert!(!state.settle_hover());
    }

    #[test]
    fn test_ignored_events() {
        let mut state = InteractionState::new();
        assert_eq!(state.handle(PointerEvent::Up), InteractionOutcome::default());
        assert_eq!(state.handle(PointerEvent::Leave), InteractionOutcome::default());

        let mut state = hovered();
        assert_eq!(state.handle(PointerEvent::Enter), InteractionOutcome::default());
    }

    #[test]
    fn test_effective_depth() {
        let base = 8.0;
        let mut state = InteractionState::new();
        assert_eq!(state.effective_depth(base), base);

        state.handle(PointerEvent::Enter);
        state.settle_hover();
        assert_eq!(state.effective_depth(base), base);

        state.handle(PointerEvent::Down);
        let pressed = state.effective_depth(base);
        assert!((pressed - base / 0.7).abs() < 1e-5);
        assert!((pressed / base - 1.0 / 0.7).abs() < 1e-5);
    }
}
