//! Cancellable task scheduler
//!
//! Glassheart defers two kinds of work: the hover debounce (a timeout) and
//! dimension measurement (an animation frame callback). Both go through
//! `FrameScheduler` so that teardown is deterministic: every scheduled task
//! returns a [`TaskHandle`] whose `cancel()` (or drop) guarantees the callback
//! never runs.
//!
//! The scheduler is single-threaded and driven by the host:
//!
//! - `advance_to(now)` runs every timeout due at or before `now`
//! - `run_frame()` runs the frame callbacks requested before the frame began
//!
//! Callbacks run outside any internal borrow, so they may schedule or cancel
//! other tasks. A frame requested from inside a frame callback runs on the
//! next frame.
//!
//! # Example
//!
//! ```rust
//! use glassheart_core::scheduler::FrameScheduler;
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use std::time::Duration;
//!
//! let scheduler = FrameScheduler::new();
//! let handle = scheduler.handle();
//!
//! let fired = Rc::new(Cell::new(false));
//! let flag = fired.clone();
//! let task = handle
//!     .set_timeout(Duration::from_millis(16), move || flag.set(true))
//!     .unwrap();
//!
//! task.cancel();
//! scheduler.advance_by(Duration::from_millis(20));
//! assert!(!fired.get());
//! ```

use slotmap::{new_key_type, SlotMap};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

new_key_type! {
    /// Id of a scheduled task
    pub struct TaskId;
}

type TaskCallback = Box<dyn FnOnce()>;

enum TaskKind {
    Timeout { due: Instant },
    Frame,
}

struct Task {
    kind: TaskKind,
    /// Insertion order, breaks ties between tasks due at the same instant
    seq: u64,
    callback: TaskCallback,
}

struct SchedulerInner {
    tasks: SlotMap<TaskId, Task>,
    now: Instant,
    next_seq: u64,
    frame: u64,
}

impl SchedulerInner {
    fn insert(&mut self, kind: TaskKind, callback: TaskCallback) -> TaskId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.tasks.insert(Task {
            kind,
            seq,
            callback,
        })
    }

    /// Ids of the tasks matching `ready`, in scheduling order
    fn ready_ids<F>(&self, ready: F) -> Vec<TaskId>
    where
        F: Fn(&Task) -> bool,
    {
        let mut ids: Vec<(Instant, u64, TaskId)> = self
            .tasks
            .iter()
            .filter(|(_, task)| ready(task))
            .map(|(id, task)| {
                let due = match task.kind {
                    TaskKind::Timeout { due } => due,
                    TaskKind::Frame => self.now,
                };
                (due, task.seq, id)
            })
            .collect();
        ids.sort_by_key(|&(due, seq, _)| (due, seq));
        ids.into_iter().map(|(_, _, id)| id).collect()
    }
}

/// Host-driven timer and frame scheduler
///
/// Owned by the application context; bindings hold a weak [`SchedulerHandle`].
pub struct FrameScheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl FrameScheduler {
    /// Create a scheduler whose clock starts at the current instant
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Create a scheduler whose clock starts at `now`
    pub fn starting_at(now: Instant) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                tasks: SlotMap::with_key(),
                now,
                next_seq: 0,
                frame: 0,
            })),
        }
    }

    /// Get a handle to this scheduler for passing to bindings
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Current scheduler time
    pub fn now(&self) -> Instant {
        self.inner.borrow().now
    }

    /// Number of frames run so far
    pub fn frame_count(&self) -> u64 {
        self.inner.borrow().frame
    }

    /// Number of tasks waiting to run
    pub fn pending_count(&self) -> usize {
        self.inner.borrow().tasks.len()
    }

    /// Move the clock to `now` and run every timeout that became due
    ///
    /// The clock never goes backwards. Returns the number of callbacks run.
    pub fn advance_to(&self, now: Instant) -> usize {
        let ids = {
            let mut inner = self.inner.borrow_mut();
            if now > inner.now {
                inner.now = now;
            }
            let now = inner.now;
            inner.ready_ids(|task| matches!(task.kind, TaskKind::Timeout { due } if due <= now))
        };
        self.run_tasks(ids)
    }

    /// Advance the clock by `delta`
    pub fn advance_by(&self, delta: Duration) -> usize {
        let now = self.now() + delta;
        self.advance_to(now)
    }

    /// Run the callbacks of one animation frame
    ///
    /// Returns the number of callbacks run.
    pub fn run_frame(&self) -> usize {
        let ids = {
            let mut inner = self.inner.borrow_mut();
            inner.frame += 1;
            inner.ready_ids(|task| matches!(task.kind, TaskKind::Frame))
        };
        self.run_tasks(ids)
    }

    /// Run the given tasks in order, each taken out of the map right before it
    /// runs so an earlier callback can still cancel a later one
    fn run_tasks(&self, ids: Vec<TaskId>) -> usize {
        let mut count = 0;
        for id in ids {
            let task = self.inner.borrow_mut().tasks.remove(id);
            if let Some(task) = task {
                (task.callback)();
                count += 1;
            }
        }
        count
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// A weak handle to the scheduler
///
/// Scheduling through a handle whose scheduler was dropped returns `None`.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<RefCell<SchedulerInner>>,
}

impl SchedulerHandle {
    /// Run `callback` once `delay` has elapsed on the scheduler clock
    pub fn set_timeout<F>(&self, delay: Duration, callback: F) -> Option<TaskHandle>
    where
        F: FnOnce() + 'static,
    {
        let inner = self.inner.upgrade()?;
        let id = {
            let mut guard = inner.borrow_mut();
            let due = guard.now + delay;
            guard.insert(TaskKind::Timeout { due }, Box::new(callback))
        };
        Some(TaskHandle {
            id,
            scheduler: self.inner.clone(),
        })
    }

    /// Run `callback` on the next animation frame
    pub fn request_frame<F>(&self, callback: F) -> Option<TaskHandle>
    where
        F: FnOnce() + 'static,
    {
        let inner = self.inner.upgrade()?;
        let id = inner.borrow_mut().insert(TaskKind::Frame, Box::new(callback));
        Some(TaskHandle {
            id,
            scheduler: self.inner.clone(),
        })
    }

    /// Current scheduler time, `None` once the scheduler is gone
    pub fn now(&self) -> Option<Instant> {
        self.inner.upgrade().map(|inner| inner.borrow().now)
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

/// A scheduled task
///
/// Dropping the handle cancels the task.
pub struct TaskHandle {
    id: TaskId,
    scheduler: Weak<RefCell<SchedulerInner>>,
}

impl TaskHandle {
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Cancel the task; returns true if it had not run yet
    pub fn cancel(&self) -> bool {
        let Some(inner) = self.scheduler.upgrade() else {
            return false;
        };
        // The removed task may own handles of its own; drop it after the borrow
        let removed = inner.borrow_mut().tasks.remove(self.id);
        removed.is_some()
    }

    /// Check if the task is still waiting to run
    pub fn is_pending(&self) -> bool {
        self.scheduler
            .upgrade()
            .is_some_and(|inner| inner.borrow().tasks.contains_key(self.id))
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskHandle").field("id", &self.id).finish()
    }
}
