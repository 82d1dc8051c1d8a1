#![forbid(unsafe_code)]

//! Debouncing for high-frequency page events.
//!
//! Scroll events arrive far faster than the page needs to recompute its
//! visual state. [`Debouncer`] collapses a burst of calls into at most one
//! execution per window:
//!
//! - **Leading** (immediate): the first call of a burst fires synchronously.
//!   Every later call inside the window is suppressed and pushes the window
//!   out again. Once the window lapses with no further calls, the next call
//!   fires.
//! - **Trailing**: calls never fire synchronously. Each call restarts the
//!   window; the action fires once, from [`Debouncer::poll`], after the window
//!   elapses quietly.
//!
//! Time is host-driven (see [`crate::timer`]).
//!
//! ```
//! use std::time::Duration;
//! use steelsite_core::debounce::Debouncer;
//!
//! let ms = Duration::from_millis;
//! let mut d = Debouncer::leading(ms(10));
//! assert!(d.call(ms(0)));
//! assert!(!d.call(ms(5)));
//! assert!(d.call(ms(20)));
//! ```

use std::time::Duration;

/// Which edge of a burst fires the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Leading,
    Trailing,
}

/// Burst-collapsing gate driven by host time.
#[derive(Debug, Clone)]
pub struct Debouncer {
    wait: Duration,
    edge: Edge,
    /// End of the current window; `None` when idle.
    deadline: Option<Duration>,
    /// A trailing call is waiting for the window to lapse.
    pending: bool,
}

impl Debouncer {
    #[must_use]
    pub const fn new(wait: Duration, edge: Edge) -> Self {
        Self {
            wait,
            edge,
            deadline: None,
            pending: false,
        }
    }

    #[must_use]
    pub const fn leading(wait: Duration) -> Self {
        Self::new(wait, Edge::Leading)
    }

    #[must_use]
    pub const fn trailing(wait: Duration) -> Self {
        Self::new(wait, Edge::Trailing)
    }

    /// Whether no window is open at `now`.
    #[must_use]
    pub fn is_idle(&self, now: Duration) -> bool {
        self.deadline.is_none_or(|deadline| deadline <= now)
    }

    /// Record a call at `now`. Returns `true` when the action should run now.
    ///
    /// In trailing mode this only returns `true` if the host missed a
    /// [`poll`](Self::poll) and an earlier burst is overdue; that burst fires
    /// here and the new call starts a fresh window.
    pub fn call(&mut self, now: Duration) -> bool {
        let idle = self.is_idle(now);
        self.deadline = Some(now.saturating_add(self.wait));
        match self.edge {
            Edge::Leading => idle,
            Edge::Trailing => {
                let overdue = self.pending && idle;
                self.pending = true;
                overdue
            }
        }
    }

    /// Close an expired window. Returns `true` when a trailing call fires.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                self.edge == Edge::Trailing && std::mem::take(&mut self.pending)
            }
            _ => false,
        }
    }

    /// When the host must call [`poll`](Self::poll) next, if a trailing call is pending.
    #[must_use]
    pub fn wake_at(&self) -> Option<Duration> {
        if self.pending { self.deadline } else { None }
    }

    /// Forget any open window and pending call.
    pub fn reset(&mut self) {
        self.deadline = None;
        self.pending = false;
    }
}

/// A callback wrapped by a [`Debouncer`].
pub struct Debounced<F> {
    debouncer: Debouncer,
    action: F,
}

impl<F: FnMut()> Debounced<F> {
    pub const fn new(debouncer: Debouncer, action: F) -> Self {
        Self { debouncer, action }
    }

    /// Forward a call; runs the action if the debouncer lets it through.
    pub fn call(&mut self, now: Duration) -> bool {
        let fire = self.debouncer.call(now);
        if fire {
            (self.action)();
        }
        fire
    }

    /// Advance time; runs a pending trailing action once its window lapses.
    pub fn poll(&mut self, now: Duration) -> bool {
        let fire = self.debouncer.poll(now);
        if fire {
            (self.action)();
        }
        fire
    }

    #[must_use]
    pub const fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }
}

impl<F> core::fmt::Debug for Debounced<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Debounced")
            .field("debouncer", &self.debouncer)
            .finish_non_exhaustive()
    }
}
