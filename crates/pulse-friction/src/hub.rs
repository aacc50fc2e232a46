//! In-process event hub: listener registry and interval timers.
//!
//! The hub stands in for the host's event loop. Registrations are handed out
//! as guards ([`Subscription`], [`IntervalTimer`]) that remove themselves on
//! drop, so a forgotten cleanup path cannot leave a listener attached.
//!
//! Everything here is single-threaded. Handlers are invoked with no hub
//! borrow held, which lets a handler subscribe, unsubscribe or cancel a timer
//! while it runs. A handler that re-enters itself through a nested dispatch is
//! skipped for the nested call.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{trace, warn};

use crate::event::{Disposition, EventKind, InputEvent};

type Handler = Rc<RefCell<dyn FnMut(&InputEvent) -> Disposition>>;
type TimerCallback = Rc<RefCell<dyn FnMut(u64)>>;

struct Listener {
    id: u64,
    kind: EventKind,
    handler: Handler,
}

struct Interval {
    id: u64,
    period_ms: u64,
    next_due: u64,
    callback: TimerCallback,
}

impl Interval {
    /// Last deadline at or before `now_ms`, counting whole periods from
    /// `next_due`.
    fn latest_elapsed(&self, now_ms: u64) -> u64 {
        let missed = now_ms.saturating_sub(self.next_due) / self.period_ms;
        self.next_due
            .saturating_add(missed.saturating_mul(self.period_ms))
    }
}

#[derive(Default)]
struct HubState {
    next_id: u64,
    now_ms: u64,
    listeners: Vec<Listener>,
    intervals: Vec<Interval>,
}

impl HubState {
    fn allocate_id(&mut self) -> u64 {
        self.next_id = self.next_id.wrapping_add(1);
        self.next_id
    }

    fn remove_listener(&mut self, id: u64) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    fn remove_interval(&mut self, id: u64) -> bool {
        let before = self.intervals.len();
        self.intervals.retain(|t| t.id != id);
        self.intervals.len() != before
    }

    /// Pop the earliest interval due at or before `now_ms`, rescheduling it
    /// past `now_ms`. Missed periods collapse into the latest one.
    fn take_due(&mut self, now_ms: u64) -> Option<(u64, TimerCallback)> {
        let timer = self
            .intervals
            .iter_mut()
            .filter(|t| t.next_due <= now_ms && t.next_due != u64::MAX)
            .min_by_key(|t| (t.latest_elapsed(now_ms), t.id))?;

        let due = timer.latest_elapsed(now_ms);
        timer.next_due = due.checked_add(timer.period_ms).unwrap_or(u64::MAX);
        let callback = Rc::clone(&timer.callback);
        self.now_ms = self.now_ms.max(due);
        Some((due, callback))
    }
}

/// Listener registry and timer scheduler.
///
/// # Example
///
/// ```
/// use pulse_friction::prelude::*;
///
/// let hub = EventHub::new();
/// let subscription = hub.subscribe(EventKind::Wheel, |_| Disposition::Suppressed);
///
/// let outcome = hub.dispatch(&InputEvent::Wheel { delta_y: 40.0 });
/// assert!(outcome.default_prevented());
///
/// drop(subscription);
/// assert_eq!(hub.listener_count(), 0);
/// ```
#[derive(Default)]
pub struct EventHub {
    state: Rc<RefCell<HubState>>,
}

impl EventHub {
    /// Create a hub whose timer clock starts at 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a hub whose timer clock starts at `now_ms`.
    #[must_use]
    pub fn starting_at(now_ms: u64) -> Self {
        let hub = Self::new();
        hub.state.borrow_mut().now_ms = now_ms;
        hub
    }

    /// Current timer clock reading.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.state.try_borrow().map_or(0, |s| s.now_ms)
    }

    /// Register `handler` for events of `kind`.
    ///
    /// The handler stays registered until the returned guard is dropped or
    /// cancelled.
    pub fn subscribe<F>(&self, kind: EventKind, handler: F) -> Subscription
    where
        F: FnMut(&InputEvent) -> Disposition + 'static,
    {
        let handler: Handler = Rc::new(RefCell::new(handler));
        let id = match self.state.try_borrow_mut() {
            Ok(mut state) => {
                let id = state.allocate_id();
                state.listeners.push(Listener { id, kind, handler });
                id
            }
            Err(_) => {
                warn!(?kind, "event hub busy, subscription not registered");
                0
            }
        };
        trace!(?kind, id, "listener registered");
        Subscription {
            hub: Rc::downgrade(&self.state),
            id,
            kind,
        }
    }

    /// Schedule `callback` every `period_ms`, first firing one period from now.
    ///
    /// The callback receives the deadline it fires for. A zero period is
    /// raised to 1 ms.
    pub fn set_interval<F>(&self, period_ms: u64, callback: F) -> IntervalTimer
    where
        F: FnMut(u64) + 'static,
    {
        let period_ms = period_ms.max(1);
        let callback: TimerCallback = Rc::new(RefCell::new(callback));
        let id = match self.state.try_borrow_mut() {
            Ok(mut state) => {
                let id = state.allocate_id();
                let next_due = state.now_ms.saturating_add(period_ms);
                state.intervals.push(Interval {
                    id,
                    period_ms,
                    next_due,
                    callback,
                });
                id
            }
            Err(_) => {
                warn!(period_ms, "event hub busy, interval not registered");
                0
            }
        };
        trace!(period_ms, id, "interval scheduled");
        IntervalTimer {
            hub: Rc::downgrade(&self.state),
            id,
            period_ms,
        }
    }

    /// Deliver `event` to every listener of its kind, in registration order.
    ///
    /// Returns the first disposition that prevents the default, or
    /// [`Disposition::PassThrough`] if no listener did. Every listener runs
    /// regardless. Listeners removed by an earlier handler during the same
    /// dispatch are not called.
    pub fn dispatch(&self, event: &InputEvent) -> Disposition {
        let kind = event.kind();
        let handlers: Vec<(u64, Handler)> = match self.state.try_borrow() {
            Ok(state) => state
                .listeners
                .iter()
                .filter(|l| l.kind == kind)
                .map(|l| (l.id, Rc::clone(&l.handler)))
                .collect(),
            Err(_) => return Disposition::PassThrough,
        };

        let mut outcome = Disposition::PassThrough;
        for (id, handler) in handlers {
            if !self.has_listener(id) {
                continue;
            }
            let disposition = match handler.try_borrow_mut() {
                Ok(mut f) => (&mut *f)(event),
                Err(_) => {
                    trace!(?kind, id, "skipping re-entrant listener");
                    continue;
                }
            };
            if !outcome.default_prevented() {
                outcome = disposition;
            }
        }
        outcome
    }

    /// Advance the timer clock to `now_ms`, firing due intervals.
    ///
    /// Each due interval fires once, for its latest elapsed deadline, and is
    /// then rescheduled one period after that deadline. Periods skipped by a
    /// large jump are not replayed. Intervals fire in deadline order. Moving
    /// the clock backwards fires nothing. Returns the number of callbacks run.
    pub fn advance_to(&self, now_ms: u64) -> usize {
        let mut fired = 0usize;
        loop {
            let next = match self.state.try_borrow_mut() {
                Ok(mut state) => {
                    let next = state.take_due(now_ms);
                    if next.is_none() {
                        state.now_ms = state.now_ms.max(now_ms);
                    }
                    next
                }
                Err(_) => None,
            };
            let Some((due, callback)) = next else {
                break;
            };
            match callback.try_borrow_mut() {
                Ok(mut f) => {
                    (&mut *f)(due);
                    fired = fired.saturating_add(1);
                }
                Err(_) => trace!(due, "skipping re-entrant interval"),
            }
        }
        fired
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.state.try_borrow().map_or(0, |s| s.listeners.len())
    }

    /// Number of registered listeners for `kind`.
    #[must_use]
    pub fn listener_count_for(&self, kind: EventKind) -> usize {
        self.state
            .try_borrow()
            .map_or(0, |s| s.listeners.iter().filter(|l| l.kind == kind).count())
    }

    /// Number of scheduled intervals.
    #[must_use]
    pub fn timer_count(&self) -> usize {
        self.state.try_borrow().map_or(0, |s| s.intervals.len())
    }

    fn has_listener(&self, id: u64) -> bool {
        self.state
            .try_borrow()
            .is_ok_and(|s| s.listeners.iter().any(|l| l.id == id))
    }
}

impl fmt::Debug for EventHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHub")
            .field("now_ms", &self.now_ms())
            .field("listeners", &self.listener_count())
            .field("timers", &self.timer_count())
            .finish()
    }
}

/// Guard for a registered listener. Unregisters on drop.
#[derive(Debug)]
#[must_use = "dropping a Subscription immediately unregisters the listener"]
pub struct Subscription {
    hub: Weak<RefCell<HubState>>,
    id: u64,
    kind: EventKind,
}

impl Subscription {
    /// The event kind this subscription listens to.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Whether the listener is still registered with a live hub.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.hub.upgrade().is_some_and(|state| {
            state
                .try_borrow()
                .is_ok_and(|s| s.listeners.iter().any(|l| l.id == self.id))
        })
    }

    /// Unregister the listener now.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(state) = self.hub.upgrade() else {
            return;
        };
        match state.try_borrow_mut() {
            Ok(mut state) => {
                if state.remove_listener(self.id) {
                    trace!(kind = ?self.kind, id = self.id, "listener removed");
                }
            }
            Err(_) => warn!(id = self.id, "event hub busy, listener not removed"),
        }
    }
}

/// Guard for a scheduled interval. Cancels on drop.
#[derive(Debug)]
#[must_use = "dropping an IntervalTimer immediately cancels it"]
pub struct IntervalTimer {
    hub: Weak<RefCell<HubState>>,
    id: u64,
    period_ms: u64,
}

impl IntervalTimer {
    /// The interval period in milliseconds.
    #[must_use]
    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    /// Whether the interval is still scheduled on a live hub.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.hub.upgrade().is_some_and(|state| {
            state
                .try_borrow()
                .is_ok_and(|s| s.intervals.iter().any(|t| t.id == self.id))
        })
    }

    /// Cancel the interval now.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for IntervalTimer {
    fn drop(&mut self) {
        let Some(state) = self.hub.upgrade() else {
            return;
        };
        match state.try_borrow_mut() {
            Ok(mut state) => {
                if state.remove_interval(self.id) {
                    trace!(id = self.id, "interval cancelled");
                }
            }
            Err(_) => warn!(id = self.id, "event hub busy, interval not cancelled"),
        }
    }
}
