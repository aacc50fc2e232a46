//! Friction controller: routes input into the tracker and damps scrolling.
//!
//! The controller owns no fatigue logic. It forwards scroll and dwell signals
//! to the [`KineticTracker`], scales wheel and touch deltas by the tracker's
//! friction multiplier while the feed is in cozy mode, and periodically asks
//! the tracker whether to request a switch into cozy mode.
//!
//! # Re-entrancy
//!
//! State lives behind a single `Rc<RefCell<_>>`. The mode-switch callback is
//! invoked after that borrow is released, so the callback may call
//! [`FrictionController::set_mode`] directly. A [`ScrollSurface`] must not
//! call back into the controller from `scroll_by`; such calls see the
//! controller busy and pass through.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use pulse_kinetics::{Clock, FatiguePolicy, KineticTracker, SystemClock};
use tracing::{debug, info, trace};

use crate::config::FrictionConfig;
use crate::error::FrictionResult;
use crate::event::{Disposition, EventKind, InputEvent, TouchTarget};
use crate::gesture::TouchGesture;
use crate::hub::EventHub;
use crate::mode::{Mode, ModeSwitch};
use crate::session::FrictionSession;

/// A scrollable viewport.
pub trait ScrollSurface {
    /// Current absolute scroll offset (px).
    fn scroll_position(&self) -> f64;

    /// Scroll by `delta` pixels, positive moving down.
    fn scroll_by(&mut self, delta: f64);
}

impl<S: ScrollSurface + ?Sized> ScrollSurface for Box<S> {
    fn scroll_position(&self) -> f64 {
        (**self).scroll_position()
    }

    fn scroll_by(&mut self, delta: f64) {
        (**self).scroll_by(delta);
    }
}

struct ControllerCore<S, C: Clock> {
    config: FrictionConfig,
    tracker: KineticTracker<C>,
    surface: S,
    mode: Mode,
    gesture: Option<TouchGesture>,
    last_trigger_ms: Option<u64>,
}

impl<S: ScrollSurface, C: Clock> ControllerCore<S, C> {
    fn record_surface_position(&mut self) {
        let position = self.surface.scroll_position();
        self.tracker.record_scroll(position);
    }

    fn on_wheel(&mut self, delta_y: f64) -> Disposition {
        if !self.mode.is_cozy() {
            self.record_surface_position();
            return Disposition::PassThrough;
        }
        self.apply_damped(delta_y)
    }

    fn on_touch_start(&mut self, touches: u32, y: f64, target: TouchTarget) -> Disposition {
        if !self.mode.is_cozy() || touches != 1 {
            self.gesture = None;
            return Disposition::PassThrough;
        }
        let gesture = TouchGesture::begin(target, y);
        debug!(?target, captured = gesture.is_captured(), "touch gesture started");
        self.gesture = Some(gesture);
        Disposition::PassThrough
    }

    fn on_touch_move(&mut self, touches: u32, y: f64) -> Disposition {
        if !self.mode.is_cozy() || touches != 1 {
            return Disposition::PassThrough;
        }
        let threshold = self.config.touch_scroll_threshold;
        let Some(delta) = self.gesture.as_mut().and_then(|g| g.track(y, threshold)) else {
            return Disposition::PassThrough;
        };
        self.apply_damped(delta)
    }

    /// Damp `raw_delta` and scroll the surface. The platform default is
    /// prevented either way.
    fn apply_damped(&mut self, raw_delta: f64) -> Disposition {
        let multiplier = self.tracker.friction_multiplier();
        match self.config.damp(raw_delta, multiplier) {
            Some(delta) => {
                self.surface.scroll_by(delta);
                self.record_surface_position();
                trace!(raw_delta, delta, multiplier, "damped scroll applied");
                Disposition::Applied { delta }
            }
            None => {
                trace!(raw_delta, multiplier, "damped scroll below minimum distance");
                Disposition::Suppressed
            }
        }
    }

    /// Whether a fatigue trigger fires at `now`. Records the trigger time.
    fn should_trigger(&mut self, now: u64) -> bool {
        if let Some(last) = self.last_trigger_ms
            && now.saturating_sub(last) < self.config.cooldown_ms
        {
            return false;
        }
        if self.mode.is_cozy() || !self.tracker.detect_fatigue_at(now) {
            return false;
        }
        self.last_trigger_ms = Some(now);
        info!(
            at = now,
            average_velocity = self.tracker.average_velocity_at(now),
            attention_density = self.tracker.attention_density_ratio_at(now),
            "fatigue detected, requesting cozy mode"
        );
        true
    }
}

/// Adaptive scroll friction controller.
///
/// Cheap to clone: clones share the same state.
///
/// # Example
///
/// ```
/// use pulse_friction::prelude::*;
/// use pulse_kinetics::{KineticTracker, ManualClock};
///
/// struct Page(f64);
///
/// impl ScrollSurface for Page {
///     fn scroll_position(&self) -> f64 { self.0 }
///     fn scroll_by(&mut self, delta: f64) { self.0 += delta; }
/// }
///
/// # fn main() -> Result<(), FrictionError> {
/// let tracker = KineticTracker::with_clock(ManualClock::new(0));
/// let controller = FrictionController::new(
///     FrictionConfig::default(),
///     tracker,
///     Page(0.0),
///     || {},
/// )?;
/// controller.set_mode(Mode::Cozy);
///
/// // 100 px of wheel input becomes a 30 px scroll
/// let outcome = controller.handle(&InputEvent::Wheel { delta_y: 100.0 });
/// assert!(outcome.default_prevented());
/// let position = controller.with_surface(|page| page.0).unwrap_or_default();
/// assert!((position - 30.0).abs() < 1e-9);
/// # Ok(())
/// # }
/// ```
pub struct FrictionController<S, C: Clock = SystemClock> {
    core: Rc<RefCell<ControllerCore<S, C>>>,
    on_fatigue: Rc<RefCell<ModeSwitch>>,
}

impl<S, C: Clock> Clone for FrictionController<S, C> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
            on_fatigue: Rc::clone(&self.on_fatigue),
        }
    }
}

impl<S, C> FrictionController<S, C>
where
    S: ScrollSurface + 'static,
    C: Clock + 'static,
{
    /// Create a controller in normal mode.
    ///
    /// `on_fatigue` is the mode-switch capability, invoked when fatigue is
    /// detected outside cozy mode and the cooldown has elapsed.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new<F>(
        config: FrictionConfig,
        tracker: KineticTracker<C>,
        surface: S,
        on_fatigue: F,
    ) -> FrictionResult<Self>
    where
        F: FnMut() + 'static,
    {
        config.validate()?;
        let on_fatigue: ModeSwitch = Box::new(on_fatigue);
        Ok(Self {
            core: Rc::new(RefCell::new(ControllerCore {
                config,
                tracker,
                surface,
                mode: Mode::Normal,
                gesture: None,
                last_trigger_ms: None,
            })),
            on_fatigue: Rc::new(RefCell::new(on_fatigue)),
        })
    }

    /// Create a controller with its own tracker built from `policy`.
    ///
    /// # Errors
    ///
    /// Returns an error if either the configuration or the policy is invalid.
    pub fn with_policy<F>(
        config: FrictionConfig,
        policy: FatiguePolicy,
        clock: C,
        surface: S,
        on_fatigue: F,
    ) -> FrictionResult<Self>
    where
        F: FnMut() + 'static,
    {
        let tracker = KineticTracker::with_policy(policy, clock)?;
        Self::new(config, tracker, surface, on_fatigue)
    }

    /// Route an event to its handler.
    pub fn handle(&self, event: &InputEvent) -> Disposition {
        match event {
            InputEvent::Scroll { position } => self.handle_scroll(*position),
            InputEvent::Wheel { delta_y } => self.handle_wheel(*delta_y),
            InputEvent::TouchStart { touches, y, target } => {
                self.handle_touch_start(*touches, *y, *target)
            }
            InputEvent::TouchMove { touches, y } => self.handle_touch_move(*touches, *y),
            InputEvent::TouchEnd | InputEvent::TouchCancel => self.handle_touch_end(),
            InputEvent::DwellStart {
                element_id,
                timestamp,
            } => self.handle_dwell_start(element_id, *timestamp),
            InputEvent::DwellEnd { timestamp, .. } => self.handle_dwell_end(*timestamp),
        }
    }

    /// The scroll position changed. Recorded in every mode.
    pub fn handle_scroll(&self, position: f64) -> Disposition {
        self.with_core(|core| {
            core.tracker.record_scroll(position);
            Disposition::PassThrough
        })
    }

    /// A wheel tick. Damped in cozy mode, otherwise recorded and passed
    /// through.
    pub fn handle_wheel(&self, delta_y: f64) -> Disposition {
        self.with_core(|core| core.on_wheel(delta_y))
    }

    /// A touch began. Opens a gesture context in cozy mode for single-finger
    /// touches; any other touch start discards the current context.
    pub fn handle_touch_start(&self, touches: u32, y: f64, target: TouchTarget) -> Disposition {
        self.with_core(|core| core.on_touch_start(touches, y, target))
    }

    /// A touch moved. Damped once the gesture is an active scroll.
    pub fn handle_touch_move(&self, touches: u32, y: f64) -> Disposition {
        self.with_core(|core| core.on_touch_move(touches, y))
    }

    /// The touch ended or was cancelled. Discards the gesture context.
    pub fn handle_touch_end(&self) -> Disposition {
        self.with_core(|core| {
            core.gesture = None;
            Disposition::PassThrough
        })
    }

    /// An element became focused in the viewport at `timestamp`.
    pub fn handle_dwell_start(&self, element_id: &str, timestamp: u64) -> Disposition {
        self.with_core(|core| {
            core.tracker.start_dwell_at(element_id, timestamp);
            Disposition::PassThrough
        })
    }

    /// The focused element left the viewport at `timestamp`.
    pub fn handle_dwell_end(&self, timestamp: u64) -> Disposition {
        self.with_core(|core| {
            core.tracker.end_dwell_at(timestamp);
            Disposition::PassThrough
        })
    }

    fn with_core(&self, f: impl FnOnce(&mut ControllerCore<S, C>) -> Disposition) -> Disposition {
        match self.core.try_borrow_mut() {
            Ok(mut core) => f(&mut core),
            Err(_) => {
                trace!("friction controller busy, event passed through");
                Disposition::PassThrough
            }
        }
    }

    /// Run the periodic fatigue check at the tracker's current time.
    ///
    /// Returns whether the mode-switch callback was invoked.
    pub fn check_fatigue(&self) -> bool {
        let now = self
            .core
            .try_borrow()
            .map_or(0, |core| core.tracker.now_ms());
        self.check_fatigue_at(now)
    }

    /// Run the periodic fatigue check at `now`.
    ///
    /// Fires when the cooldown has elapsed since the previous trigger (or
    /// there was none), the feed is not already cozy, and the tracker reports
    /// fatigue.
    pub fn check_fatigue_at(&self, now: u64) -> bool {
        let triggered = match self.core.try_borrow_mut() {
            Ok(mut core) => core.should_trigger(now),
            Err(_) => false,
        };
        if triggered {
            match self.on_fatigue.try_borrow_mut() {
                Ok(mut switch) => (&mut *switch)(),
                Err(_) => trace!("mode switch already running"),
            }
        }
        triggered
    }

    /// Register every event handler and the fatigue timer on `hub`.
    ///
    /// The hub only schedules the check: each firing runs
    /// [`check_fatigue`](Self::check_fatigue), which evaluates the window at
    /// the tracker's clock. The hub's timer clock may use any time base.
    ///
    /// The returned session releases all of them on teardown or drop.
    pub fn activate(&self, hub: &EventHub) -> FrictionSession {
        let subscriptions = EventKind::ALL
            .into_iter()
            .map(|kind| {
                let controller = self.clone();
                hub.subscribe(kind, move |event| controller.handle(event))
            })
            .collect();

        let period = self.config().fatigue_check_interval_ms;
        let controller = self.clone();
        let timer = hub.set_interval(period, move |_| {
            controller.check_fatigue();
        });

        debug!(
            listeners = EventKind::ALL.len(),
            period_ms = period,
            "friction session activated"
        );
        FrictionSession::new(subscriptions, timer)
    }
}

impl<S, C: Clock> FrictionController<S, C> {
    /// Current presentation mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.core.try_borrow().map_or(Mode::Normal, |core| core.mode)
    }

    /// Report the presentation mode chosen by the owner.
    ///
    /// Leaving cozy mode discards any gesture context.
    pub fn set_mode(&self, mode: Mode) {
        if let Ok(mut core) = self.core.try_borrow_mut() {
            if core.mode != mode {
                debug!(from = %core.mode, to = %mode, "mode changed");
            }
            core.mode = mode;
            if !mode.is_cozy() {
                core.gesture = None;
            }
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> FrictionConfig {
        self.core
            .try_borrow()
            .map_or_else(|_| FrictionConfig::default(), |core| core.config.clone())
    }

    /// Time of the most recent automatic mode switch.
    #[must_use]
    pub fn last_trigger_ms(&self) -> Option<u64> {
        self.core.try_borrow().ok().and_then(|core| core.last_trigger_ms)
    }

    /// Whether a touch gesture context is open.
    #[must_use]
    pub fn has_gesture(&self) -> bool {
        self.core
            .try_borrow()
            .is_ok_and(|core| core.gesture.is_some())
    }

    /// Read the tracker. `None` while the controller is handling an event.
    pub fn with_tracker<R>(&self, f: impl FnOnce(&KineticTracker<C>) -> R) -> Option<R> {
        self.core.try_borrow().ok().map(|core| f(&core.tracker))
    }

    /// Mutate the tracker, e.g. to reset it. `None` while the controller is
    /// handling an event.
    pub fn with_tracker_mut<R>(&self, f: impl FnOnce(&mut KineticTracker<C>) -> R) -> Option<R> {
        self.core.try_borrow_mut().ok().map(|mut core| f(&mut core.tracker))
    }

    /// Read the scroll surface. `None` while the controller is handling an
    /// event.
    pub fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> Option<R> {
        self.core.try_borrow().ok().map(|core| f(&core.surface))
    }
}

impl<S, C: Clock> fmt::Debug for FrictionController<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("FrictionController");
        if let Ok(core) = self.core.try_borrow() {
            s.field("mode", &core.mode)
                .field("config", &core.config)
                .field("frames", &core.tracker.frame_count())
                .field("gesture", &core.gesture)
                .field("last_trigger_ms", &core.last_trigger_ms);
        }
        s.finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FrictionError;
    use pulse_kinetics::ManualClock;
    use std::cell::Cell;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[derive(Debug, Default)]
    struct TestSurface {
        position: f64,
        scrolls: Vec<f64>,
    }

    impl ScrollSurface for TestSurface {
        fn scroll_position(&self) -> f64 {
            self.position
        }

        fn scroll_by(&mut self, delta: f64) {
            self.position += delta;
            self.scrolls.push(delta);
        }
    }

    struct Fixture {
        controller: FrictionController<TestSurface, ManualClock>,
        clock: ManualClock,
        switches: Rc<Cell<u32>>,
    }

    fn fixture() -> Result<Fixture, FrictionError> {
        let clock = ManualClock::new(0);
        let switches = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&switches);
        let controller = FrictionController::new(
            FrictionConfig::default(),
            KineticTracker::with_clock(clock.clone()),
            TestSurface::default(),
            move || counter.set(counter.get() + 1),
        )?;
        Ok(Fixture {
            controller,
            clock,
            switches,
        })
    }

    /// Ten scroll samples at 1800 px/s, ending at t = 1000.
    fn scroll_fast(fx: &Fixture) {
        for step in 1..=10u64 {
            fx.clock.set(step * 100);
            fx.controller.handle_scroll(step as f64 * 180.0);
        }
    }

    fn scrolls(fx: &Fixture) -> Vec<f64> {
        fx.controller
            .with_surface(|s| s.scrolls.clone())
            .unwrap_or_default()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = FrictionController::new(
            FrictionConfig {
                fatigue_check_interval_ms: 0,
                ..FrictionConfig::default()
            },
            KineticTracker::with_clock(ManualClock::new(0)),
            TestSurface::default(),
            || {},
        );
        assert!(matches!(result, Err(FrictionError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_with_policy_rejects_invalid_policy() {
        let policy = FatiguePolicy {
            window_ms: 0,
            ..FatiguePolicy::default()
        };
        let result = FrictionController::with_policy(
            FrictionConfig::default(),
            policy,
            ManualClock::new(0),
            TestSurface::default(),
            || {},
        );
        assert!(matches!(result, Err(FrictionError::Kinetics(_))));
    }

    #[test]
    fn test_scroll_recorded_in_any_mode() -> TestResult {
        let fx = fixture()?;
        fx.clock.set(100);
        assert_eq!(fx.controller.handle_scroll(150.0), Disposition::PassThrough);

        fx.controller.set_mode(Mode::Cozy);
        fx.clock.set(200);
        fx.controller.handle_scroll(300.0);

        assert_eq!(fx.controller.with_tracker(|t| t.frame_count()), Some(2));
        Ok(())
    }

    #[test]
    fn test_wheel_normal_mode_passes_through() -> TestResult {
        let fx = fixture()?;
        fx.clock.set(100);
        let outcome = fx.controller.handle_wheel(100.0);

        assert_eq!(outcome, Disposition::PassThrough);
        assert!(scrolls(&fx).is_empty());
        assert_eq!(fx.controller.with_tracker(|t| t.frame_count()), Some(1));
        Ok(())
    }

    #[test]
    fn test_wheel_cozy_mode_damps() -> TestResult {
        let fx = fixture()?;
        fx.controller.set_mode(Mode::Cozy);

        fx.clock.set(100);
        assert_eq!(fx.controller.handle_wheel(10.0), Disposition::Suppressed);
        assert!(scrolls(&fx).is_empty());

        let outcome = fx.controller.handle_wheel(100.0);
        let Disposition::Applied { delta } = outcome else {
            return Err(format!("expected applied scroll, got {outcome:?}").into());
        };
        assert!((delta - 30.0).abs() < 1e-9);
        assert_eq!(scrolls(&fx).len(), 1);

        let position = fx.controller.with_surface(|s| s.position).unwrap_or_default();
        assert!((position - 30.0).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_wheel_cozy_mode_fatigued_multiplier() -> TestResult {
        let fx = fixture()?;
        scroll_fast(&fx);
        fx.controller.set_mode(Mode::Cozy);
        assert_eq!(
            fx.controller.with_tracker(|t| t.detect_fatigue()),
            Some(true)
        );

        let outcome = fx.controller.handle_wheel(100.0);
        let Disposition::Applied { delta } = outcome else {
            return Err(format!("expected applied scroll, got {outcome:?}").into());
        };
        assert!((delta - 45.0).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_touch_on_button_never_scrolls() -> TestResult {
        let fx = fixture()?;
        fx.controller.set_mode(Mode::Cozy);

        fx.controller
            .handle_touch_start(1, 600.0, TouchTarget::Button);
        for y in [580.0, 500.0, 300.0, 100.0] {
            assert_eq!(
                fx.controller.handle_touch_move(1, y),
                Disposition::PassThrough
            );
        }
        assert!(scrolls(&fx).is_empty());
        Ok(())
    }

    #[test]
    fn test_touch_scroll_after_threshold() -> TestResult {
        let fx = fixture()?;
        fx.controller.set_mode(Mode::Cozy);

        fx.controller
            .handle_touch_start(1, 600.0, TouchTarget::Content);
        assert!(fx.controller.has_gesture());

        // 5 px of travel stays a tap
        assert_eq!(
            fx.controller.handle_touch_move(1, 595.0),
            Disposition::PassThrough
        );

        // 95 px since the last move: 28.5 px damped
        let outcome = fx.controller.handle_touch_move(1, 500.0);
        let Disposition::Applied { delta } = outcome else {
            return Err(format!("expected applied scroll, got {outcome:?}").into());
        };
        assert!((delta - 28.5).abs() < 1e-9);

        // 10 px move damps to 3 px: suppressed but still prevented
        assert_eq!(
            fx.controller.handle_touch_move(1, 490.0),
            Disposition::Suppressed
        );

        fx.controller.handle_touch_end();
        assert!(!fx.controller.has_gesture());
        assert_eq!(
            fx.controller.handle_touch_move(1, 300.0),
            Disposition::PassThrough
        );
        Ok(())
    }

    #[test]
    fn test_touch_ignored_outside_cozy_mode() -> TestResult {
        let fx = fixture()?;
        fx.controller
            .handle_touch_start(1, 600.0, TouchTarget::Content);
        assert!(!fx.controller.has_gesture());
        assert_eq!(
            fx.controller.handle_touch_move(1, 300.0),
            Disposition::PassThrough
        );
        Ok(())
    }

    #[test]
    fn test_multi_touch_discards_gesture() -> TestResult {
        let fx = fixture()?;
        fx.controller.set_mode(Mode::Cozy);
        fx.controller
            .handle_touch_start(1, 600.0, TouchTarget::Content);
        fx.controller
            .handle_touch_start(2, 600.0, TouchTarget::Content);
        assert!(!fx.controller.has_gesture());
        assert_eq!(
            fx.controller.handle_touch_move(2, 300.0),
            Disposition::PassThrough
        );
        Ok(())
    }

    #[test]
    fn test_leaving_cozy_mode_discards_gesture() -> TestResult {
        let fx = fixture()?;
        fx.controller.set_mode(Mode::Cozy);
        fx.controller
            .handle_touch_start(1, 600.0, TouchTarget::Content);
        fx.controller.set_mode(Mode::Normal);
        assert!(!fx.controller.has_gesture());
        Ok(())
    }

    #[test]
    fn test_dwell_events_forwarded() -> TestResult {
        let fx = fixture()?;
        fx.controller.handle(&InputEvent::DwellStart {
            element_id: "post-1".to_string(),
            timestamp: 100,
        });
        fx.controller.handle(&InputEvent::DwellEnd {
            element_id: "post-1".to_string(),
            duration: 9_999,
            timestamp: 400,
        });

        let durations = fx
            .controller
            .with_tracker(|t| t.dwell_history().iter().map(|d| d.duration).collect::<Vec<_>>())
            .unwrap_or_default();
        assert_eq!(durations, vec![300]);
        Ok(())
    }

    #[test]
    fn test_fatigue_check_triggers_once_per_cooldown() -> TestResult {
        let fx = fixture()?;
        scroll_fast(&fx);

        assert!(fx.controller.check_fatigue_at(1_000));
        assert_eq!(fx.switches.get(), 1);
        assert_eq!(fx.controller.last_trigger_ms(), Some(1_000));

        // still fatigued and still normal, but inside the cooldown
        assert!(!fx.controller.check_fatigue_at(1_500));
        assert_eq!(fx.switches.get(), 1);
        Ok(())
    }

    #[test]
    fn test_fatigue_check_skipped_in_cozy_mode() -> TestResult {
        let fx = fixture()?;
        scroll_fast(&fx);
        fx.controller.set_mode(Mode::Cozy);

        assert!(!fx.controller.check_fatigue_at(1_000));
        assert_eq!(fx.switches.get(), 0);
        assert_eq!(fx.controller.last_trigger_ms(), None);
        Ok(())
    }

    #[test]
    fn test_fatigue_check_without_fatigue() -> TestResult {
        let fx = fixture()?;
        fx.clock.set(1_000);
        assert!(!fx.controller.check_fatigue());
        assert_eq!(fx.switches.get(), 0);
        Ok(())
    }

    #[test]
    fn test_timer_check_uses_tracker_clock() -> TestResult {
        // tracker on epoch-scale time, hub counting from zero
        let origin = 1_700_000_000_000;
        let clock = ManualClock::new(origin);
        let switches = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&switches);
        let controller = FrictionController::new(
            FrictionConfig::default(),
            KineticTracker::with_clock(clock.clone()),
            TestSurface::default(),
            move || counter.set(counter.get() + 1),
        )?;
        let hub = EventHub::new();
        let _session = controller.activate(&hub);

        for step in 1..=10u64 {
            clock.set(origin + step * 100);
            controller.handle_scroll(step as f64 * 180.0);
            hub.advance_to(step * 100);
        }
        assert_eq!(switches.get(), 1);
        assert_eq!(controller.last_trigger_ms(), Some(origin + 1_000));
        Ok(())
    }

    #[test]
    fn test_mode_switch_may_call_back_into_controller() -> TestResult {
        let clock = ManualClock::new(0);
        let slot: Rc<RefCell<Option<FrictionController<TestSurface, ManualClock>>>> =
            Rc::new(RefCell::new(None));
        let inner = Rc::clone(&slot);
        let controller = FrictionController::new(
            FrictionConfig::default(),
            KineticTracker::with_clock(clock.clone()),
            TestSurface::default(),
            move || {
                if let Some(controller) = inner.borrow().as_ref() {
                    controller.set_mode(Mode::Cozy);
                }
            },
        )?;
        *slot.borrow_mut() = Some(controller.clone());

        for step in 1..=10u64 {
            clock.set(step * 100);
            controller.handle_scroll(step as f64 * 180.0);
        }
        assert!(controller.check_fatigue());
        assert_eq!(controller.mode(), Mode::Cozy);

        // break the Rc cycle
        slot.borrow_mut().take();
        Ok(())
    }
}
