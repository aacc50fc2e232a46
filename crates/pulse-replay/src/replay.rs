//! Drives a recorded trace through a live friction session.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use pulse_friction::{Disposition, EventHub, FrictionController, InputEvent, Mode, ScrollSurface};
use pulse_kinetics::{Clock, KineticSnapshot, ManualClock};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ReplayError;
use crate::settings::ReplaySettings;
use crate::trace::{TraceAction, TraceRecord};

/// Scroll surface standing in for the page during a replay.
#[derive(Debug, Clone, Default)]
pub struct SimulatedSurface {
    position: Rc<Cell<f64>>,
}

impl SimulatedSurface {
    pub fn position(&self) -> f64 {
        self.position.get()
    }

    /// Move as the platform would on its own.
    fn scroll_native(&self, delta: f64) {
        self.position.set(self.position.get() + delta);
    }

    fn jump_to(&self, position: f64) {
        self.position.set(position);
    }
}

impl ScrollSurface for SimulatedSurface {
    fn scroll_position(&self) -> f64 {
        self.position.get()
    }

    fn scroll_by(&mut self, delta: f64) {
        self.scroll_native(delta);
    }
}

/// Outcome of a replay.
#[derive(Debug, Clone, Serialize)]
pub struct ReplaySummary {
    pub records: usize,
    pub duration_ms: u64,
    pub events: BTreeMap<&'static str, usize>,
    pub applied: usize,
    pub suppressed: usize,
    pub passed_through: usize,
    /// Sum of damped displacements issued to the surface (px)
    pub damped_distance: f64,
    /// Times at which the controller requested cozy mode
    pub mode_requests: Vec<u64>,
    pub final_mode: Mode,
    pub final_position: f64,
    pub kinetics: Option<KineticSnapshot>,
}

#[derive(Debug, Default)]
struct Tally {
    events: BTreeMap<&'static str, usize>,
    applied: usize,
    suppressed: usize,
    passed_through: usize,
    damped_distance: f64,
}

impl Tally {
    fn record(&mut self, event: &InputEvent, outcome: Disposition) {
        let count = self.events.entry(event.kind().as_str()).or_default();
        *count = count.saturating_add(1);
        match outcome {
            Disposition::PassThrough => self.passed_through = self.passed_through.saturating_add(1),
            Disposition::Suppressed => self.suppressed = self.suppressed.saturating_add(1),
            Disposition::Applied { delta } => {
                self.applied = self.applied.saturating_add(1);
                self.damped_distance += delta.abs();
            }
        }
    }
}

/// Replay `records` with `settings`.
pub fn run(records: &[TraceRecord], settings: &ReplaySettings) -> Result<ReplaySummary, ReplayError> {
    settings.validate()?;

    let start = records.first().map_or(0, |r| r.at);
    let end = records.last().map_or(start, |r| r.at);

    let clock = ManualClock::new(start);
    let surface = SimulatedSurface::default();
    let requests: Rc<RefCell<Vec<u64>>> = Rc::new(RefCell::new(Vec::new()));

    let request_sink = Rc::clone(&requests);
    let request_clock = clock.clone();
    let controller = FrictionController::with_policy(
        settings.friction.clone(),
        settings.policy.clone(),
        clock.clone(),
        surface.clone(),
        move || request_sink.borrow_mut().push(request_clock.now_ms()),
    )?;
    controller.set_mode(settings.initial_mode);

    let hub = EventHub::starting_at(start);
    let session = controller.activate(&hub);
    let mut tally = Tally::default();
    let mut followed = 0usize;

    for record in records {
        clock.set(record.at);
        hub.advance_to(record.at);
        followed = follow_requests(&controller, &requests, followed, settings);

        match &record.action {
            TraceAction::Event(event) => {
                if let InputEvent::Scroll { position } = event {
                    surface.jump_to(*position);
                }
                let outcome = hub.dispatch(event);
                if let (InputEvent::Wheel { delta_y }, Disposition::PassThrough) = (event, outcome)
                {
                    surface.scroll_native(*delta_y);
                }
                tally.record(event, outcome);
            }
            TraceAction::SetMode(mode) => {
                debug!(at = record.at, %mode, "trace sets mode");
                controller.set_mode(*mode);
            }
        }
    }

    let kinetics = controller.with_tracker(|t| t.snapshot_at(end));
    session.teardown();

    let mode_requests = requests.borrow().clone();
    info!(
        records = records.len(),
        requests = mode_requests.len(),
        "replay finished"
    );

    Ok(ReplaySummary {
        records: records.len(),
        duration_ms: end.saturating_sub(start),
        events: tally.events,
        applied: tally.applied,
        suppressed: tally.suppressed,
        passed_through: tally.passed_through,
        damped_distance: tally.damped_distance,
        mode_requests,
        final_mode: controller.mode(),
        final_position: surface.position(),
        kinetics,
    })
}

/// Apply mode requests the owner has not reacted to yet.
fn follow_requests<S, C>(
    controller: &FrictionController<S, C>,
    requests: &RefCell<Vec<u64>>,
    followed: usize,
    settings: &ReplaySettings,
) -> usize
where
    C: Clock,
{
    let pending = requests.borrow().len();
    if settings.follow_requests && pending > followed {
        controller.set_mode(Mode::Cozy);
    }
    pending
}
