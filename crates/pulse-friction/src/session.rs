//! Activation lifecycle of a friction controller.

use tracing::debug;

use crate::hub::{IntervalTimer, Subscription};

/// Every registration made by [`FrictionController::activate`](crate::FrictionController::activate).
///
/// Tearing down (explicitly or by drop) releases all listeners and the
/// fatigue timer. Activating a controller twice without tearing down the
/// first session would apply friction twice per event.
#[derive(Debug)]
#[must_use = "dropping a FrictionSession immediately deactivates the controller"]
pub struct FrictionSession {
    subscriptions: Vec<Subscription>,
    timer: Option<IntervalTimer>,
}

impl FrictionSession {
    pub(crate) fn new(subscriptions: Vec<Subscription>, timer: IntervalTimer) -> Self {
        Self {
            subscriptions,
            timer: Some(timer),
        }
    }

    /// Release every registration.
    pub fn teardown(mut self) {
        self.release();
    }

    /// Whether any registration is still held.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.subscriptions.is_empty() || self.timer.is_some()
    }

    /// Number of held event subscriptions.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    fn release(&mut self) {
        if !self.is_active() {
            return;
        }
        let listeners = self.subscriptions.len();
        self.subscriptions.drain(..).for_each(Subscription::cancel);
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
        debug!(listeners, "friction session torn down");
    }
}

impl Drop for FrictionSession {
    fn drop(&mut self) {
        self.release();
    }
}
