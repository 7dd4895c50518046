//! Fire-and-forget class toggles (`waving`, `bouncing`).

use crate::host::Host;
use crate::ids::{ElementId, TimerHandle};

/// A class that is switched on by `trigger` and off again after `duration_ms`.
/// Re-triggering while active restarts the timer; the removal happens once.
#[derive(Debug)]
pub struct ClassPulse {
    class: &'static str,
    duration_ms: f64,
    pending: Option<TimerHandle>,
}

impl ClassPulse {
    pub fn new(class: &'static str, duration_ms: f64) -> Self {
        Self {
            class,
            duration_ms,
            pending: None,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.pending.is_some()
    }

    pub fn trigger(&mut self, el: ElementId, host: &mut dyn Host) {
        if let Some(prev) = self.pending.take() {
            host.clear_timeout(prev);
        }
        host.add_class(el, self.class);
        self.pending = Some(host.set_timeout(self.duration_ms));
    }

    /// Returns true if `handle` belonged to this pulse.
    pub fn on_timer(&mut self, el: ElementId, handle: TimerHandle, host: &mut dyn Host) -> bool {
        if self.pending != Some(handle) {
            return false;
        }
        self.pending = None;
        host.remove_class(el, self.class);
        true
    }

    /// Drop the pending removal and take the class off now if it was on.
    pub fn cancel(&mut self, el: ElementId, host: &mut dyn Host) {
        if let Some(prev) = self.pending.take() {
            host.clear_timeout(prev);
            host.remove_class(el, self.class);
        }
    }
}
