//! Scroll-triggered `visible` toggling for decorative page elements, plus a
//! frame-throttled scroll direction flag.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::host::{Host, ObserveOptions, CLASS_VISIBLE};
use crate::ids::{ElementId, FrameHandle};

pub const DECOR_ROOT_MARGIN: &str = "0px 0px -50px 0px";
pub const DECOR_THRESHOLD: f64 = 0.1;

pub fn decor_observe_options() -> ObserveOptions {
    ObserveOptions {
        root_margin: DECOR_ROOT_MARGIN.to_string(),
        threshold: DECOR_THRESHOLD,
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Tracks a fixed set of elements. Each toggles independently.
#[derive(Debug, Default)]
pub struct VisibilityManager {
    elements: Vec<ElementId>,
    last_scroll_y: f64,
    pending_scroll_y: f64,
    pending_frame: Option<FrameHandle>,
    direction: Option<ScrollDirection>,
}

impl VisibilityManager {
    /// Observe every element matching `selector`. An empty match is fine.
    pub fn attach(selector: &str, initial_scroll_y: f64, host: &mut dyn Host) -> Self {
        let elements = host.query_all(selector);
        let options = decor_observe_options();
        for el in &elements {
            host.observe(*el, &options);
        }
        debug!("visibility: observing {} element(s) for {selector:?}", elements.len());
        Self {
            elements,
            last_scroll_y: initial_scroll_y,
            pending_scroll_y: initial_scroll_y,
            pending_frame: None,
            direction: None,
        }
    }

    pub fn elements(&self) -> &[ElementId] {
        &self.elements
    }

    /// Direction of the most recent non-zero scroll delta, if any.
    pub fn scroll_direction(&self) -> Option<ScrollDirection> {
        self.direction
    }

    /// Intersection callback for one tracked element. Unknown elements are ignored.
    pub fn on_intersection(&mut self, el: ElementId, entered: bool, host: &mut dyn Host) {
        if !self.elements.contains(&el) {
            return;
        }
        if entered {
            host.add_class(el, CLASS_VISIBLE);
        } else {
            host.remove_class(el, CLASS_VISIBLE);
        }
    }

    /// Record a scroll position. Evaluation is deferred to the next frame and
    /// coalesced: at most one frame request is outstanding.
    pub fn on_scroll(&mut self, scroll_y: f64, host: &mut dyn Host) {
        self.pending_scroll_y = scroll_y;
        if self.pending_frame.is_none() {
            self.pending_frame = Some(host.request_frame());
        }
    }

    /// Frame callback. Returns true if `handle` was this manager's request.
    pub fn on_frame(&mut self, handle: FrameHandle) -> bool {
        if self.pending_frame != Some(handle) {
            return false;
        }
        self.pending_frame = None;
        let y = self.pending_scroll_y;
        if y > self.last_scroll_y {
            self.direction = Some(ScrollDirection::Down);
        } else if y < self.last_scroll_y {
            self.direction = Some(ScrollDirection::Up);
        }
        self.last_scroll_y = y;
        true
    }

    pub fn detach(&mut self, host: &mut dyn Host) {
        if let Some(frame) = self.pending_frame.take() {
            host.cancel_frame(frame);
        }
        for el in self.elements.drain(..) {
            host.unobserve(el);
        }
    }
}
