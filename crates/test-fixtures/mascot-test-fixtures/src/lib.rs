//! In-memory host with a manual clock.
//!
//! `FakeHost` implements every capability trait from `mascot_motion_core::host`
//! and records each effect in order. Time only moves when a test says so;
//! timeouts and frames are delivered through the `run_*` helpers, which hand
//! the host back to a callback so the component under test can be re-entered.

use std::collections::BTreeSet;

use hashbrown::HashMap;
use mascot_motion_core::{
    ElementId, FrameHandle, FrameScheduler, ObserveOptions, Rect, Stage, TimerHandle, TimerQueue,
    ViewportObserver,
};

/// One recorded host call.
#[derive(Clone, Debug, PartialEq)]
pub enum HostOp {
    AddClass(ElementId, String),
    RemoveClass(ElementId, String),
    SetStyle(ElementId, String, String),
    RequestFrame(FrameHandle),
    CancelFrame(FrameHandle),
    SetTimeout(TimerHandle, f64),
    ClearTimeout(TimerHandle),
    Observe(ElementId, ObserveOptions),
    Unobserve(ElementId),
}

impl HostOp {
    /// True for calls that change what is on screen or what is scheduled.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, HostOp::Observe(..) | HostOp::Unobserve(..))
    }
}

#[derive(Debug, Default)]
pub struct FakeHost {
    now: f64,
    next_element: u32,
    next_frame: u32,
    next_timer: u32,
    selectors: HashMap<String, Vec<ElementId>>,
    rects: HashMap<ElementId, Rect>,
    classes: HashMap<ElementId, BTreeSet<String>>,
    styles: HashMap<(ElementId, String), String>,
    frames: Vec<FrameHandle>,
    timers: Vec<(TimerHandle, f64)>,
    observed: HashMap<ElementId, ObserveOptions>,
    ops: Vec<HostOp>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an element reachable through `selector`.
    pub fn add_element(&mut self, selector: &str, rect: Rect) -> ElementId {
        let el = ElementId(self.next_element);
        self.next_element += 1;
        self.selectors
            .entry(selector.to_string())
            .or_default()
            .push(el);
        self.rects.insert(el, rect);
        el
    }

    /// Move an element, as a layout change on resize would.
    pub fn set_rect(&mut self, el: ElementId, rect: Rect) {
        self.rects.insert(el, rect);
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.classes.get(&el).is_some_and(|c| c.contains(class))
    }

    pub fn style(&self, el: ElementId, property: &str) -> Option<&str> {
        self.styles
            .get(&(el, property.to_string()))
            .map(String::as_str)
    }

    pub fn is_observed(&self, el: ElementId) -> bool {
        self.observed.contains_key(&el)
    }

    pub fn observe_options(&self, el: ElementId) -> Option<&ObserveOptions> {
        self.observed.get(&el)
    }

    pub fn ops(&self) -> &[HostOp] {
        &self.ops
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Deliver every timeout due at or before `until`, in due order, advancing
    /// the clock to each due time. Timeouts scheduled by callbacks are picked
    /// up in the same sweep. The clock ends at `until`.
    pub fn run_timers_until<F>(&mut self, until: f64, mut on_timer: F)
    where
        F: FnMut(&mut FakeHost, TimerHandle, f64),
    {
        loop {
            let next = self
                .timers
                .iter()
                .enumerate()
                .filter(|(_, (_, due))| *due <= until)
                .min_by(|a, b| a.1 .1.total_cmp(&b.1 .1))
                .map(|(i, _)| i);
            let Some(idx) = next else {
                break;
            };
            let (handle, due) = self.timers.remove(idx);
            self.now = self.now.max(due);
            on_timer(self, handle, due);
        }
        self.now = self.now.max(until);
    }

    /// Deliver one rendered frame at `at`: every frame requested before this call
    /// fires once. Requests made by the callbacks wait for the next frame.
    pub fn run_frame<F>(&mut self, at: f64, mut on_frame: F)
    where
        F: FnMut(&mut FakeHost, FrameHandle, f64),
    {
        self.now = self.now.max(at);
        let due = std::mem::take(&mut self.frames);
        for handle in due {
            on_frame(self, handle, at);
        }
    }
}

impl Stage for FakeHost {
    fn query_one(&mut self, selector: &str) -> Option<ElementId> {
        self.selectors
            .get(selector)
            .and_then(|els| els.first().copied())
    }

    fn query_all(&mut self, selector: &str) -> Vec<ElementId> {
        self.selectors.get(selector).cloned().unwrap_or_default()
    }

    fn add_class(&mut self, el: ElementId, class: &str) {
        self.classes
            .entry(el)
            .or_default()
            .insert(class.to_string());
        self.ops.push(HostOp::AddClass(el, class.to_string()));
    }

    fn remove_class(&mut self, el: ElementId, class: &str) {
        if let Some(c) = self.classes.get_mut(&el) {
            c.remove(class);
        }
        self.ops.push(HostOp::RemoveClass(el, class.to_string()));
    }

    fn set_style(&mut self, el: ElementId, property: &str, value: &str) {
        self.styles
            .insert((el, property.to_string()), value.to_string());
        self.ops.push(HostOp::SetStyle(
            el,
            property.to_string(),
            value.to_string(),
        ));
    }

    fn bounding_rect(&mut self, el: ElementId) -> Rect {
        self.rects.get(&el).copied().unwrap_or_default()
    }
}

impl FrameScheduler for FakeHost {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_frame);
        self.next_frame += 1;
        self.frames.push(handle);
        self.ops.push(HostOp::RequestFrame(handle));
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.frames.retain(|h| *h != handle);
        self.ops.push(HostOp::CancelFrame(handle));
    }
}

impl TimerQueue for FakeHost {
    fn set_timeout(&mut self, delay_ms: f64) -> TimerHandle {
        let handle = TimerHandle(self.next_timer);
        self.next_timer += 1;
        self.timers.push((handle, self.now + delay_ms));
        self.ops.push(HostOp::SetTimeout(handle, delay_ms));
        handle
    }

    fn clear_timeout(&mut self, handle: TimerHandle) {
        self.timers.retain(|(h, _)| *h != handle);
        self.ops.push(HostOp::ClearTimeout(handle));
    }
}

impl ViewportObserver for FakeHost {
    fn observe(&mut self, el: ElementId, options: &ObserveOptions) {
        self.observed.insert(el, options.clone());
        self.ops.push(HostOp::Observe(el, options.clone()));
    }

    fn unobserve(&mut self, el: ElementId) {
        self.observed.remove(&el);
        self.ops.push(HostOp::Unobserve(el));
    }
}
