//! Capability traits the host environment provides.
//!
//! Adapters (wasm/browser, or the in-memory fixture host used by tests)
//! implement these and pass `&mut dyn Host` into every component callback.
//! Callbacks flow the other way: when a frame, timeout, or intersection fires,
//! the adapter calls back into the component with the handle it was given.

use serde::{Deserialize, Serialize};

use crate::ids::{ElementId, FrameHandle, TimerHandle};

/// CSS class toggled while an element is in view.
pub const CLASS_VISIBLE: &str = "visible";
/// CSS class toggled by [`MascotAnimator::wave`](crate::MascotAnimator::wave).
pub const CLASS_WAVING: &str = "waving";
/// CSS class toggled by [`MascotAnimator::bounce`](crate::MascotAnimator::bounce).
pub const CLASS_BOUNCING: &str = "bouncing";
/// CSS class toggled while the pointer hovers the mascot.
pub const CLASS_HOVER: &str = "mascot-hover";

/// Axis-aligned bounding rectangle in viewport pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point {
            x: self.left + self.width / 2.0,
            y: self.top + self.height / 2.0,
        }
    }
}

/// A position in viewport pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Intersection options passed when an element is registered for observation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObserveOptions {
    /// CSS margin applied to the viewport, e.g. `"0px 0px -50px 0px"`.
    pub root_margin: String,
    /// Intersection ratio that counts as "entered".
    pub threshold: f64,
}

/// Element surface: lookup, class toggles, inline style, measurement.
pub trait Stage {
    fn query_one(&mut self, selector: &str) -> Option<ElementId>;
    fn query_all(&mut self, selector: &str) -> Vec<ElementId>;
    fn add_class(&mut self, el: ElementId, class: &str);
    fn remove_class(&mut self, el: ElementId, class: &str);
    fn set_style(&mut self, el: ElementId, property: &str, value: &str);
    fn bounding_rect(&mut self, el: ElementId) -> Rect;
}

/// Per-frame callback scheduling (`requestAnimationFrame` in a browser).
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// One-shot timeouts (`setTimeout` in a browser). Delays are milliseconds.
pub trait TimerQueue {
    fn set_timeout(&mut self, delay_ms: f64) -> TimerHandle;
    fn clear_timeout(&mut self, handle: TimerHandle);
}

/// Boundary-crossing notifier (`IntersectionObserver` in a browser).
pub trait ViewportObserver {
    fn observe(&mut self, el: ElementId, options: &ObserveOptions);
    fn unobserve(&mut self, el: ElementId);
}

/// Everything a component needs from its environment.
pub trait Host: Stage + FrameScheduler + TimerQueue + ViewportObserver {}

impl<T> Host for T where T: Stage + FrameScheduler + TimerQueue + ViewportObserver {}
