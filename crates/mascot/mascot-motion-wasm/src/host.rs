//! Browser implementation of the core host traits.
//!
//! Every scheduled callback (animation frame, timeout, intersection) is a
//! wasm-bindgen `Closure` that forwards a [`HostEvent`] into the sink. The sink
//! routes it back to the owning runtime, which calls into the core.

use std::rc::Rc;

use hashbrown::HashMap;
use log::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, Window,
};

use mascot_motion_core::{
    ElementId, FrameHandle, FrameScheduler, ObserveOptions, Rect, Stage, TimerHandle, TimerQueue,
    ViewportObserver,
};

/// Callbacks from the browser, in core terms where possible.
pub(crate) enum HostEvent {
    Frame(FrameHandle, f64),
    Timer(TimerHandle),
    Intersection(Element, bool),
    PointerMove(f64, f64),
    Hover(bool),
    Scroll(f64),
    Resize,
}

pub(crate) type Sink = Rc<dyn Fn(HostEvent)>;

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

struct Scheduled<F: ?Sized> {
    js_id: i32,
    closure: Closure<F>,
}

struct Observer {
    observer: IntersectionObserver,
    _callback: ObserverCallback,
}

fn observer_key(options: &ObserveOptions) -> String {
    format!("{}|{}", options.root_margin, options.threshold)
}

// Browsers report the crossing ratio a hair under the requested threshold.
const RATIO_SLACK: f64 = 1e-3;

/// Enter/leave decision for one observer entry. `isIntersecting` alone turns
/// true at the first visible pixel, whatever the threshold.
fn crosses_threshold(is_intersecting: bool, ratio: f64, threshold: f64) -> bool {
    is_intersecting && ratio + RATIO_SLACK >= threshold
}

fn clamp_delay(delay_ms: f64) -> i32 {
    delay_ms.round().clamp(0.0, i32::MAX as f64) as i32
}

pub struct WebHost {
    window: Window,
    document: Document,
    sink: Sink,
    elements: Vec<Element>,
    next_frame: u32,
    next_timer: u32,
    frames: HashMap<FrameHandle, Scheduled<dyn FnMut(f64)>>,
    timers: HashMap<TimerHandle, Scheduled<dyn FnMut()>>,
    // Closures of callbacks that already fired. Freed on the next fire, never
    // while they may still be on the stack.
    spent_frames: Vec<Closure<dyn FnMut(f64)>>,
    spent_timers: Vec<Closure<dyn FnMut()>>,
    observers: HashMap<String, Observer>,
    observed: HashMap<ElementId, String>,
}

impl WebHost {
    pub(crate) fn new(window: Window, document: Document, sink: Sink) -> Self {
        Self {
            window,
            document,
            sink,
            elements: Vec::new(),
            next_frame: 0,
            next_timer: 0,
            frames: HashMap::new(),
            timers: HashMap::new(),
            spent_frames: Vec::new(),
            spent_timers: Vec::new(),
            observers: HashMap::new(),
            observed: HashMap::new(),
        }
    }

    pub(crate) fn sink(&self) -> Sink {
        self.sink.clone()
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0 as usize)
    }

    pub fn element_id(&self, el: &Element) -> Option<ElementId> {
        self.elements
            .iter()
            .position(|e| e == el)
            .map(|i| ElementId(i as u32))
    }

    /// Milliseconds on the same clock as animation frame timestamps.
    pub fn now(&self) -> f64 {
        self.window
            .performance()
            .map(|p| p.now())
            .unwrap_or_default()
    }

    pub(crate) fn frame_fired(&mut self, handle: FrameHandle) {
        self.spent_frames.clear();
        if let Some(s) = self.frames.remove(&handle) {
            self.spent_frames.push(s.closure);
        }
    }

    pub(crate) fn timer_fired(&mut self, handle: TimerHandle) {
        self.spent_timers.clear();
        if let Some(s) = self.timers.remove(&handle) {
            self.spent_timers.push(s.closure);
        }
    }

    /// Cancel everything still scheduled and disconnect all observers.
    pub(crate) fn shutdown(&mut self) {
        for (_, s) in self.frames.drain() {
            let _ = self.window.cancel_animation_frame(s.js_id);
        }
        for (_, s) in self.timers.drain() {
            self.window.clear_timeout_with_handle(s.js_id);
        }
        for (_, o) in self.observers.drain() {
            o.observer.disconnect();
        }
        self.observed.clear();
    }

    fn register(&mut self, el: Element) -> ElementId {
        if let Some(id) = self.element_id(&el) {
            return id;
        }
        self.elements.push(el);
        ElementId((self.elements.len() - 1) as u32)
    }

    fn observer_for(&mut self, options: &ObserveOptions) -> Option<&IntersectionObserver> {
        let key = observer_key(options);
        if !self.observers.contains_key(&key) {
            let sink = self.sink.clone();
            let threshold = options.threshold;
            let callback: ObserverCallback = Closure::new(
                move |entries: js_sys::Array, _observer: IntersectionObserver| {
                    for entry in entries.iter() {
                        let entry: IntersectionObserverEntry = entry.unchecked_into();
                        let entered = crosses_threshold(
                            entry.is_intersecting(),
                            entry.intersection_ratio(),
                            threshold,
                        );
                        sink(HostEvent::Intersection(entry.target(), entered));
                    }
                },
            );
            let init = IntersectionObserverInit::new();
            init.set_root_margin(&options.root_margin);
            init.set_threshold(&JsValue::from_f64(options.threshold));
            match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) {
                Ok(observer) => {
                    self.observers.insert(
                        key.clone(),
                        Observer {
                            observer,
                            _callback: callback,
                        },
                    );
                }
                Err(err) => {
                    warn!("IntersectionObserver unavailable: {err:?}");
                    return None;
                }
            }
        }
        self.observers.get(&key).map(|o| &o.observer)
    }
}

impl Drop for WebHost {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Stage for WebHost {
    fn query_one(&mut self, selector: &str) -> Option<ElementId> {
        match self.document.query_selector(selector) {
            Ok(Some(el)) => Some(self.register(el)),
            Ok(None) => None,
            Err(err) => {
                warn!("query_selector({selector:?}) failed: {err:?}");
                None
            }
        }
    }

    fn query_all(&mut self, selector: &str) -> Vec<ElementId> {
        let list = match self.document.query_selector_all(selector) {
            Ok(list) => list,
            Err(err) => {
                warn!("query_selector_all({selector:?}) failed: {err:?}");
                return Vec::new();
            }
        };
        let mut ids = Vec::with_capacity(list.length() as usize);
        for i in 0..list.length() {
            if let Some(el) = list.get(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                ids.push(self.register(el));
            }
        }
        ids
    }

    fn add_class(&mut self, el: ElementId, class: &str) {
        if let Some(e) = self.element(el) {
            if let Err(err) = e.class_list().add_1(class) {
                warn!("add class {class:?}: {err:?}");
            }
        }
    }

    fn remove_class(&mut self, el: ElementId, class: &str) {
        if let Some(e) = self.element(el) {
            if let Err(err) = e.class_list().remove_1(class) {
                warn!("remove class {class:?}: {err:?}");
            }
        }
    }

    fn set_style(&mut self, el: ElementId, property: &str, value: &str) {
        let Some(e) = self.element(el).and_then(|e| e.dyn_ref::<HtmlElement>()) else {
            return;
        };
        if let Err(err) = e.style().set_property(property, value) {
            warn!("set {property}: {err:?}");
        }
    }

    fn bounding_rect(&mut self, el: ElementId) -> Rect {
        self.element(el)
            .map(|e| {
                let r = e.get_bounding_client_rect();
                Rect::new(r.left(), r.top(), r.width(), r.height())
            })
            .unwrap_or_default()
    }
}

impl FrameScheduler for WebHost {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_frame);
        self.next_frame = self.next_frame.wrapping_add(1);
        let sink = self.sink.clone();
        let closure = Closure::<dyn FnMut(f64)>::new(move |ts: f64| {
            sink(HostEvent::Frame(handle, ts));
        });
        match self
            .window
            .request_animation_frame(closure.as_ref().unchecked_ref())
        {
            Ok(js_id) => {
                self.frames.insert(handle, Scheduled { js_id, closure });
            }
            Err(err) => warn!("requestAnimationFrame failed: {err:?}"),
        }
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Some(s) = self.frames.remove(&handle) {
            let _ = self.window.cancel_animation_frame(s.js_id);
        }
    }
}

impl TimerQueue for WebHost {
    fn set_timeout(&mut self, delay_ms: f64) -> TimerHandle {
        let handle = TimerHandle(self.next_timer);
        self.next_timer = self.next_timer.wrapping_add(1);
        let sink = self.sink.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            sink(HostEvent::Timer(handle));
        });
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                clamp_delay(delay_ms),
            ) {
            Ok(js_id) => {
                self.timers.insert(handle, Scheduled { js_id, closure });
            }
            Err(err) => warn!("setTimeout failed: {err:?}"),
        }
        handle
    }

    fn clear_timeout(&mut self, handle: TimerHandle) {
        if let Some(s) = self.timers.remove(&handle) {
            self.window.clear_timeout_with_handle(s.js_id);
        }
    }
}

impl ViewportObserver for WebHost {
    fn observe(&mut self, el: ElementId, options: &ObserveOptions) {
        let Some(target) = self.element(el).cloned() else {
            return;
        };
        let Some(observer) = self.observer_for(options) else {
            return;
        };
        observer.observe(&target);
        self.observed.insert(el, observer_key(options));
    }

    fn unobserve(&mut self, el: ElementId) {
        let Some(key) = self.observed.remove(&el) else {
            return;
        };
        if let (Some(o), Some(target)) = (self.observers.get(&key), self.element(el)) {
            o.observer.unobserve(target);
        }
    }
}
