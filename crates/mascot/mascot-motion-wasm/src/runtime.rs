//! Owns a [`WebHost`] plus the core components driven through it, and routes
//! browser callbacks to them.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, MouseEvent};

use mascot_motion_core::{ConfigError, MascotAnimator, MascotOptions, VisibilityManager};

use crate::host::{HostEvent, Sink, WebHost};

pub(crate) type Shared = Rc<RefCell<Runtime>>;

struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

pub(crate) struct Runtime {
    host: WebHost,
    mascot: Option<MascotAnimator>,
    decor: Option<VisibilityManager>,
    listeners: Vec<Listener>,
}

fn dispatch(weak: &Weak<RefCell<Runtime>>, ev: HostEvent) {
    let Some(shared) = weak.upgrade() else {
        return;
    };
    let Ok(mut rt) = shared.try_borrow_mut() else {
        warn!("host event dropped: runtime busy");
        return;
    };
    rt.handle(ev);
}

impl Runtime {
    pub(crate) fn create() -> Result<Shared, JsError> {
        let window = web_sys::window().ok_or_else(|| JsError::new("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsError::new("window has no document"))?;
        Ok(Rc::new_cyclic(|weak: &Weak<RefCell<Runtime>>| {
            let weak = weak.clone();
            let sink: Sink = Rc::new(move |ev| dispatch(&weak, ev));
            RefCell::new(Runtime {
                host: WebHost::new(window, document, sink),
                mascot: None,
                decor: None,
                listeners: Vec::new(),
            })
        }))
    }

    pub(crate) fn attach_mascot(
        &mut self,
        selector: &str,
        options: &MascotOptions,
    ) -> Result<(), ConfigError> {
        let mascot = MascotAnimator::attach(selector, options, &mut self.host)?;
        let element = mascot
            .element()
            .and_then(|id| self.host.element(id).cloned());
        if let Some(el) = element {
            let window = self.host.window().clone();
            self.listen(&window, "mousemove", |e| {
                e.dyn_ref::<MouseEvent>()
                    .map(|m| HostEvent::PointerMove(m.client_x() as f64, m.client_y() as f64))
            });
            self.listen(&window, "resize", |_| Some(HostEvent::Resize));
            self.listen(&el, "mouseenter", |_| Some(HostEvent::Hover(true)));
            self.listen(&el, "mouseleave", |_| Some(HostEvent::Hover(false)));
        }
        self.mascot = Some(mascot);
        Ok(())
    }

    pub(crate) fn attach_decor(&mut self, selector: &str) {
        let window = self.host.window().clone();
        let scroll_y = window.scroll_y().unwrap_or_default();
        self.decor = Some(VisibilityManager::attach(selector, scroll_y, &mut self.host));
        let source = window.clone();
        self.listen(&window, "scroll", move |_| {
            source.scroll_y().ok().map(HostEvent::Scroll)
        });
    }

    pub(crate) fn mascot(&self) -> Option<&MascotAnimator> {
        self.mascot.as_ref()
    }

    pub(crate) fn decor(&self) -> Option<&VisibilityManager> {
        self.decor.as_ref()
    }

    /// Run `f` against the mascot with the host. No-op before attach.
    pub(crate) fn with_mascot(&mut self, f: impl FnOnce(&mut MascotAnimator, &mut WebHost)) {
        if let Some(m) = self.mascot.as_mut() {
            f(m, &mut self.host);
        }
    }

    fn listen<F>(&mut self, target: &EventTarget, kind: &'static str, to_event: F)
    where
        F: Fn(&Event) -> Option<HostEvent> + 'static,
    {
        let sink = self.host.sink();
        let callback = Closure::<dyn FnMut(Event)>::new(move |e: Event| {
            if let Some(ev) = to_event(&e) {
                sink(ev);
            }
        });
        if let Err(err) =
            target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
        {
            warn!("listen {kind}: {err:?}");
            return;
        }
        self.listeners.push(Listener {
            target: target.clone(),
            kind,
            callback,
        });
    }

    fn handle(&mut self, ev: HostEvent) {
        let Runtime {
            host, mascot, decor, ..
        } = self;
        match ev {
            HostEvent::Frame(handle, ts) => {
                host.frame_fired(handle);
                let consumed = mascot
                    .as_mut()
                    .is_some_and(|m| m.on_frame(handle, ts, host));
                if !consumed {
                    if let Some(d) = decor.as_mut() {
                        d.on_frame(handle);
                    }
                }
            }
            HostEvent::Timer(handle) => {
                host.timer_fired(handle);
                let now = host.now();
                if let Some(m) = mascot.as_mut() {
                    m.on_timer(handle, now, host);
                }
            }
            HostEvent::Intersection(target, entered) => {
                let Some(id) = host.element_id(&target) else {
                    return;
                };
                match mascot.as_mut().filter(|m| m.element() == Some(id)) {
                    Some(m) => m.on_visibility(entered, host),
                    None => {
                        if let Some(d) = decor.as_mut() {
                            d.on_intersection(id, entered, host);
                        }
                    }
                }
            }
            HostEvent::PointerMove(x, y) => {
                if let Some(m) = mascot.as_mut() {
                    m.on_pointer_move(x, y);
                }
            }
            HostEvent::Hover(hovered) => {
                if let Some(m) = mascot.as_mut() {
                    m.set_hovered(hovered, host);
                }
            }
            HostEvent::Scroll(y) => {
                if let Some(d) = decor.as_mut() {
                    d.on_scroll(y, host);
                }
            }
            HostEvent::Resize => {
                if let Some(m) = mascot.as_mut() {
                    m.on_resize(host);
                }
            }
        }
    }

    /// Stop every loop, timer, observer and listener. Safe to call twice.
    pub(crate) fn shutdown(&mut self) {
        if let Some(mut m) = self.mascot.take() {
            m.detach(&mut self.host);
        }
        if let Some(mut d) = self.decor.take() {
            d.detach(&mut self.host);
        }
        for l in self.listeners.drain(..) {
            if let Err(err) = l
                .target
                .remove_event_listener_with_callback(l.kind, l.callback.as_ref().unchecked_ref())
            {
                warn!("unlisten {}: {err:?}", l.kind);
            }
        }
        self.host.shutdown();
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        self.shutdown();
    }
}
