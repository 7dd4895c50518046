//! MascotAnimator: visibility-gated floating loop for one decorative element.
//!
//! Phases:
//! - Hidden: nothing scheduled.
//! - Entering: waiting `entrance_delay` for the reveal, then [`ENTRANCE_SETTLE_MS`]
//!   for the CSS entrance transition to finish.
//! - Floating: one frame request outstanding at all times; each frame writes a pose.
//!
//! The component is sans-IO. The host calls `on_*` methods as its callbacks fire
//! and passes itself in as `&mut dyn Host` so effects can be issued.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, MascotConfig, MascotOptions, ENTRANCE_SETTLE_MS};
use crate::host::{
    Host, ObserveOptions, Point, CLASS_BOUNCING, CLASS_HOVER, CLASS_VISIBLE, CLASS_WAVING,
};
use crate::ids::{ElementId, FrameHandle, TimerHandle};
use crate::motion::{pose_at, Pose};
use crate::pulse::ClassPulse;

/// Intersection ratio at which the mascot counts as on screen.
pub const MASCOT_THRESHOLD: f64 = 0.3;

pub fn mascot_observe_options() -> ObserveOptions {
    ObserveOptions {
        root_margin: "0px".to_string(),
        threshold: MASCOT_THRESHOLD,
    }
}

/// Externally visible phase of the state machine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Hidden,
    Entering,
    Floating,
}

#[derive(Copy, Clone, Debug)]
enum Motion {
    Hidden,
    Entering {
        timer: TimerHandle,
        revealed: bool,
    },
    Floating {
        started_at: f64,
        frame: FrameHandle,
    },
}

#[derive(Debug)]
struct Attached {
    el: ElementId,
    cfg: MascotConfig,
    motion: Motion,
    pointer: Option<Point>,
    center: Point,
    hovered: bool,
    wave: ClassPulse,
    bounce: ClassPulse,
    last_pose: Option<Pose>,
}

/// Owns one mascot element. Built against a selector; if nothing matches the
/// instance is inert and every method is a silent no-op.
#[derive(Debug)]
pub struct MascotAnimator {
    inner: Option<Attached>,
}

impl MascotAnimator {
    /// Resolve `options`, look up `selector`, and start observing the element.
    pub fn attach(
        selector: &str,
        options: &MascotOptions,
        host: &mut dyn Host,
    ) -> Result<Self, ConfigError> {
        let cfg = options.resolve()?;
        Self::with_config(selector, cfg, host)
    }

    /// Same as [`attach`](Self::attach) with an already-built config.
    pub fn with_config(
        selector: &str,
        cfg: MascotConfig,
        host: &mut dyn Host,
    ) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let Some(el) = host.query_one(selector) else {
            debug!("mascot: no element matches {selector:?}; running inert");
            return Ok(Self { inner: None });
        };
        let center = host.bounding_rect(el).center();
        host.observe(el, &mascot_observe_options());
        debug!("mascot: attached to {el:?} centered at ({}, {})", center.x, center.y);
        Ok(Self {
            inner: Some(Attached {
                el,
                wave: ClassPulse::new(CLASS_WAVING, cfg.wave_duration),
                bounce: ClassPulse::new(CLASS_BOUNCING, cfg.bounce_duration),
                cfg,
                motion: Motion::Hidden,
                pointer: None,
                center,
                hovered: false,
                last_pose: None,
            }),
        })
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.inner.is_some()
    }

    pub fn element(&self) -> Option<ElementId> {
        self.inner.as_ref().map(|a| a.el)
    }

    pub fn config(&self) -> Option<&MascotConfig> {
        self.inner.as_ref().map(|a| &a.cfg)
    }

    pub fn phase(&self) -> Phase {
        match self.inner.as_ref().map(|a| &a.motion) {
            None | Some(Motion::Hidden) => Phase::Hidden,
            Some(Motion::Entering { .. }) => Phase::Entering,
            Some(Motion::Floating { .. }) => Phase::Floating,
        }
    }

    /// Last pose written to the element, if any frame has rendered.
    pub fn last_pose(&self) -> Option<Pose> {
        self.inner.as_ref().and_then(|a| a.last_pose)
    }

    pub fn element_center(&self) -> Option<Point> {
        self.inner.as_ref().map(|a| a.center)
    }

    /// Boundary-crossing notification for the mascot element.
    pub fn on_visibility(&mut self, entered: bool, host: &mut dyn Host) {
        let Some(a) = self.inner.as_mut() else {
            return;
        };
        match (entered, a.motion) {
            (true, Motion::Hidden) => {
                let timer = host.set_timeout(a.cfg.entrance_delay);
                a.motion = Motion::Entering {
                    timer,
                    revealed: false,
                };
                debug!("mascot: hidden -> entering");
            }
            (false, Motion::Entering { timer, revealed }) => {
                host.clear_timeout(timer);
                if revealed {
                    host.remove_class(a.el, CLASS_VISIBLE);
                }
                a.motion = Motion::Hidden;
                debug!("mascot: entering -> hidden");
            }
            (false, Motion::Floating { frame, .. }) => {
                host.cancel_frame(frame);
                host.remove_class(a.el, CLASS_VISIBLE);
                a.motion = Motion::Hidden;
                debug!("mascot: floating -> hidden");
            }
            (entered, _) => {
                debug!("mascot: ignoring visibility={entered} in {:?}", a.motion);
            }
        }
    }

    /// Timeout callback. Returns true if the handle belonged to this animator.
    pub fn on_timer(&mut self, handle: TimerHandle, now: f64, host: &mut dyn Host) -> bool {
        let Some(a) = self.inner.as_mut() else {
            return false;
        };
        if a.wave.on_timer(a.el, handle, host) || a.bounce.on_timer(a.el, handle, host) {
            return true;
        }
        let Motion::Entering { timer, revealed } = a.motion else {
            return false;
        };
        if timer != handle {
            return false;
        }
        if !revealed {
            host.add_class(a.el, CLASS_VISIBLE);
            a.motion = Motion::Entering {
                timer: host.set_timeout(ENTRANCE_SETTLE_MS),
                revealed: true,
            };
        } else {
            a.motion = Motion::Floating {
                started_at: now,
                frame: host.request_frame(),
            };
            debug!("mascot: entering -> floating at {now}");
        }
        true
    }

    /// Frame callback. Writes the pose and requests the next frame.
    pub fn on_frame(&mut self, handle: FrameHandle, now: f64, host: &mut dyn Host) -> bool {
        let Some(a) = self.inner.as_mut() else {
            return false;
        };
        let Motion::Floating { started_at, frame } = a.motion else {
            return false;
        };
        if frame != handle {
            debug!("mascot: stale frame {handle:?}");
            return false;
        }
        let elapsed = (now - started_at).max(0.0);
        let pose = pose_at(&a.cfg, elapsed, a.pointer, a.center);
        host.set_style(a.el, "transform", &pose.transform_css());
        host.set_style(a.el, "filter", &pose.shadow.to_css());
        a.last_pose = Some(pose);
        a.motion = Motion::Floating {
            started_at,
            frame: host.request_frame(),
        };
        true
    }

    /// Latest pointer position. Only the most recent value is kept.
    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        if let Some(a) = self.inner.as_mut() {
            a.pointer = Some(Point::new(x, y));
        }
    }

    pub fn on_resize(&mut self, host: &mut dyn Host) {
        if let Some(a) = self.inner.as_mut() {
            a.center = host.bounding_rect(a.el).center();
        }
    }

    pub fn set_hovered(&mut self, hovered: bool, host: &mut dyn Host) {
        let Some(a) = self.inner.as_mut() else {
            return;
        };
        if a.hovered == hovered {
            return;
        }
        a.hovered = hovered;
        if hovered {
            host.add_class(a.el, CLASS_HOVER);
        } else {
            host.remove_class(a.el, CLASS_HOVER);
        }
    }

    pub fn wave(&mut self, host: &mut dyn Host) {
        if let Some(a) = self.inner.as_mut() {
            a.wave.trigger(a.el, host);
        }
    }

    pub fn bounce(&mut self, host: &mut dyn Host) {
        if let Some(a) = self.inner.as_mut() {
            a.bounce.trigger(a.el, host);
        }
    }

    /// Cancel every outstanding callback and stop observing. The instance is
    /// inert afterwards.
    pub fn detach(&mut self, host: &mut dyn Host) {
        let Some(mut a) = self.inner.take() else {
            return;
        };
        match a.motion {
            Motion::Hidden => {}
            Motion::Entering { timer, .. } => host.clear_timeout(timer),
            Motion::Floating { frame, .. } => host.cancel_frame(frame),
        }
        a.wave.cancel(a.el, host);
        a.bounce.cancel(a.el, host);
        host.unobserve(a.el);
        debug!("mascot: detached from {:?}", a.el);
    }
}
