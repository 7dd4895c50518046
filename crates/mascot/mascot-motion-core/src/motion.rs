//! Pose math for the floating loop.
//!
//! Everything here is a pure function of elapsed time, pointer position and
//! element center. No state is carried between frames apart from the clock.

use serde::{Deserialize, Serialize};

use crate::config::MascotConfig;
use crate::host::Point;

const DRIFT_X_RATE: f64 = 0.7;
const DRIFT_X_SCALE: f64 = 0.3;
const ROTATION_RATE: f64 = 0.8;

const SHADOW_DISTANCE_BASE: f64 = 10.0;
const SHADOW_DISTANCE_RANGE: f64 = 10.0;
const SHADOW_BLUR_BASE: f64 = 20.0;
const SHADOW_BLUR_RANGE: f64 = 10.0;
const SHADOW_OPACITY_BASE: f64 = 0.3;
const SHADOW_OPACITY_RANGE: f64 = 0.1;

/// Drop shadow under the mascot. Further and fainter as it rises.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub distance: f64,
    pub blur: f64,
    pub opacity: f64,
}

impl Shadow {
    /// `lift` is |floatY| normalized to [0, 1].
    pub fn from_lift(lift: f64) -> Self {
        let n = lift.clamp(0.0, 1.0);
        Self {
            distance: SHADOW_DISTANCE_BASE + SHADOW_DISTANCE_RANGE * n,
            blur: SHADOW_BLUR_BASE + SHADOW_BLUR_RANGE * n,
            opacity: SHADOW_OPACITY_BASE - SHADOW_OPACITY_RANGE * n,
        }
    }

    /// CSS `filter` value.
    pub fn to_css(&self) -> String {
        format!(
            "drop-shadow(0px {:.2}px {:.2}px rgba(0, 0, 0, {:.3}))",
            self.distance, self.blur, self.opacity
        )
    }
}

/// One frame's worth of visual output.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub translate_x: f64,
    pub translate_y: f64,
    /// Degrees.
    pub rotation: f64,
    pub shadow: Shadow,
}

impl Pose {
    /// CSS `transform` value.
    pub fn transform_css(&self) -> String {
        format!(
            "translate({:.2}px, {:.2}px) rotate({:.2}deg)",
            self.translate_x, self.translate_y, self.rotation
        )
    }
}

/// Vertical bob at `elapsed_ms`. Bounded by ±float_amplitude.
#[inline]
pub fn float_y(cfg: &MascotConfig, elapsed_ms: f64) -> f64 {
    (elapsed_ms * cfg.float_speed).sin() * cfg.float_amplitude
}

#[inline]
pub fn float_x(cfg: &MascotConfig, elapsed_ms: f64) -> f64 {
    (elapsed_ms * cfg.float_speed * DRIFT_X_RATE).sin() * (cfg.float_amplitude * DRIFT_X_SCALE)
}

#[inline]
pub fn rotation(cfg: &MascotConfig, elapsed_ms: f64) -> f64 {
    (elapsed_ms * cfg.float_speed * ROTATION_RATE).sin() * cfg.rotation_amplitude
}

/// Pointer-follow offset. Zero when there is no pointer yet or it sits on the center.
pub fn mouse_offset(cfg: &MascotConfig, pointer: Option<Point>, center: Point) -> Point {
    let Some(p) = pointer else {
        return Point::ZERO;
    };
    let mut x = (p.x - center.x) * cfg.mouse_influence;
    let mut y = (p.y - center.y) * cfg.mouse_influence;
    if let Some(bound) = cfg.max_mouse_offset {
        x = x.clamp(-bound, bound);
        y = y.clamp(-bound, bound);
    }
    Point { x, y }
}

/// Full pose for a frame.
pub fn pose_at(
    cfg: &MascotConfig,
    elapsed_ms: f64,
    pointer: Option<Point>,
    center: Point,
) -> Pose {
    let fy = float_y(cfg, elapsed_ms);
    let fx = float_x(cfg, elapsed_ms);
    let offset = mouse_offset(cfg, pointer, center);
    let lift = if cfg.float_amplitude > 0.0 {
        fy.abs() / cfg.float_amplitude
    } else {
        0.0
    };
    Pose {
        translate_x: fx + offset.x,
        translate_y: fy + offset.y,
        rotation: rotation(cfg, elapsed_ms),
        shadow: Shadow::from_lift(lift),
    }
}
