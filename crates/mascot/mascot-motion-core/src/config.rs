//! Mascot configuration.
//!
//! Callers supply [`MascotOptions`] (every field optional); [`MascotOptions::resolve`]
//! fills the gaps from the documented defaults and validates the result.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Delay between the entrance class being added and the floating loop starting.
/// Matches the length of the CSS entrance transition.
pub const ENTRANCE_SETTLE_MS: f64 = 800.0;

/// Errors produced while resolving mascot options.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },
}

/// Resolved, validated motion parameters. Immutable once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MascotConfig {
    /// Vertical bob amplitude in px.
    pub float_amplitude: f64,
    /// Angular speed of the bob in radians per millisecond.
    pub float_speed: f64,
    /// Peak rotation in degrees.
    pub rotation_amplitude: f64,
    /// Pointer-to-center distance multiplier.
    pub mouse_influence: f64,
    /// Wait after entering the viewport before the entrance class is added (ms).
    pub entrance_delay: f64,
    /// Per-axis bound on the pointer offset in px. `None` disables clamping.
    pub max_mouse_offset: Option<f64>,
    pub wave_duration: f64,
    pub bounce_duration: f64,
}

impl Default for MascotConfig {
    fn default() -> Self {
        Self {
            float_amplitude: 10.0,
            float_speed: 0.002,
            rotation_amplitude: 3.0,
            mouse_influence: 0.02,
            entrance_delay: 300.0,
            max_mouse_offset: Some(20.0),
            wave_duration: 1000.0,
            bounce_duration: 600.0,
        }
    }
}

impl MascotConfig {
    /// Total time from "entered viewport" to the first floating frame.
    #[inline]
    pub fn time_to_float(&self) -> f64 {
        self.entrance_delay + ENTRANCE_SETTLE_MS
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("float_amplitude", self.float_amplitude)?;
        non_negative("float_speed", self.float_speed)?;
        non_negative("rotation_amplitude", self.rotation_amplitude)?;
        non_negative("mouse_influence", self.mouse_influence)?;
        non_negative("entrance_delay", self.entrance_delay)?;
        if let Some(bound) = self.max_mouse_offset {
            non_negative("max_mouse_offset", bound)?;
        }
        non_negative("wave_duration", self.wave_duration)?;
        non_negative("bounce_duration", self.bounce_duration)?;
        Ok(())
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NotFinite { field, value });
    }
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

/// Caller overrides. Absent fields take the [`MascotConfig::default`] value.
///
/// Deserializes from camelCase as well, so the wasm adapter can accept
/// `{ floatAmplitude: 12 }` straight from page scripts.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MascotOptions {
    #[serde(alias = "floatAmplitude")]
    pub float_amplitude: Option<f64>,
    #[serde(alias = "floatSpeed")]
    pub float_speed: Option<f64>,
    #[serde(alias = "rotationAmplitude")]
    pub rotation_amplitude: Option<f64>,
    #[serde(alias = "mouseInfluence")]
    pub mouse_influence: Option<f64>,
    #[serde(alias = "entranceDelay")]
    pub entrance_delay: Option<f64>,
    /// Clamp bound override. Set `disable_mouse_clamp` to turn clamping off.
    #[serde(alias = "maxMouseOffset")]
    pub max_mouse_offset: Option<f64>,
    #[serde(alias = "disableMouseClamp")]
    pub disable_mouse_clamp: bool,
    #[serde(alias = "waveDuration")]
    pub wave_duration: Option<f64>,
    #[serde(alias = "bounceDuration")]
    pub bounce_duration: Option<f64>,
}

impl MascotOptions {
    pub fn resolve(&self) -> Result<MascotConfig, ConfigError> {
        let d = MascotConfig::default();
        let max_mouse_offset = if self.disable_mouse_clamp {
            None
        } else {
            self.max_mouse_offset.or(d.max_mouse_offset)
        };
        let cfg = MascotConfig {
            float_amplitude: self.float_amplitude.unwrap_or(d.float_amplitude),
            float_speed: self.float_speed.unwrap_or(d.float_speed),
            rotation_amplitude: self.rotation_amplitude.unwrap_or(d.rotation_amplitude),
            mouse_influence: self.mouse_influence.unwrap_or(d.mouse_influence),
            entrance_delay: self.entrance_delay.unwrap_or(d.entrance_delay),
            max_mouse_offset,
            wave_duration: self.wave_duration.unwrap_or(d.wave_duration),
            bounce_duration: self.bounce_duration.unwrap_or(d.bounce_duration),
        };
        cfg.validate()?;
        Ok(cfg)
    }
}
