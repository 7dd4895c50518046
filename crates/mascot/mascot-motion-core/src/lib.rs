//! Mascot Motion Core (host-agnostic)
//!
//! State machines behind the decorative mascot and the scroll-reveal decor on
//! the marketing pages. Browser facilities (intersection observer, animation
//! frames, timeouts, the DOM) are reached through the traits in [`host`], so the
//! same code runs under wasm and under the deterministic fixture host in tests.

pub mod animator;
pub mod config;
pub mod host;
pub mod ids;
pub mod motion;
pub mod pulse;
pub mod visibility;

// Re-exports for consumers (adapters)
pub use animator::{mascot_observe_options, MascotAnimator, Phase};
pub use config::{ConfigError, MascotConfig, MascotOptions, ENTRANCE_SETTLE_MS};
pub use host::{
    FrameScheduler, Host, ObserveOptions, Point, Rect, Stage, TimerQueue, ViewportObserver,
    CLASS_BOUNCING, CLASS_HOVER, CLASS_VISIBLE, CLASS_WAVING,
};
pub use ids::{ElementId, FrameHandle, TimerHandle};
pub use motion::{pose_at, Pose, Shadow};
pub use visibility::{decor_observe_options, ScrollDirection, VisibilityManager};
