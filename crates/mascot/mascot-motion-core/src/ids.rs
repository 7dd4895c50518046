//! Opaque handles handed out by the host.
//!
//! The core never allocates these itself; it only stores and compares them so
//! that callbacks can be routed back to the request that produced them.

use serde::{Deserialize, Serialize};

/// A DOM element (or test double) known to the host's [`Stage`](crate::host::Stage).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ElementId(pub u32);

/// A pending per-frame callback.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct FrameHandle(pub u32);

/// A pending one-shot timeout.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(pub u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_compare_by_value() {
        assert_eq!(FrameHandle(3), FrameHandle(3));
        assert_ne!(TimerHandle(1), TimerHandle(2));
        assert_eq!(ElementId(7).0, 7);
    }
}
