//! Timing configuration
//!
//! All gesture recognition windows in one place. Values are fixed at
//! construction; the engine never changes them at runtime.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default debounce window in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u32 = 20;

/// Default elapsed-press time before the first long-press/repeat tick
pub const DEFAULT_LONG_PRESS_MS: u32 = 500;

/// Default interval between repeat ticks
pub const DEFAULT_REPEAT_INTERVAL_MS: u32 = 200;

/// Gesture timing windows
///
/// - `debounce_ms`: delay before a raw edge is trusted as genuine
/// - `long_press_ms`: hold time before the first long-press/repeat tick
/// - `repeat_interval_ms`: interval between subsequent repeat ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeyTiming {
    /// Debounce window for both press and release edges (ms)
    pub debounce_ms: u32,
    /// Hold time before the first long-press/repeat tick (ms)
    pub long_press_ms: u32,
    /// Interval between repeat ticks (ms)
    pub repeat_interval_ms: u32,
}

impl KeyTiming {
    /// Create a timing configuration
    pub const fn new(debounce_ms: u32, long_press_ms: u32, repeat_interval_ms: u32) -> Self {
        Self {
            debounce_ms,
            long_press_ms,
            repeat_interval_ms,
        }
    }
}

impl Default for KeyTiming {
    fn default() -> Self {
        Self::new(
            DEFAULT_DEBOUNCE_MS,
            DEFAULT_LONG_PRESS_MS,
            DEFAULT_REPEAT_INTERVAL_MS,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timing() {
        let timing = KeyTiming::default();
        assert_eq!(timing.debounce_ms, 20);
        assert_eq!(timing.long_press_ms, 500);
        assert_eq!(timing.repeat_interval_ms, 200);
    }

    #[test]
    fn test_const_construction() {
        const TIMING: KeyTiming = KeyTiming::new(10, 1000, 100);
        assert_eq!(TIMING.debounce_ms, 10);
        assert_eq!(TIMING.long_press_ms, 1000);
        assert_eq!(TIMING.repeat_interval_ms, 100);
    }
}
