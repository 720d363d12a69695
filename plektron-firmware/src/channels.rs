//! Inter-task communication channels
//!
//! The input task publishes recognized gestures here; the UI task
//! consumes them. Uses embassy-sync primitives so the gesture
//! callbacks never block the poll loop.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use plektron_core::KeyId;

/// Channel capacity for gesture events
const GESTURE_CHANNEL_SIZE: usize = 8;

/// A recognized gesture, ready for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GestureEvent {
    /// Key released before the long-press window elapsed
    Short(KeyId),
    /// Key held past the long-press window
    Long(KeyId),
    /// Repeat tick with the number of prior ticks
    Repeat(KeyId, u16),
    /// Two keys pressed together
    Chord(KeyId, KeyId),
}

/// Gestures recognized by the input task
pub static GESTURES: Channel<CriticalSectionRawMutex, GestureEvent, GESTURE_CHANNEL_SIZE> =
    Channel::new();

/// Queue a gesture without blocking the poll loop
///
/// Dropping on overflow is acceptable; the display only ever shows the
/// most recent gesture.
pub fn publish(event: GestureEvent) {
    let _ = GESTURES.try_send(event);
}
