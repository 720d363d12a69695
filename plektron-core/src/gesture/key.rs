//! Per-key gesture state machine
//!
//! Converts a noisy "line currently asserted" sample, taken on a fixed
//! polling cadence, into debounced gesture callbacks. Timed transitions
//! compare the supplied monotonic time against a stored deadline; no
//! clock is read here.

use crate::config::KeyTiming;
use crate::keypad::KeyId;

use super::arbiter::Arbiter;

/// Key machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyState {
    /// Line idle, waiting for a press edge
    Released,
    /// Press edge seen, waiting out the debounce window
    DebounceToPressed,
    /// Key held down
    Pressed,
    /// Release edge seen, waiting out the debounce window
    DebounceToReleased,
}

/// One debounced key with gesture callbacks
///
/// A key is constructed once at startup with all callbacks unset;
/// callbacks may be (re)assigned at any time. An unset callback is a
/// valid configuration and is simply skipped.
pub struct Key<'a> {
    id: KeyId,
    timing: KeyTiming,
    state: KeyState,
    /// Absolute time after which the current debounce/long-press/repeat
    /// window has elapsed. Meaningless in `Released`.
    deadline_ms: u64,
    /// True iff this key holds exclusive event rights.
    /// Valid only in `Pressed` and `DebounceToReleased`.
    allow_events: bool,
    on_short_press: Option<&'a dyn Fn()>,
    on_long_press: Option<&'a dyn Fn()>,
    on_repeat: Option<&'a dyn Fn()>,
    on_repeat_count: Option<&'a dyn Fn(u16)>,
}

impl<'a> Key<'a> {
    /// Create a key in the released state with no callbacks
    pub const fn new(id: KeyId, timing: KeyTiming) -> Self {
        Self {
            id,
            timing,
            state: KeyState::Released,
            deadline_ms: 0,
            allow_events: false,
            on_short_press: None,
            on_long_press: None,
            on_repeat: None,
            on_repeat_count: None,
        }
    }

    /// This key's identity
    pub fn id(&self) -> KeyId {
        self.id
    }

    /// Current machine state
    pub fn state(&self) -> KeyState {
        self.state
    }

    /// True iff the key is in the pressed state
    pub fn is_pressed(&self) -> bool {
        self.state == KeyState::Pressed
    }

    /// Fires once when a press shorter than the long-press window ends
    pub fn set_on_short_press(&mut self, callback: &'a dyn Fn()) {
        self.on_short_press = Some(callback);
    }

    /// Fires once per press when the long-press window elapses
    pub fn set_on_long_press(&mut self, callback: &'a dyn Fn()) {
        self.on_long_press = Some(callback);
    }

    /// Fires on every repeat tick, including the first
    pub fn set_on_repeat(&mut self, callback: &'a dyn Fn()) {
        self.on_repeat = Some(callback);
    }

    /// Fires alongside every repeat tick with the number of prior ticks
    pub fn set_on_repeat_count(&mut self, callback: &'a dyn Fn(u16)) {
        self.on_repeat_count = Some(callback);
    }

    /// Remove all callbacks from this key
    pub fn clear_callbacks(&mut self) {
        self.on_short_press = None;
        self.on_long_press = None;
        self.on_repeat = None;
        self.on_repeat_count = None;
    }

    /// Advance the state machine by one polling cycle
    ///
    /// `raw` is the undebounced "line currently asserted" sample and
    /// `now_ms` the current monotonic time. The shared arbiter must be
    /// the same instance for every key of the panel. Total function:
    /// completes in bounded time and never fails.
    pub fn tick(&mut self, raw: bool, now_ms: u64, arbiter: &mut Arbiter<'a>) {
        match self.state {
            KeyState::Released => {
                if raw {
                    self.state = KeyState::DebounceToPressed;
                    self.deadline_ms = now_ms + self.timing.debounce_ms as u64;
                }
            }
            KeyState::DebounceToPressed => {
                // Ignore the line until the debounce window expires
                if now_ms >= self.deadline_ms {
                    if raw {
                        self.state = KeyState::Pressed;
                        self.allow_events = arbiter.claim(self.id);
                        self.deadline_ms = now_ms + self.timing.long_press_ms as u64;
                    } else {
                        // Glitch: the edge reversed inside the window
                        self.state = KeyState::Released;
                    }
                }
            }
            KeyState::Pressed => {
                if !raw {
                    self.state = KeyState::DebounceToReleased;
                    self.deadline_ms = now_ms + self.timing.debounce_ms as u64;
                } else if now_ms >= self.deadline_ms {
                    // Long-press/repeat tick
                    self.deadline_ms = now_ms + self.timing.repeat_interval_ms as u64;
                    if self.allow_events {
                        if arbiter.repeat_count() == 0 {
                            if let Some(callback) = self.on_long_press {
                                callback();
                            }
                        }
                        if let Some(callback) = self.on_repeat_count {
                            callback(arbiter.repeat_count());
                        }
                        if let Some(callback) = self.on_repeat {
                            callback();
                        }
                        arbiter.advance_repeat();
                    }
                } else if self.allow_events && arbiter.repeat_count() == 0 {
                    // Still inside the long-press window: a candidate
                    // pressing now makes this a chord. The chord owner
                    // gives up its own events for this press cycle.
                    if let Some(partner) = arbiter.candidate() {
                        arbiter.fire_chord(self.id, partner);
                        self.allow_events = false;
                    }
                }
            }
            KeyState::DebounceToReleased => {
                // Ignore the line until the debounce window expires
                if now_ms >= self.deadline_ms {
                    if !raw {
                        self.state = KeyState::Released;
                        if self.allow_events && arbiter.repeat_count() == 0 {
                            if let Some(callback) = self.on_short_press {
                                callback();
                            }
                        }
                        arbiter.release(self.id);
                        self.allow_events = false;
                    } else {
                        // Glitch: key is actually still down, no re-arbitration
                        self.state = KeyState::Pressed;
                    }
                }
            }
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use core::cell::Cell;
    use proptest::prelude::*;

    proptest! {
        /// Pulse trains that never stay high for a full debounce window
        /// must be absorbed without a single callback.
        #[test]
        fn glitches_never_fire(
            high_ms in 1u64..20,
            gap_ms in 21u64..80,
            pulses in 1usize..6,
        ) {
            let fired = Cell::new(0u32);
            let on_any = || fired.set(fired.get() + 1);
            let on_count = |_: u16| fired.set(fired.get() + 1);
            let on_chord = |_: KeyId, _: KeyId| fired.set(fired.get() + 1);

            let mut arb = Arbiter::new();
            arb.set_on_chord(&on_chord);
            let mut key = Key::new(KeyId::Select, KeyTiming::default());
            key.set_on_short_press(&on_any);
            key.set_on_long_press(&on_any);
            key.set_on_repeat(&on_any);
            key.set_on_repeat_count(&on_count);

            let mut t = 0u64;
            for _ in 0..pulses {
                for _ in 0..high_ms {
                    key.tick(true, t, &mut arb);
                    t += 1;
                }
                for _ in 0..gap_ms {
                    key.tick(false, t, &mut arb);
                    t += 1;
                }
                prop_assert_eq!(key.state(), KeyState::Released);
            }
            prop_assert_eq!(fired.get(), 0);
            prop_assert_eq!(arb.active(), None);
        }
    }
}
