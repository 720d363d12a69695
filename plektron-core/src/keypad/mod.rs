//! Panel-level key set
//!
//! Bundles the five front-panel keys with their shared arbiter and
//! advances all of them from one polling cadence. Sample bit positions
//! match the shield's port wiring so a raw port read converts straight
//! into a [`KeySamples`] value.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::KeyTiming;
use crate::gesture::{Arbiter, Key};

/// Number of keys on the panel
pub const KEY_COUNT: usize = 5;

/// All key identities in polling order
pub const KEY_IDS: [KeyId; KEY_COUNT] = [
    KeyId::Select,
    KeyId::Right,
    KeyId::Down,
    KeyId::Up,
    KeyId::Left,
];

/// Identity of one physical key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum KeyId {
    Select,
    Right,
    Down,
    Up,
    Left,
}

impl KeyId {
    /// Stable index, unique within the panel
    pub const fn index(self) -> usize {
        match self {
            KeyId::Select => 0,
            KeyId::Right => 1,
            KeyId::Down => 2,
            KeyId::Up => 3,
            KeyId::Left => 4,
        }
    }

    /// Bit mask of this key in a raw port sample
    pub const fn mask(self) -> u8 {
        1 << self.index() as u8
    }
}

/// One polling cycle's worth of raw key samples
///
/// Wraps the port byte read from the expander: one bit per key,
/// pressed = high. Pure queries only; no debounce, no memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeySamples(u8);

impl KeySamples {
    /// No key asserted
    pub const fn none() -> Self {
        Self(0)
    }

    /// Wrap a raw port byte (pressed = bit high)
    pub const fn from_port(bits: u8) -> Self {
        Self(bits)
    }

    /// True iff the given key's line is currently asserted
    pub const fn pressed(self, id: KeyId) -> bool {
        self.0 & id.mask() != 0
    }

    /// Copy with the given key's line asserted
    pub const fn with(self, id: KeyId) -> Self {
        Self(self.0 | id.mask())
    }
}

/// The five panel keys plus their shared arbiter
///
/// Constructed once at startup with all callbacks unset. All keys are
/// advanced synchronously by [`Keypad::poll`]; the caller must not feed
/// the same panel from two execution contexts.
pub struct Keypad<'a> {
    keys: [Key<'a>; KEY_COUNT],
    arbiter: Arbiter<'a>,
}

impl<'a> Keypad<'a> {
    /// Create a panel where every key uses the same timing windows
    pub const fn new(timing: KeyTiming) -> Self {
        Self {
            keys: [
                Key::new(KeyId::Select, timing),
                Key::new(KeyId::Right, timing),
                Key::new(KeyId::Down, timing),
                Key::new(KeyId::Up, timing),
                Key::new(KeyId::Left, timing),
            ],
            arbiter: Arbiter::new(),
        }
    }

    /// Advance every key by one polling cycle
    ///
    /// To be called once per cycle with the latest raw samples and the
    /// current monotonic time in milliseconds.
    pub fn poll(&mut self, samples: KeySamples, now_ms: u64) {
        for key in self.keys.iter_mut() {
            key.tick(samples.pressed(key.id()), now_ms, &mut self.arbiter);
        }
    }

    /// Borrow one key, e.g. to query its state
    pub fn key(&self, id: KeyId) -> &Key<'a> {
        &self.keys[id.index()]
    }

    /// Borrow one key mutably, e.g. to register callbacks
    pub fn key_mut(&mut self, id: KeyId) -> &mut Key<'a> {
        &mut self.keys[id.index()]
    }

    /// True iff the given key is in the pressed state
    pub fn is_pressed(&self, id: KeyId) -> bool {
        self.key(id).is_pressed()
    }

    /// Register the panel-wide two-key chord callback
    pub fn set_on_chord(&mut self, callback: &'a dyn Fn(KeyId, KeyId)) {
        self.arbiter.set_on_chord(callback);
    }

    /// Read-only view of the arbitration state
    pub fn arbiter(&self) -> &Arbiter<'a> {
        &self.arbiter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    #[test]
    fn test_key_masks_match_port_wiring() {
        // Wiring order on the expander's input port, LSB first
        assert_eq!(KeyId::Select.mask(), 0b0000_0001);
        assert_eq!(KeyId::Right.mask(), 0b0000_0010);
        assert_eq!(KeyId::Down.mask(), 0b0000_0100);
        assert_eq!(KeyId::Up.mask(), 0b0000_1000);
        assert_eq!(KeyId::Left.mask(), 0b0001_0000);
    }

    #[test]
    fn test_samples_from_port_byte() {
        let samples = KeySamples::from_port(0b0001_0001);
        assert!(samples.pressed(KeyId::Select));
        assert!(samples.pressed(KeyId::Left));
        assert!(!samples.pressed(KeyId::Up));
        assert!(!samples.pressed(KeyId::Down));
        assert!(!samples.pressed(KeyId::Right));

        // Non-key bits are ignored
        let samples = KeySamples::from_port(0b1110_0000);
        for id in KEY_IDS {
            assert!(!samples.pressed(id));
        }
    }

    #[test]
    fn test_samples_builder() {
        let samples = KeySamples::none().with(KeyId::Up).with(KeyId::Select);
        assert!(samples.pressed(KeyId::Up));
        assert!(samples.pressed(KeyId::Select));
        assert!(!samples.pressed(KeyId::Left));
    }

    #[test]
    fn test_poll_distributes_samples() {
        let mut pad = Keypad::new(KeyTiming::default());

        let samples = KeySamples::none().with(KeyId::Up);
        for t in 0..50u64 {
            pad.poll(samples, t);
        }
        assert!(pad.is_pressed(KeyId::Up));
        assert!(!pad.is_pressed(KeyId::Down));
        assert_eq!(pad.arbiter().active(), Some(KeyId::Up));
    }

    #[test]
    fn test_short_press_through_panel() {
        let shorts = Cell::new(0u32);
        let on_short = || shorts.set(shorts.get() + 1);

        let mut pad = Keypad::new(KeyTiming::default());
        pad.key_mut(KeyId::Select).set_on_short_press(&on_short);

        let down = KeySamples::none().with(KeyId::Select);
        for t in 0..100u64 {
            pad.poll(down, t);
        }
        for t in 100..150u64 {
            pad.poll(KeySamples::none(), t);
        }
        assert_eq!(shorts.get(), 1);
    }

    #[test]
    fn test_chord_through_panel() {
        let chords = Cell::new(0u32);
        let pair = Cell::new(None::<(KeyId, KeyId)>);
        let on_chord = |a: KeyId, b: KeyId| {
            chords.set(chords.get() + 1);
            pair.set(Some((a, b)));
        };

        let mut pad = Keypad::new(KeyTiming::default());
        pad.set_on_chord(&on_chord);

        // Up presses first, Down joins while Up is still in its window
        let up = KeySamples::none().with(KeyId::Up);
        let both = up.with(KeyId::Down);
        for t in 0..40u64 {
            pad.poll(up, t);
        }
        for t in 40..200u64 {
            pad.poll(both, t);
        }
        assert_eq!(chords.get(), 1);
        assert_eq!(pair.get(), Some((KeyId::Up, KeyId::Down)));

        for t in 200..260u64 {
            pad.poll(KeySamples::none(), t);
        }
        assert_eq!(pad.arbiter().active(), None);
    }

    #[test]
    fn test_same_cycle_press_is_deterministic() {
        // Two keys landing in the same poll cycle: polling order decides
        // who becomes active, so the outcome is always one chord.
        let chords = Cell::new(0u32);
        let on_chord = |_: KeyId, _: KeyId| chords.set(chords.get() + 1);

        let mut pad = Keypad::new(KeyTiming::default());
        pad.set_on_chord(&on_chord);

        let both = KeySamples::none().with(KeyId::Left).with(KeyId::Right);
        for t in 0..100u64 {
            pad.poll(both, t);
        }
        // Right precedes Left in polling order
        assert_eq!(pad.arbiter().active(), Some(KeyId::Right));
        assert_eq!(chords.get(), 1);
    }
}
