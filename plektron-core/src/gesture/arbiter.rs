//! Cross-key arbitration
//!
//! Shared state deciding which key may emit long-press/repeat/short-press
//! events and which key is the chord partner. The arbiter performs no
//! polling or timing of its own; it is only read and written from key
//! transitions, and is passed explicitly to every [`Key::tick`] so tests
//! can construct isolated instances.
//!
//! [`Key::tick`]: super::Key::tick

use crate::keypad::KeyId;

/// Arbitration state shared by all keys of one panel
///
/// At most one key is `active` at any time. `candidate` is only set
/// while `active` is set and is cleared whenever `active` is cleared.
/// The repeat counter is mutated only by the currently active key.
pub struct Arbiter<'a> {
    /// Key currently holding exclusive event rights
    active: Option<KeyId>,
    /// Key that pressed while `active` was already held (chord partner)
    candidate: Option<KeyId>,
    /// Repeat ticks emitted by the active key since its press began
    repeat_count: u16,
    /// Panel-wide chord callback (one for all key pairs)
    on_chord: Option<&'a dyn Fn(KeyId, KeyId)>,
}

impl<'a> Arbiter<'a> {
    /// Create an arbiter with no active key and no chord callback
    pub const fn new() -> Self {
        Self {
            active: None,
            candidate: None,
            repeat_count: 0,
            on_chord: None,
        }
    }

    /// Key currently holding exclusive event rights, if any
    pub fn active(&self) -> Option<KeyId> {
        self.active
    }

    /// Current chord partner, if any
    pub fn candidate(&self) -> Option<KeyId> {
        self.candidate
    }

    /// Repeat ticks emitted since the active key's press began
    ///
    /// Meaningful only while a key is active.
    pub fn repeat_count(&self) -> u16 {
        self.repeat_count
    }

    /// Register the panel-wide two-key chord callback
    ///
    /// The callback receives the key that detected the chord and its
    /// partner. Unset means chords are recognized but not reported.
    pub fn set_on_chord(&mut self, callback: &'a dyn Fn(KeyId, KeyId)) {
        self.on_chord = Some(callback);
    }

    /// Remove the chord callback
    pub fn clear_on_chord(&mut self) {
        self.on_chord = None;
    }

    /// Claim event rights for a key entering the pressed state
    ///
    /// Returns true iff the key became active. The first claimant wins;
    /// a second claimant becomes the chord candidate; further claimants
    /// leave the arbiter untouched.
    pub(crate) fn claim(&mut self, id: KeyId) -> bool {
        if self.active.is_none() {
            debug_assert!(self.candidate.is_none());
            self.active = Some(id);
            self.repeat_count = 0;
            true
        } else {
            debug_assert!(self.active != Some(id));
            if self.candidate.is_none() {
                self.candidate = Some(id);
            }
            false
        }
    }

    /// Release the arbiter when a key fully returns to released
    ///
    /// Only the active key resets the arbiter; a candidate or bystander
    /// releasing leaves the current press cycle undisturbed.
    pub(crate) fn release(&mut self, id: KeyId) {
        if self.active == Some(id) {
            self.active = None;
            self.candidate = None;
            self.repeat_count = 0;
        }
    }

    /// Count one repeat tick of the active key
    pub(crate) fn advance_repeat(&mut self) {
        self.repeat_count = self.repeat_count.saturating_add(1);
    }

    /// Report a recognized chord
    pub(crate) fn fire_chord(&self, detected_by: KeyId, partner: KeyId) {
        if let Some(callback) = self.on_chord {
            callback(detected_by, partner);
        }
    }
}

impl Default for Arbiter<'_> {
    fn default() -> Self {
        Self::new()
    }
}
