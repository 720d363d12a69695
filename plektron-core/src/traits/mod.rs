//! Hardware abstraction traits
//!
//! These traits define the interface between the gesture engine
//! and hardware-specific implementations.

use crate::keypad::KeySamples;

/// Raw key-line sampler
///
/// Implemented by the hardware side (e.g. a port expander read). One
/// call per polling cycle; the sampler returns the momentary line
/// states with no debounce and no memory.
pub trait KeySampler {
    /// Bus or transport error type
    type Error;

    /// Sample all key lines once
    fn sample(&mut self) -> Result<KeySamples, Self::Error>;
}
