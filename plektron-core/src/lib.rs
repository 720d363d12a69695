//! Board-agnostic core logic for the Plektron keypad panel
//!
//! This crate contains all input logic that does not depend on
//! specific hardware implementations:
//!
//! - Per-key gesture state machine (debounce, short press, long press,
//!   auto-repeat)
//! - Cross-key arbitration for exclusive two-key chords
//! - Timing configuration
//! - Hardware abstraction trait for key sampling
//!
//! The engine is poll-driven: once per polling cycle the caller feeds
//! every key its latest raw sample together with the current monotonic
//! time, and registered callbacks fire as gestures are recognized.

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod gesture;
pub mod keypad;
pub mod traits;

pub use config::KeyTiming;
pub use gesture::{Arbiter, Key, KeyState};
pub use keypad::{KeyId, KeySamples, Keypad, KEY_COUNT, KEY_IDS};
pub use traits::KeySampler;
