//! Key gesture recognition
//!
//! One state machine per key line plus one shared [`Arbiter`] deciding
//! which key currently holds exclusive event rights. All machines are
//! advanced synchronously from a single polling cadence; see the crate
//! docs for the concurrency model.

mod arbiter;
mod key;

pub use arbiter::Arbiter;
pub use key::{Key, KeyState};
