//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in plektron-core for the RGB LCD keypad shield hardware:
//!
//! - MCP23017 I2C port expander (key lines, LCD bus, backlight pins)
//! - Five-key sampler feeding the gesture engine
//! - HD44780 character LCD on a four-bit bus behind the expander
//! - RGB backlight control

#![no_std]
#![deny(unsafe_code)]

pub mod shield;

pub use shield::{Color, KeypadShield};
