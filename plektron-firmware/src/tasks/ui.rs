//! Gesture display task
//!
//! Echoes recognized gestures to the LCD's second row and maps each
//! key to a backlight color.

use core::fmt::Write;

use defmt::*;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use heapless::String;

use plektron_core::KeyId;
use plektron_drivers::Color;

use crate::channels::{GestureEvent, GESTURES};
use crate::Shield;

/// LCD width in characters
const LCD_COLS: usize = 16;

/// Backlight color shown while a key's gesture is displayed
fn key_color(id: KeyId) -> Color {
    match id {
        KeyId::Select => Color::White,
        KeyId::Right => Color::Red,
        KeyId::Down => Color::Green,
        KeyId::Up => Color::Blue,
        KeyId::Left => Color::Violet,
    }
}

fn key_label(id: KeyId) -> &'static str {
    match id {
        KeyId::Select => "select",
        KeyId::Right => "right",
        KeyId::Down => "down",
        KeyId::Up => "up",
        KeyId::Left => "left",
    }
}

/// UI task - renders gestures as they arrive
#[embassy_executor::task]
pub async fn ui_task(shield: &'static Mutex<CriticalSectionRawMutex, Shield>) {
    info!("UI task started");

    loop {
        let event = GESTURES.receive().await;
        debug!("Gesture: {:?}", event);

        let mut line: String<LCD_COLS> = String::new();
        let color = match event {
            GestureEvent::Short(id) => {
                let _ = write!(line, "short {}", key_label(id));
                key_color(id)
            }
            GestureEvent::Long(id) => {
                let _ = write!(line, "long {}", key_label(id));
                key_color(id)
            }
            GestureEvent::Repeat(id, n) => {
                let _ = write!(line, "{} x{}", key_label(id), n);
                key_color(id)
            }
            GestureEvent::Chord(a, b) => {
                let _ = write!(line, "{}+{}", key_label(a), key_label(b));
                Color::Yellow
            }
        };

        // Pad to overwrite whatever was displayed before
        while line.len() < LCD_COLS {
            let _ = line.push(' ');
        }

        let mut shield = shield.lock().await;
        shield.set_color(color).ok();
        shield.set_cursor(0, 1).ok();
        shield.write_str(&line).ok();
    }
}
