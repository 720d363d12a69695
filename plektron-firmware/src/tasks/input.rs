//! Key polling task
//!
//! Advances all key machines once per polling cycle from a single
//! ticker. The gesture engine depends on exactly this cadence model:
//! no key is ever ticked from a second execution context.

use defmt::*;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, Instant, Ticker};

use plektron_core::{KeyId, KeyTiming, Keypad};

use crate::channels::{publish, GestureEvent};
use crate::Shield;

/// Polling cadence in milliseconds
pub const POLL_INTERVAL_MS: u64 = 5;

/// Register the demo gesture callbacks
///
/// Every key reports short presses; Up/Down additionally auto-repeat
/// (the classic value-adjustment pattern), Select reports a long press,
/// and any two-key combination is reported as a chord.
fn bind_callbacks(keypad: &mut Keypad<'static>) {
    keypad
        .key_mut(KeyId::Select)
        .set_on_short_press(&|| publish(GestureEvent::Short(KeyId::Select)));
    keypad
        .key_mut(KeyId::Right)
        .set_on_short_press(&|| publish(GestureEvent::Short(KeyId::Right)));
    keypad
        .key_mut(KeyId::Down)
        .set_on_short_press(&|| publish(GestureEvent::Short(KeyId::Down)));
    keypad
        .key_mut(KeyId::Up)
        .set_on_short_press(&|| publish(GestureEvent::Short(KeyId::Up)));
    keypad
        .key_mut(KeyId::Left)
        .set_on_short_press(&|| publish(GestureEvent::Short(KeyId::Left)));

    keypad
        .key_mut(KeyId::Select)
        .set_on_long_press(&|| publish(GestureEvent::Long(KeyId::Select)));

    keypad
        .key_mut(KeyId::Up)
        .set_on_repeat_count(&|n| publish(GestureEvent::Repeat(KeyId::Up, n)));
    keypad
        .key_mut(KeyId::Down)
        .set_on_repeat_count(&|n| publish(GestureEvent::Repeat(KeyId::Down, n)));

    keypad.set_on_chord(&|a, b| publish(GestureEvent::Chord(a, b)));
}

/// Poll task - samples the shield and advances the gesture engine
#[embassy_executor::task]
pub async fn input_task(shield: &'static Mutex<CriticalSectionRawMutex, Shield>) {
    info!("Input task started");

    let mut keypad = Keypad::new(KeyTiming::default());
    bind_callbacks(&mut keypad);

    let mut ticker = Ticker::every(Duration::from_millis(POLL_INTERVAL_MS));
    let start = Instant::now();

    loop {
        ticker.next().await;

        let samples = {
            let mut shield = shield.lock().await;
            shield.read_keys()
        };

        match samples {
            Ok(samples) => keypad.poll(samples, start.elapsed().as_millis()),
            Err(e) => warn!("Key read failed: {:?}", e),
        }
    }
}
