//! Plektron demo firmware
//!
//! Polls the RGB LCD keypad shield once per cycle, feeds the gesture
//! engine, and echoes recognized gestures to the LCD and backlight.
//!
//! Named after the Greek "plektron" - the small tool used to strike
//! the strings of a lyre.

#![no_std]
#![no_main]

mod channels;
mod tasks;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use plektron_drivers::{Color, KeypadShield};

/// The shield driver behind its bus lock
///
/// The input and UI tasks share one I2C device, so all access goes
/// through this mutex.
pub type Shield = KeypadShield<I2c<'static, I2C0, i2c::Blocking>>;

static SHIELD: StaticCell<Mutex<CriticalSectionRawMutex, Shield>> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Plektron firmware starting...");

    let p = embassy_rp::init(Default::default());

    // Shield on I2C0 (GP4 = SDA, GP5 = SCL)
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c::Config::default());

    let mut shield = KeypadShield::new(i2c);
    match shield.init(&mut Delay) {
        Ok(()) => info!("Shield initialized"),
        Err(e) => error!("Shield init failed: {:?}", e),
    }
    shield.set_color(Color::Teal).ok();
    shield.write_str("Plektron v0.1").ok();

    let shield = SHIELD.init(Mutex::new(shield));

    spawner.spawn(tasks::input::input_task(shield)).unwrap();
    spawner.spawn(tasks::ui::ui_task(shield)).unwrap();

    info!("All tasks spawned");
}
