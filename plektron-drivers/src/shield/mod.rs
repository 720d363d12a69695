//! RGB LCD keypad shield driver
//!
//! The shield carries a single MCP23017 I2C port expander: port A reads
//! the five keys and drives the red/green backlight LEDs, port B drives
//! the blue LED and the HD44780 LCD bus. The driver keeps shadow copies
//! of both output ports so every update is a single register write.
//!
//! The key side implements [`KeySampler`], so the shield plugs straight
//! into a `plektron_core::Keypad` poll loop.

mod lcd;
mod regs;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use plektron_core::keypad::KeySamples;
use plektron_core::traits::KeySampler;

use heapless::Vec;

use lcd::LCD_CHUNK_BYTES;

/// Backlight colors
///
/// One bit per LED: red = 1, green = 2, blue = 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Violet = 5,
    Teal = 6,
    White = 7,
}

/// Driver for the RGB LCD keypad shield
///
/// Owns the I2C bus. All timed operations take a delay provider so the
/// driver itself never sleeps behind the caller's back.
pub struct KeypadShield<I2C> {
    i2c: I2C,
    /// Shadow of the GPIOA output latches (backlight red/green)
    shadow_a: u8,
    /// Shadow of the GPIOB output latches (backlight blue, LCD bus)
    shadow_b: u8,
    /// Shadow of the HD44780 display control register
    display_control: u8,
    /// Shadow of the HD44780 entry mode register
    entry_mode: u8,
}

impl<I2C: I2c> KeypadShield<I2C> {
    /// Create a shield driver; call [`init`](Self::init) before use
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            shadow_a: regs::PORTA_INITIAL,
            shadow_b: regs::PORTB_INITIAL,
            display_control: lcd::cmd::DISPLAY_CONTROL | lcd::cmd::DISPLAY_ON,
            entry_mode: lcd::cmd::ENTRY_MODE_SET,
        }
    }

    /// Bring up the expander and the LCD
    ///
    /// Configures the MCP23017 (key pins as inverted, pulled-up inputs;
    /// LED and LCD pins as outputs) and walks the HD44780 through its
    /// four-bit-mode initialization. Takes roughly 110 ms.
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), I2C::Error> {
        // Give the LCD time to finish its power-on reset
        delay.delay_ms(100);

        self.write_register(regs::IOCON, regs::IOCON_CONFIG)?;
        self.write_register(regs::GPIOA, self.shadow_a)?;
        self.write_register(regs::IODIRA, regs::PORTA_DIR)?;
        self.write_register(regs::GPPUA, regs::PORTA_PULLUPS)?;
        self.write_register(regs::GPIOB, self.shadow_b)?;
        self.write_register(regs::IODIRB, regs::PORTB_DIR)?;
        self.write_register(regs::IPOLA, regs::PORTA_KEY_POLARITY)?;

        // HD44780 wake-up: the controller may be in four-bit mode from
        // a previous run, so strobe "function set, eight bits" three
        // times before switching to four-bit mode (Hitachi datasheet
        // initialization by instruction).
        let mut buf: Vec<u8, LCD_CHUNK_BYTES> = Vec::new();
        let _ = buf.push(regs::GPIOB);
        self.push_nibble(&mut buf, 0b0011, true);
        self.i2c.write(regs::EXPANDER_ADDR, &buf)?;

        delay.delay_ms(5);

        let mut buf: Vec<u8, LCD_CHUNK_BYTES> = Vec::new();
        let _ = buf.push(regs::GPIOB);
        self.push_nibble(&mut buf, 0b0011, true);
        self.push_nibble(&mut buf, 0b0011, true);
        // In eight-bit mode for sure now; switch to four-bit
        self.push_nibble(&mut buf, 0b0010, true);
        // Two lines, 5x8 dots
        self.push_byte(&mut buf, lcd::cmd::FUNCTION_SET | lcd::cmd::LINE_MODE_2, true);
        self.push_byte(&mut buf, self.display_control, true);
        self.i2c.write(regs::EXPANDER_ADDR, &buf)?;

        self.clear(delay)
    }

    /// Sample the five key lines
    ///
    /// One GPIOA read per call; pressed keys read high thanks to the
    /// polarity inversion configured at init.
    pub fn read_keys(&mut self) -> Result<KeySamples, I2C::Error> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(regs::EXPANDER_ADDR, &[regs::GPIOA], &mut buf)?;
        Ok(KeySamples::from_port(buf[0] & regs::PORTA_KEY_MASK))
    }

    /// Set the backlight color
    pub fn set_color(&mut self, color: Color) -> Result<(), I2C::Error> {
        let bits = color as u8;
        // The LEDs are active low
        if bits & 0x01 != 0 {
            self.shadow_a &= !regs::LED_RED;
        } else {
            self.shadow_a |= regs::LED_RED;
        }
        if bits & 0x02 != 0 {
            self.shadow_a &= !regs::LED_GREEN;
        } else {
            self.shadow_a |= regs::LED_GREEN;
        }
        if bits & 0x04 != 0 {
            self.shadow_b &= !regs::LED_BLUE;
        } else {
            self.shadow_b |= regs::LED_BLUE;
        }
        self.write_register(regs::GPIOA, self.shadow_a)?;
        self.write_register(regs::GPIOB, self.shadow_b)
    }

    /// Write one expander register
    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), I2C::Error> {
        self.i2c.write(regs::EXPANDER_ADDR, &[reg, value])
    }
}

impl<I2C: I2c> KeySampler for KeypadShield<I2C> {
    type Error = I2C::Error;

    fn sample(&mut self) -> Result<KeySamples, Self::Error> {
        self.read_keys()
    }
}

/// Mock I2C bus recording every write transaction
#[cfg(test)]
pub(crate) struct MockBus {
    pub writes: Vec<Vec<u8, 32>, 64>,
    pub read_value: u8,
}

#[cfg(test)]
impl MockBus {
    pub fn new() -> Self {
        Self {
            writes: Vec::new(),
            read_value: 0,
        }
    }
}

#[cfg(test)]
impl embedded_hal::i2c::ErrorType for MockBus {
    type Error = core::convert::Infallible;
}

#[cfg(test)]
impl I2c for MockBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [embedded_hal::i2c::Operation<'_>],
    ) -> Result<(), Self::Error> {
        assert_eq!(address, regs::EXPANDER_ADDR, "unexpected I2C address");
        for op in operations.iter_mut() {
            match op {
                embedded_hal::i2c::Operation::Write(bytes) => {
                    let mut record = Vec::new();
                    record.extend_from_slice(bytes).unwrap();
                    self.writes.push(record).unwrap();
                }
                embedded_hal::i2c::Operation::Read(buf) => {
                    buf.fill(self.read_value);
                }
            }
        }
        Ok(())
    }
}

/// Delay provider that does not wait (register traffic is still exact)
#[cfg(test)]
pub(crate) struct NoopDelay;

#[cfg(test)]
impl DelayNs for NoopDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use plektron_core::keypad::KeyId;

    #[test]
    fn test_init_configures_expander() {
        let mut shield = KeypadShield::new(MockBus::new());
        shield.init(&mut NoopDelay).unwrap();

        let expected: &[&[u8]] = &[
            &[regs::IOCON, 0b1010_1000],
            &[regs::GPIOA, 0b1100_0000],
            &[regs::IODIRA, 0b0011_1111],
            &[regs::GPPUA, 0b0011_1111],
            &[regs::GPIOB, 0b0010_0001],
            &[regs::IODIRB, 0b0000_0000],
            &[regs::IPOLA, 0b0001_1111],
        ];
        for (i, want) in expected.iter().enumerate() {
            assert_eq!(&shield.i2c.writes[i][..], *want, "register write {}", i);
        }

        // Followed by the LCD wake-up, mode switch, and clear - all on GPIOB
        assert_eq!(shield.i2c.writes.len(), expected.len() + 3);
        for lcd_write in &shield.i2c.writes[expected.len()..] {
            assert_eq!(lcd_write[0], regs::GPIOB);
        }

        // First wake-up strobe: "function set, eight bits" with E toggled
        assert_eq!(&shield.i2c.writes[7][..], &[regs::GPIOB, 0x39, 0x19]);
    }

    #[test]
    fn test_read_keys_masks_port() {
        let mut bus = MockBus::new();
        bus.read_value = 0b1101_0001; // LED readback bits plus Left+Select
        let mut shield = KeypadShield::new(bus);

        let samples = shield.read_keys().unwrap();
        assert!(samples.pressed(KeyId::Select));
        assert!(samples.pressed(KeyId::Left));
        assert!(!samples.pressed(KeyId::Up));
        assert!(!samples.pressed(KeyId::Down));
        assert!(!samples.pressed(KeyId::Right));

        // The read was addressed to GPIOA
        assert_eq!(&shield.i2c.writes[0][..], &[regs::GPIOA]);
    }

    #[test]
    fn test_sampler_trait_matches_read_keys() {
        let mut bus = MockBus::new();
        bus.read_value = 0b0000_0100;
        let mut shield = KeypadShield::new(bus);

        let samples = KeySampler::sample(&mut shield).unwrap();
        assert!(samples.pressed(KeyId::Down));
    }

    #[test]
    fn test_backlight_encoding() {
        // (color, GPIOA value, GPIOB value) - LEDs are active low
        let cases = [
            (Color::Black, 0b1100_0000, 0b0010_0001),
            (Color::Red, 0b1000_0000, 0b0010_0001),
            (Color::Green, 0b0100_0000, 0b0010_0001),
            (Color::Yellow, 0b0000_0000, 0b0010_0001),
            (Color::Blue, 0b1100_0000, 0b0010_0000),
            (Color::Violet, 0b1000_0000, 0b0010_0000),
            (Color::Teal, 0b0100_0000, 0b0010_0000),
            (Color::White, 0b0000_0000, 0b0010_0000),
        ];

        for (color, port_a, port_b) in cases {
            let mut shield = KeypadShield::new(MockBus::new());
            shield.set_color(color).unwrap();
            assert_eq!(
                &shield.i2c.writes[0][..],
                &[regs::GPIOA, port_a],
                "{:?} port A",
                color
            );
            assert_eq!(
                &shield.i2c.writes[1][..],
                &[regs::GPIOB, port_b],
                "{:?} port B",
                color
            );
        }
    }
}
