//! MCP23017 register map and shield pin assignment
//!
//! Register addresses are for 8-bit addressing mode (IOCON.BANK = 1).
//! IOCON itself is written at its 16-bit-mode address, which is safe in
//! either mode because that address is unmapped once BANK is set.

/// Fixed I2C address of the shield's expander (A0-A2 strapped low)
pub const EXPANDER_ADDR: u8 = 0x20;

/// Configuration register (16-bit-mode address, see module docs)
pub const IOCON: u8 = 0x0B;
/// Port A direction (1 = input)
pub const IODIRA: u8 = 0x00;
/// Port A input polarity (1 = inverted)
pub const IPOLA: u8 = 0x01;
/// Port A pull-ups (1 = enabled)
pub const GPPUA: u8 = 0x06;
/// Port A data
pub const GPIOA: u8 = 0x09;
/// Port B direction (1 = input)
pub const IODIRB: u8 = 0x10;
/// Port B data
pub const GPIOB: u8 = 0x19;

/// BANK = 1 (8-bit mode), SEQOP = 1 (no address increment), DISSLW = 1
pub const IOCON_CONFIG: u8 = 0b1010_1000;

// Port A: keys on bits 0-4, red/green backlight LEDs on bits 6/7
/// Bits 6 and 7 are outputs, everything else input
pub const PORTA_DIR: u8 = 0b0011_1111;
/// Pull-ups on all input pins
pub const PORTA_PULLUPS: u8 = 0b0011_1111;
/// Invert the key bits so that "pressed" reads high
pub const PORTA_KEY_POLARITY: u8 = 0b0001_1111;
/// The five key lines
pub const PORTA_KEY_MASK: u8 = 0b0001_1111;
/// Red backlight LED (active low)
pub const LED_RED: u8 = 1 << 6;
/// Green backlight LED (active low)
pub const LED_GREEN: u8 = 1 << 7;

// Port B: blue backlight LED on bit 0, LCD bus on bits 1-7
/// All port B pins are outputs
pub const PORTB_DIR: u8 = 0x00;
/// Blue backlight LED (active low)
pub const LED_BLUE: u8 = 1 << 0;
/// LCD enable strobe
pub const LCD_ENABLE: u8 = 1 << 5;
/// LCD register select (high = data register)
pub const LCD_REGISTER_SELECT: u8 = 1 << 7;

/// Power-on port A shadow: backlight LEDs off
pub const PORTA_INITIAL: u8 = LED_RED | LED_GREEN;
/// Power-on port B shadow: blue LED off, LCD enable high
pub const PORTB_INITIAL: u8 = LED_BLUE | LCD_ENABLE;
