//! Board pin map (ATmega324A, CSSE2010 IO board)
//!
//! | signal             | pin      |
//! |--------------------|----------|
//! | segments a-g, dp   | PORTA    |
//! | push buttons B0-B3 | PB0-PB3  |
//! | lives LEDs         | PORTC    |
//! | digit select (CC)  | PD7      |

use avr_device::atmega324pa::{PORTA, PORTB, PORTC, PORTD};
use core::convert::Infallible;
use embedded_hal::digital::v2::{InputPin, OutputPin};

use super::BytePort;

const DIGIT_SELECT: u8 = 1 << 7;
const BUTTON_MASK: u8 = 0x0F;

/// Sets data directions for every pin the game drives or reads.
pub fn configure(porta: &PORTA, portb: &PORTB, portc: &PORTC, portd: &PORTD) {
    porta.ddra.write(|w| unsafe { w.bits(0xFF) });
    portc.ddrc.write(|w| unsafe { w.bits(0xFF) });
    portd
        .ddrd
        .modify(|r, w| unsafe { w.bits(r.bits() | DIGIT_SELECT) });
    portb
        .ddrb
        .modify(|r, w| unsafe { w.bits(r.bits() & !BUTTON_MASK) });
}

/// Seven-segment data lines.
#[derive(Clone, Copy, Default)]
pub struct SegmentPort;

impl BytePort for SegmentPort {
    #[inline]
    fn write(&mut self, value: u8) {
        // SAFETY: PORTA is written only from the timer interrupt.
        unsafe { (*PORTA::ptr()).porta.write(|w| w.bits(value)) }
    }
}

/// Lives indicator LEDs.
#[derive(Clone, Copy, Default)]
pub struct LivesPort;

impl BytePort for LivesPort {
    fn write(&mut self, value: u8) {
        // SAFETY: PORTC is owned by the main loop.
        unsafe { (*PORTC::ptr()).portc.write(|w| w.bits(value)) }
    }
}

/// Common-cathode digit select line.
#[derive(Clone, Copy, Default)]
pub struct DigitSelectPin;

impl OutputPin for DigitSelectPin {
    type Error = Infallible;

    #[inline]
    fn set_high(&mut self) -> Result<(), Infallible> {
        // SAFETY: PD7 is written only from the timer interrupt.
        unsafe {
            (*PORTD::ptr())
                .portd
                .modify(|r, w| w.bits(r.bits() | DIGIT_SELECT))
        };
        Ok(())
    }

    #[inline]
    fn set_low(&mut self) -> Result<(), Infallible> {
        // SAFETY: PD7 is written only from the timer interrupt.
        unsafe {
            (*PORTD::ptr())
                .portd
                .modify(|r, w| w.bits(r.bits() & !DIGIT_SELECT))
        };
        Ok(())
    }
}

/// One push button on PORTB.
#[derive(Clone, Copy)]
pub struct ButtonPin {
    bit: u8,
}

impl ButtonPin {
    pub const fn new(bit: u8) -> Self {
        Self { bit }
    }

    pub const fn all() -> [ButtonPin; 4] {
        [Self::new(0), Self::new(1), Self::new(2), Self::new(3)]
    }
}

impl InputPin for ButtonPin {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Infallible> {
        // SAFETY: read-only access to PINB.
        let pins = unsafe { (*PORTB::ptr()).pinb.read().bits() };
        Ok(pins & (1 << self.bit) != 0)
    }

    fn is_low(&self) -> Result<bool, Infallible> {
        self.is_high().map(|high| !high)
    }
}
