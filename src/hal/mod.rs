pub mod timer;
pub mod uart;

#[cfg(target_arch = "avr")]
pub mod gpio;

pub use timer::{compare_value, Prescaler};
pub use uart::Buffer;

/// An 8-bit output port written as a whole, like the segment lines or the
/// lives LEDs.
pub trait BytePort {
    fn write(&mut self, value: u8);
}
