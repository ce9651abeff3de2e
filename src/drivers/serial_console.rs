use core::convert::Infallible;

use embedded_hal::serial::Write;
use ufmt::{uWrite, uwrite};

/// Terminal output over a serial transmitter. Also the logging sink.
pub struct SerialConsole<T> {
    tx: T,
}

impl<T: Write<u8>> SerialConsole<T> {
    pub fn new(tx: T) -> Self {
        Self { tx }
    }

    pub fn write_byte(&mut self, byte: u8) {
        nb::block!(self.tx.write(byte)).ok();
    }

    pub fn write_line(&mut self, s: &str) {
        self.write_str(s).ok();
        self.write_str("\r\n").ok();
    }

    pub fn clear_terminal(&mut self) {
        self.write_str("\x1b[2J").ok();
    }

    pub fn clear_to_end_of_line(&mut self) {
        self.write_str("\x1b[K").ok();
    }

    /// 1-based column `x`, row `y`.
    pub fn move_cursor(&mut self, x: u8, y: u8) {
        uwrite!(self, "\x1b[{};{}H", y, x).ok();
    }

    pub fn flush(&mut self) {
        nb::block!(self.tx.flush()).ok();
    }

    pub fn into_inner(self) -> T {
        self.tx
    }
}

impl<T: Write<u8>> uWrite for SerialConsole<T> {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
        for byte in s.bytes() {
            self.write_byte(byte);
        }
        Ok(())
    }
}
