//! Interrupt-driven USART0 with ring buffers in both directions.

use crate::config::{CPU_FREQ_HZ, UART_BAUD};

// Buffer size must be power of 2 for efficient masking
const BUFFER_SIZE: usize = 32;
const BUFFER_MASK: usize = BUFFER_SIZE - 1;

/// UBRR value for normal-speed asynchronous mode.
pub const fn ubrr(cpu_hz: u32, baud: u32) -> u16 {
    (cpu_hz / (16 * baud) - 1) as u16
}

pub const UBRR_VALUE: u16 = ubrr(CPU_FREQ_HZ, UART_BAUD);

pub struct Buffer {
    data: [u8; BUFFER_SIZE],
    write_idx: usize,
    read_idx: usize,
    overruns: u16,
}

impl Buffer {
    pub const fn new() -> Self {
        Self {
            data: [0; BUFFER_SIZE],
            write_idx: 0,
            read_idx: 0,
            overruns: 0,
        }
    }

    /// Queues a byte; a full buffer drops it and counts an overrun.
    pub fn write(&mut self, byte: u8) -> bool {
        let next_write = (self.write_idx + 1) & BUFFER_MASK;
        if next_write != self.read_idx {
            self.data[self.write_idx] = byte;
            self.write_idx = next_write;
            true
        } else {
            self.overruns = self.overruns.saturating_add(1);
            false
        }
    }

    pub fn read(&mut self) -> Option<u8> {
        if self.read_idx != self.write_idx {
            let byte = self.data[self.read_idx];
            self.read_idx = (self.read_idx + 1) & BUFFER_MASK;
            Some(byte)
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.read_idx == self.write_idx
    }

    pub fn clear(&mut self) {
        self.read_idx = self.write_idx;
    }

    pub fn overruns(&self) -> u16 {
        self.overruns
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "avr")]
mod avr {
    use super::*;
    use avr_device::atmega324pa::USART0;
    use core::cell::RefCell;
    use core::convert::Infallible;
    use critical_section::Mutex;
    use embedded_hal::serial::{Read, Write};

    const RXEN: u8 = 1 << 4;
    const TXEN: u8 = 1 << 3;
    const RXCIE: u8 = 1 << 7;
    const UDRIE: u8 = 1 << 5;
    // 8 data bits, no parity, 1 stop bit
    const UCSZ_8N1: u8 = 0b0000_0110;

    static TX_BUFFER: Mutex<RefCell<Buffer>> = Mutex::new(RefCell::new(Buffer::new()));
    static RX_BUFFER: Mutex<RefCell<Buffer>> = Mutex::new(RefCell::new(Buffer::new()));

    fn usart() -> &'static avr_device::atmega324pa::usart0::RegisterBlock {
        // SAFETY: only the UCSR0B interrupt-enable bits are shared, and those
        // are changed inside critical sections.
        unsafe { &*USART0::ptr() }
    }

    pub fn init_uart(usart0: &USART0) {
        usart0.ubrr0.write(|w| unsafe { w.bits(UBRR_VALUE) });
        usart0.ucsr0c.write(|w| unsafe { w.bits(UCSZ_8N1) });
        usart0
            .ucsr0b
            .write(|w| unsafe { w.bits(RXEN | TXEN | RXCIE) });
    }

    /// Receive half: drains bytes queued by the RX interrupt.
    #[derive(Clone, Copy, Default)]
    pub struct UartRx;

    /// Transmit half: queues bytes for the data-register-empty interrupt.
    #[derive(Clone, Copy, Default)]
    pub struct UartTx;

    impl UartRx {
        /// Discards anything typed before the game starts.
        pub fn clear(&mut self) {
            critical_section::with(|cs| RX_BUFFER.borrow_ref_mut(cs).clear());
        }
    }

    /// Receive bytes dropped because the buffer was full.
    pub fn overrun_count() -> u16 {
        critical_section::with(|cs| RX_BUFFER.borrow_ref(cs).overruns())
    }

    impl Read<u8> for UartRx {
        type Error = Infallible;

        fn read(&mut self) -> nb::Result<u8, Infallible> {
            critical_section::with(|cs| RX_BUFFER.borrow_ref_mut(cs).read())
                .ok_or(nb::Error::WouldBlock)
        }
    }

    impl Write<u8> for UartTx {
        type Error = Infallible;

        fn write(&mut self, word: u8) -> nb::Result<(), Infallible> {
            critical_section::with(|cs| {
                let queued = TX_BUFFER.borrow_ref_mut(cs).write(word);
                let ucsr0b = &usart().ucsr0b;
                ucsr0b.modify(|r, w| unsafe { w.bits(r.bits() | UDRIE) });
                if queued {
                    Ok(())
                } else {
                    Err(nb::Error::WouldBlock)
                }
            })
        }

        fn flush(&mut self) -> nb::Result<(), Infallible> {
            if critical_section::with(|cs| TX_BUFFER.borrow_ref(cs).is_empty()) {
                Ok(())
            } else {
                Err(nb::Error::WouldBlock)
            }
        }
    }

    #[avr_device::interrupt(atmega324pa)]
    fn USART0_RX() {
        let byte = usart().udr0.read().bits();
        critical_section::with(|cs| RX_BUFFER.borrow_ref_mut(cs).write(byte));
    }

    #[avr_device::interrupt(atmega324pa)]
    fn USART0_UDRE() {
        match critical_section::with(|cs| TX_BUFFER.borrow_ref_mut(cs).read()) {
            Some(byte) => usart().udr0.write(|w| unsafe { w.bits(byte) }),
            None => usart()
                .ucsr0b
                .modify(|r, w| unsafe { w.bits(r.bits() & !UDRIE) }),
        }
    }
}

#[cfg(target_arch = "avr")]
pub use avr::{init_uart, overrun_count, UartRx, UartTx};
