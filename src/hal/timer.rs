//! Timer set-up: Timer1 paces the countdown/display interrupt at 100 Hz and
//! Timer0 keeps the millisecond clock behind `current_time()`.

use crate::config::{CPU_FREQ_HZ, MILLIS_HZ, TICK_HZ};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prescaler {
    Stop = 0,
    Direct = 1,
    Div8 = 2,
    Div64 = 3,
    Div256 = 4,
    Div1024 = 5,
}

impl Prescaler {
    pub const fn divisor(self) -> u32 {
        match self {
            Prescaler::Stop => 0,
            Prescaler::Direct => 1,
            Prescaler::Div8 => 8,
            Prescaler::Div64 => 64,
            Prescaler::Div256 => 256,
            Prescaler::Div1024 => 1024,
        }
    }

    /// Clock-select bits (CSn2:0).
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// CTC compare value for `target_hz` interrupts.
pub const fn compare_value(cpu_hz: u32, prescaler: Prescaler, target_hz: u32) -> u32 {
    cpu_hz / prescaler.divisor() / target_hz - 1
}

pub const TIMER1_PRESCALER: Prescaler = Prescaler::Div8;
pub const TIMER1_COMPARE: u16 = compare_value(CPU_FREQ_HZ, TIMER1_PRESCALER, TICK_HZ) as u16;

pub const TIMER0_PRESCALER: Prescaler = Prescaler::Div64;
pub const TIMER0_COMPARE: u8 = compare_value(CPU_FREQ_HZ, TIMER0_PRESCALER, MILLIS_HZ) as u8;

#[cfg(target_arch = "avr")]
mod avr {
    use super::*;
    use avr_device::atmega324pa::{TC0, TC1};
    use core::cell::Cell;
    use critical_section::Mutex;

    const WGM12: u8 = 1 << 3;
    const WGM01: u8 = 1 << 1;
    const OCIE_A: u8 = 1 << 1;
    const OCF_A: u8 = 1 << 1;

    static MILLIS: Mutex<Cell<u32>> = Mutex::new(Cell::new(0));

    /// 10 ms compare-match interrupt in CTC mode.
    pub fn init_timer1(tc1: &TC1) {
        tc1.tccr1a.write(|w| unsafe { w.bits(0) });
        tc1.ocr1a.write(|w| unsafe { w.bits(TIMER1_COMPARE) });
        tc1.tccr1b
            .write(|w| unsafe { w.bits(WGM12 | TIMER1_PRESCALER.bits()) });
        tc1.timsk1.write(|w| unsafe { w.bits(OCIE_A) });
        tc1.tifr1.write(|w| unsafe { w.bits(OCF_A) });
    }

    /// 1 ms compare-match interrupt in CTC mode.
    pub fn init_timer0(tc0: &TC0) {
        tc0.tcnt0.write(|w| unsafe { w.bits(0) });
        tc0.ocr0a.write(|w| unsafe { w.bits(TIMER0_COMPARE) });
        tc0.tccr0a.write(|w| unsafe { w.bits(WGM01) });
        tc0.tccr0b.write(|w| unsafe { w.bits(TIMER0_PRESCALER.bits()) });
        tc0.timsk0.write(|w| unsafe { w.bits(OCIE_A) });
        tc0.tifr0.write(|w| unsafe { w.bits(OCF_A) });
    }

    /// Monotonic milliseconds since `init_timer0`.
    #[derive(Clone, Copy, Default)]
    pub struct SystemClock;

    impl SystemClock {
        pub fn now(&self) -> u32 {
            critical_section::with(|cs| MILLIS.borrow(cs).get())
        }
    }

    #[avr_device::interrupt(atmega324pa)]
    fn TIMER0_COMPA() {
        critical_section::with(|cs| {
            let millis = MILLIS.borrow(cs);
            millis.set(millis.get().wrapping_add(1));
        });
    }
}

#[cfg(target_arch = "avr")]
pub use avr::{init_timer0, init_timer1, SystemClock};
