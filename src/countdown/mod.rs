//! Countdown clock and display multiplexer
//!
//! [`CountdownState`] is owned by the 10 ms timer interrupt, which calls
//! [`isr_tick`] once per compare match. The main loop drives it through a
//! [`Countdown`] handle; every handle method runs inside one critical
//! section because `remaining` is 16 bits wide and the AVR moves it a byte
//! at a time.

pub mod display;

use core::cell::RefCell;

use critical_section::{CriticalSection, Mutex};

pub use display::{render, Band, DigitSelect, SegmentOutput};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CountdownState {
    /// Hundredths of a second left.
    remaining: u16,
    running: bool,
    display_enabled: bool,
    /// Multiplex phase: right digit is refreshed when set.
    low_digit_active: bool,
}

impl CountdownState {
    pub const fn new() -> Self {
        Self {
            remaining: 0,
            running: false,
            display_enabled: false,
            low_digit_active: false,
        }
    }

    pub const fn remaining(&self) -> u16 {
        self.remaining
    }

    pub const fn is_running(&self) -> bool {
        self.running
    }

    pub const fn display_enabled(&self) -> bool {
        self.display_enabled
    }

    pub const fn low_digit_active(&self) -> bool {
        self.low_digit_active
    }

    /// One timer tick: count down, flip the multiplex phase and work out
    /// what the display should show.
    pub fn tick(&mut self) -> SegmentOutput {
        if self.running && self.remaining > 0 {
            self.remaining -= 1;
        }

        self.low_digit_active = !self.low_digit_active;

        if self.display_enabled && self.remaining > 0 && self.running {
            render(self.remaining, self.low_digit_active)
        } else if self.remaining == 0 {
            display::EXPIRED
        } else if !self.display_enabled {
            SegmentOutput::Blank
        } else {
            // paused with time left: keep whatever is lit
            SegmentOutput::Hold
        }
    }

    fn reset(&mut self, start: u16) {
        self.remaining = start;
        self.running = false;
        self.display_enabled = false;
    }

    fn start(&mut self) {
        self.display_enabled = true;
        self.running = true;
    }

    fn stop(&mut self) {
        self.remaining = 0;
        self.running = false;
        self.display_enabled = false;
    }
}

impl Default for CountdownState {
    fn default() -> Self {
        Self::new()
    }
}

/// Interrupt-side entry point, run under the handler's critical section.
#[inline]
pub fn isr_tick(cs: CriticalSection<'_>, cell: &Mutex<RefCell<CountdownState>>) -> SegmentOutput {
    cell.borrow_ref_mut(cs).tick()
}

/// Whole seconds left, rounded up.
#[inline]
pub const fn whole_seconds(hundredths: u16) -> u16 {
    ((hundredths as u32 + 99) / 100) as u16
}

/// Main-loop handle on the interrupt-owned countdown.
#[derive(Clone, Copy)]
pub struct Countdown<'a> {
    cell: &'a Mutex<RefCell<CountdownState>>,
    start: u16,
}

impl<'a> Countdown<'a> {
    /// `start` is the value loaded by [`reset_countdown`](Self::reset_countdown),
    /// in hundredths of a second.
    pub const fn new(cell: &'a Mutex<RefCell<CountdownState>>, start: u16) -> Self {
        Self { cell, start }
    }

    fn with<R>(&self, f: impl FnOnce(&mut CountdownState) -> R) -> R {
        critical_section::with(|cs| f(&mut self.cell.borrow_ref_mut(cs)))
    }

    /// Copies `remaining` out with interrupts masked, then restores the
    /// previous interrupt state.
    pub fn sample_countdown(&self) -> u16 {
        whole_seconds(self.with(|state| state.remaining))
    }

    /// Full state copy, taken the same way as `sample_countdown`.
    pub fn snapshot(&self) -> CountdownState {
        self.with(|state| *state)
    }

    /// Reload for a new crossing. The clock stays stopped and dark until
    /// `start_countdown`.
    pub fn reset_countdown(&self) {
        let start = self.start;
        self.with(|state| state.reset(start));
    }

    pub fn start_countdown(&self) {
        self.with(CountdownState::start);
    }

    pub fn pause_countdown(&self) {
        self.with(|state| state.running = false);
    }

    pub fn resume_countdown(&self) {
        self.with(|state| state.running = true);
    }

    pub fn stop_countdown(&self) {
        self.with(CountdownState::stop);
    }
}
