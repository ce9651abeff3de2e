use embedded_hal::digital::v2::InputPin;

use crate::config::BUTTON_DEBOUNCE_MS;
use crate::input::{Button, ButtonSource};

/// Polled, debounced push buttons B0-B3. Buttons are active low.
///
/// A new level only counts once it has held for [`BUTTON_DEBOUNCE_MS`] on
/// the millisecond clock, however often the main loop samples.
pub struct ButtonHandler<P> {
    buttons: [P; 4],
    states: [bool; 4],
    /// When the raw level first disagreed with the debounced state.
    changed_at: [Option<u32>; 4],
    /// Press edges not yet handed out, bit n = button n.
    pending: u8,
}

impl<P: InputPin> ButtonHandler<P> {
    pub fn new(buttons: [P; 4]) -> Self {
        Self {
            buttons,
            states: [false; 4],
            changed_at: [None; 4],
            pending: 0,
        }
    }

    /// Samples every button once at `now` ms and records press edges.
    pub fn sample(&mut self, now: u32) {
        for (idx, button) in self.buttons.iter().enumerate() {
            let raw_state = matches!(button.is_low(), Ok(true));

            if raw_state == self.states[idx] {
                self.changed_at[idx] = None;
                continue;
            }

            let since = *self.changed_at[idx].get_or_insert(now);
            if now.wrapping_sub(since) >= BUTTON_DEBOUNCE_MS {
                self.states[idx] = raw_state;
                self.changed_at[idx] = None;
                if raw_state {
                    self.pending |= 1 << idx;
                }
            }
        }
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        self.states[button as usize]
    }

    /// Drops any presses not yet collected.
    pub fn clear(&mut self) {
        self.pending = 0;
    }

    pub fn release(self) -> [P; 4] {
        self.buttons
    }
}

impl<P: InputPin> ButtonSource for ButtonHandler<P> {
    fn button_pushed(&mut self, now: u32) -> Option<Button> {
        self.sample(now);
        if self.pending == 0 {
            return None;
        }
        let idx = self.pending.trailing_zeros() as usize;
        self.pending &= !(1 << idx);
        Some(Button::ALL[idx])
    }
}
