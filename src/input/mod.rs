//! Button and terminal input decoding
//!
//! Two unsynchronised sources feed the game: the four push buttons and the
//! serial terminal. Buttons win; when one is down the pending serial byte is
//! left for the next pass. Terminal arrow keys arrive as `ESC [ A..D`, so a
//! small state machine sits in front of the direct letter mappings.

use embedded_hal::serial::Read;
use ufmt::derive::uDebug;

use crate::error::{Error, Result};

pub const ESCAPE: u8 = 0x1b;

#[derive(Clone, Copy, Debug, PartialEq, Eq, uDebug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, uDebug)]
pub enum InputEvent {
    None,
    Direction(Direction),
    TogglePause,
    Unrecognized,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Button0,
    Button1,
    Button2,
    Button3,
}

impl Button {
    pub const ALL: [Button; 4] = [
        Button::Button0,
        Button::Button1,
        Button::Button2,
        Button::Button3,
    ];

    pub const fn direction(self) -> Direction {
        match self {
            Button::Button0 => Direction::Right,
            Button::Button1 => Direction::Down,
            Button::Button2 => Direction::Up,
            Button::Button3 => Direction::Left,
        }
    }
}

/// Something that reports at most one newly pushed button per call.
pub trait ButtonSource {
    /// `now` is the millisecond clock; debouncing is timed against it.
    fn button_pushed(&mut self, now: u32) -> Option<Button>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EscapeState {
    #[default]
    Idle,
    SawEscape,
    SawBracket,
}

fn direct(byte: u8) -> Option<InputEvent> {
    let event = match byte {
        b'U' | b'u' => InputEvent::Direction(Direction::Up),
        b'D' | b'd' => InputEvent::Direction(Direction::Down),
        b'R' | b'r' => InputEvent::Direction(Direction::Right),
        b'L' | b'l' => InputEvent::Direction(Direction::Left),
        b'P' | b'p' => InputEvent::TogglePause,
        _ => return None,
    };
    Some(event)
}

fn arrow(byte: u8) -> InputEvent {
    match byte {
        b'A' => InputEvent::Direction(Direction::Up),
        b'B' => InputEvent::Direction(Direction::Down),
        b'C' => InputEvent::Direction(Direction::Right),
        b'D' => InputEvent::Direction(Direction::Left),
        _ => InputEvent::Unrecognized,
    }
}

#[derive(Debug, Default)]
pub struct InputDecoder {
    state: EscapeState,
    read_errors: u16,
}

impl InputDecoder {
    pub const fn new() -> Self {
        Self {
            state: EscapeState::Idle,
            read_errors: 0,
        }
    }

    pub fn state(&self) -> EscapeState {
        self.state
    }

    /// Hard serial errors seen since start-up.
    pub fn read_errors(&self) -> u16 {
        self.read_errors
    }

    /// Feeds one terminal byte through the escape-sequence state machine.
    pub fn feed(&mut self, byte: u8) -> InputEvent {
        match (self.state, byte) {
            (EscapeState::Idle, ESCAPE) => {
                self.state = EscapeState::SawEscape;
                InputEvent::None
            }
            (EscapeState::SawEscape, b'[') => {
                self.state = EscapeState::SawBracket;
                InputEvent::None
            }
            (EscapeState::SawBracket, code) => {
                self.state = EscapeState::Idle;
                arrow(code)
            }
            (EscapeState::SawEscape, other) => {
                // broken sequence: only a byte that means something on its own survives
                self.state = EscapeState::Idle;
                direct(other).unwrap_or(InputEvent::None)
            }
            (EscapeState::Idle, other) => direct(other).unwrap_or(InputEvent::Unrecognized),
        }
    }

    /// One scheduling pass worth of input: a button if one was pushed,
    /// otherwise at most one serial byte.
    ///
    /// A hard serial error comes back as [`Error::SerialRead`] and leaves
    /// the escape state where it was.
    pub fn poll_input<B, S>(
        &mut self,
        now: u32,
        buttons: &mut B,
        serial: &mut S,
    ) -> Result<InputEvent>
    where
        B: ButtonSource + ?Sized,
        S: Read<u8> + ?Sized,
    {
        if let Some(button) = buttons.button_pushed(now) {
            return Ok(InputEvent::Direction(button.direction()));
        }
        match serial.read() {
            Ok(byte) => Ok(self.feed(byte)),
            Err(nb::Error::WouldBlock) => Ok(InputEvent::None),
            Err(nb::Error::Other(_)) => {
                self.read_errors = self.read_errors.saturating_add(1);
                Err(Error::SerialRead)
            }
        }
    }
}
