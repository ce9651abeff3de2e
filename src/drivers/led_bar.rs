use crate::hal::BytePort;

/// Most lives the bar can show.
pub const MAX_LIVES: u8 = 8;

/// One LED per remaining life, filled from bit 0.
pub const fn lives_pattern(lives: u8) -> u8 {
    if lives >= MAX_LIVES {
        0xFF
    } else {
        (1u8 << lives) - 1
    }
}

/// Row of LEDs on a byte-wide port used as the lives indicator.
pub struct LedBar<P> {
    port: P,
    pattern: u8,
}

impl<P: BytePort> LedBar<P> {
    pub fn new(port: P) -> Self {
        let mut bar = Self { port, pattern: 0 };
        bar.set_pattern(0);
        bar
    }

    pub fn set_pattern(&mut self, pattern: u8) {
        self.pattern = pattern;
        self.port.write(pattern);
    }

    pub fn show_lives(&mut self, lives: u8) {
        self.set_pattern(lives_pattern(lives));
    }

    pub fn pattern(&self) -> u8 {
        self.pattern
    }
}
