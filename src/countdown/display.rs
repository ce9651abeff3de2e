//! Band rendering for the two-digit countdown display
//!
//! The display shares one set of segment lines between two digits, so each
//! tick writes exactly one digit and the other is dark for that half of the
//! multiplex cycle. What the active digit shows depends on which band the
//! remaining time falls into. Bands are half-open and tested in one place:
//!
//! | band       | hundredths      | left digit        | right digit |
//! |------------|-----------------|-------------------|-------------|
//! | seconds    | `[1000, inf)`   | tens of seconds   | seconds     |
//! | tenths     | `[100, 1000)`   | seconds + point   | tenths      |
//! | sub-second | `[0, 100)`      | `0.` (blinking)   | tenths      |

use crate::config::{SECONDS_BAND_FLOOR, TENTHS_BAND_FLOOR};

/// Segment patterns for 0-9, bit 0 = segment a.
pub const DIGIT_PATTERNS: [u8; 10] = [63, 6, 91, 79, 102, 109, 125, 7, 127, 111];

/// Decimal point segment.
pub const DECIMAL_POINT: u8 = 0x80;

pub const BLANK: u8 = 0x00;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DigitSelect {
    /// Select line high.
    Left,
    /// Select line low.
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Band {
    Seconds,
    Tenths,
    SubSecond,
}

impl Band {
    pub const fn of(remaining: u16) -> Self {
        if remaining >= SECONDS_BAND_FLOOR {
            Band::Seconds
        } else if remaining >= TENTHS_BAND_FLOOR {
            Band::Tenths
        } else {
            Band::SubSecond
        }
    }
}

/// What the interrupt writes to the display hardware on one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentOutput {
    /// Drive the select line, then the segment pattern.
    Digit { select: DigitSelect, pattern: u8 },
    /// All segments off.
    Blank,
    /// Leave the port as it is.
    Hold,
}

#[inline]
const fn digit(value: u16) -> u8 {
    DIGIT_PATTERNS[(value % 10) as usize]
}

/// Pattern for the active digit. A pure function of the remaining time and
/// the multiplex phase.
pub const fn render(remaining: u16, low_digit_active: bool) -> SegmentOutput {
    let select = if low_digit_active {
        DigitSelect::Right
    } else {
        DigitSelect::Left
    };
    let seconds = remaining / 100;
    let tenths = (remaining / 10) % 10;

    let pattern = match Band::of(remaining) {
        Band::Seconds => {
            if low_digit_active {
                digit(seconds)
            } else {
                let tens = seconds / 10;
                digit(if tens > 9 { 9 } else { tens })
            }
        }
        Band::Tenths => {
            if low_digit_active {
                digit(tenths)
            } else {
                digit(seconds) | DECIMAL_POINT
            }
        }
        Band::SubSecond => {
            if remaining % 10 >= 5 {
                BLANK
            } else if low_digit_active {
                digit(tenths)
            } else {
                DIGIT_PATTERNS[0] | DECIMAL_POINT
            }
        }
    };
    SegmentOutput::Digit { select, pattern }
}

/// Shown once the countdown has expired.
pub const EXPIRED: SegmentOutput = SegmentOutput::Digit {
    select: DigitSelect::Left,
    pattern: DIGIT_PATTERNS[0],
};
