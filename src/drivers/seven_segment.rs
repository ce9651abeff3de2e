use embedded_hal::digital::v2::OutputPin;

use crate::countdown::display::BLANK;
use crate::countdown::{DigitSelect, SegmentOutput};
use crate::error::{Error, Result};
use crate::hal::BytePort;

/// Two-digit common-cathode display: one select line, one segment port.
pub struct SevenSegment<P, S> {
    select: P,
    segments: S,
}

impl<P: OutputPin, S: BytePort> SevenSegment<P, S> {
    pub fn new(select: P, segments: S) -> Self {
        Self { select, segments }
    }

    /// Pushes one tick's worth of output to the hardware. Select first so
    /// the pattern never lands on the wrong digit.
    pub fn apply(&mut self, output: SegmentOutput) -> Result<()> {
        match output {
            SegmentOutput::Digit { select, pattern } => {
                let selected = match select {
                    DigitSelect::Left => self.select.set_high(),
                    DigitSelect::Right => self.select.set_low(),
                };
                selected.map_err(|_| Error::DisplayWrite)?;
                self.segments.write(pattern);
            }
            SegmentOutput::Blank => self.segments.write(BLANK),
            SegmentOutput::Hold => {}
        }
        Ok(())
    }

    pub fn release(self) -> (P, S) {
        (self.select, self.segments)
    }
}
