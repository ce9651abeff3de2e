//! Error codes shared across the firmware

use ufmt::derive::uDebug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, uDebug)]
pub enum Error {
    /// The current level scales a lane period to zero or below.
    DegenerateLanePeriod { level: u8, scale: i16 },
    /// The digit-select line could not be driven.
    DisplayWrite,
    /// The serial peripheral reported a hard receive error.
    SerialRead,
}

pub type Result<T> = core::result::Result<T, Error>;

impl From<crate::lanes::PeriodDefect> for Error {
    fn from(defect: crate::lanes::PeriodDefect) -> Self {
        Error::DegenerateLanePeriod {
            level: defect.level,
            scale: defect.scale,
        }
    }
}
