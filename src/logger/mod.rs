//! Levelled logging over any `ufmt` writer
//!
//! On the board the sink is the USART0 transmit half, so every line goes to
//! the same terminal the player types into. Lines are terminated with CRLF.

use ufmt::uWrite;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl Level {
    const fn tag(self) -> &'static str {
        match self {
            Level::Error => "[ERR] ",
            Level::Warn => "[WRN] ",
            Level::Info => "[INF] ",
            Level::Debug => "[DBG] ",
        }
    }
}

pub struct Logger<W> {
    sink: W,
    max_level: Level,
}

impl<W: uWrite> Logger<W> {
    pub const fn new(sink: W, max_level: Level) -> Self {
        Self { sink, max_level }
    }

    pub fn enabled(&self, level: Level) -> bool {
        level <= self.max_level
    }

    pub fn set_level(&mut self, level: Level) {
        self.max_level = level;
    }

    /// Writes the level tag and hands back the sink for the message body,
    /// or `None` when the level is filtered out. Used by the `log_*!` macros.
    pub fn begin(&mut self, level: Level) -> Option<&mut W> {
        if !self.enabled(level) {
            return None;
        }
        self.sink.write_str(level.tag()).ok()?;
        Some(&mut self.sink)
    }

    pub fn end(&mut self) {
        self.sink.write_str("\r\n").ok();
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

#[macro_export]
macro_rules! log_at {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger = &mut *$logger;
        if let Some(sink) = logger.begin($level) {
            ufmt::uwrite!(sink, $($arg)+).ok();
            logger.end();
        }
    }};
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::logger::Level::Error, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::logger::Level::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::logger::Level::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::logger::Level::Debug, $($arg)+)
    };
}
