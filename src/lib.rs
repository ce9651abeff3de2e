//! Frogger board firmware: countdown display, input decoding and lane timing
//!
//! The timer interrupt owns the countdown and the display multiplexer; the
//! main loop owns everything else and runs one [`game::Session::step`] per
//! pass. Hardware access is confined to `hal`; the rest builds and tests on
//! the host.

#![cfg_attr(not(test), no_std)]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]

pub mod config;
pub mod countdown;
pub mod drivers;
pub mod error;
pub mod game;
pub mod hal;
pub mod input;
pub mod lanes;
pub mod logger;
pub mod pause;

pub use countdown::{Countdown, CountdownState};
pub use error::{Error, Result};
pub use game::{GameContext, Playfield, Session, SessionState};
pub use input::{Direction, InputDecoder, InputEvent};
pub use lanes::{FiredLanes, LaneId, LaneScheduler};
pub use pause::PauseController;
