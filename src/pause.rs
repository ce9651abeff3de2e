//! Pause/resume coordination between the countdown and the lanes

use crate::countdown::Countdown;
use crate::lanes::LaneScheduler;

#[derive(Debug, Default)]
pub struct PauseController {
    paused: bool,
}

impl PauseController {
    pub const fn new() -> Self {
        Self { paused: false }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Freezes the countdown. Lane timers are left alone; the caller skips
    /// scheduler passes while paused.
    pub fn pause(&mut self, countdown: &Countdown<'_>) {
        if !self.paused {
            countdown.pause_countdown();
            self.paused = true;
        }
    }

    /// Restarts the countdown and credits the paused time to every lane.
    pub fn resume(
        &mut self,
        now: u32,
        countdown: &Countdown<'_>,
        lanes: &mut LaneScheduler,
    ) {
        if self.paused {
            countdown.resume_countdown();
            lanes.credit_pause(now);
            self.paused = false;
        }
    }

    /// Returns the new paused state.
    pub fn toggle(
        &mut self,
        now: u32,
        countdown: &Countdown<'_>,
        lanes: &mut LaneScheduler,
    ) -> bool {
        if self.paused {
            self.resume(now, countdown, lanes);
        } else {
            self.pause(countdown);
        }
        self.paused
    }

    /// Drops a pause left over from the previous round without crediting.
    pub fn clear(&mut self) {
        self.paused = false;
    }
}
