//! Round, life and level flow
//!
//! A [`Session`] runs one game from full lives to game over. The firmware
//! calls [`Session::step`] once per main-loop pass; losing a life starts the
//! next round from inside `step`, so the call stack stays flat no matter how
//! many lives or levels are played.

use embedded_hal::serial::Read;
use ufmt::uWrite;

use crate::config::GameConfig;
use crate::countdown::Countdown;
use crate::error::Error;
use crate::input::{ButtonSource, Direction, InputDecoder, InputEvent};
use crate::lanes::{period_defect, LaneId, LaneScheduler, ScrollDirection};
use crate::logger::Logger;
use crate::pause::PauseController;
use crate::{log_debug, log_info, log_warn};

/// Game logic that lives outside this crate: the frog, the lane contents
/// and the LED matrix.
pub trait Playfield {
    fn is_frog_dead(&self) -> bool;
    fn frog_reached_far_bank(&self) -> bool;
    fn riverbank_full(&self) -> bool;
    fn current_level(&self) -> u8;

    fn move_frog(&mut self, direction: Direction);
    fn scroll_lane(&mut self, lane: LaneId, direction: ScrollDirection);
    fn put_frog_in_start_position(&mut self);
    /// The countdown reached zero.
    fn time_out(&mut self);
    fn advance_level(&mut self);

    fn show_lives(&mut self, _lives: u8) {}
    fn show_level(&mut self, _level: u8) {}
    fn show_paused(&mut self, _paused: bool) {}
    fn show_game_over(&mut self) {}
}

/// Everything a pass needs besides the session itself.
pub struct GameContext<'a, P: ?Sized, B: ?Sized, S: ?Sized, W> {
    pub field: &'a mut P,
    pub buttons: &'a mut B,
    pub serial: &'a mut S,
    pub countdown: Countdown<'a>,
    pub log: &'a mut Logger<W>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Playing,
    GameOver,
}

pub struct Session {
    config: GameConfig,
    lives: u8,
    state: SessionState,
    decoder: InputDecoder,
    lanes: LaneScheduler,
    pause: PauseController,
    /// Level the period check last ran for.
    checked_level: Option<u8>,
}

impl Session {
    pub fn new(config: &GameConfig, now: u32) -> Self {
        Self {
            config: *config,
            lives: config.starting_lives,
            state: SessionState::Playing,
            decoder: InputDecoder::new(),
            lanes: LaneScheduler::new(config.lanes, config.period_policy, now),
            pause: PauseController::new(),
            checked_level: None,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.pause.is_paused()
    }

    pub fn lanes(&self) -> &LaneScheduler {
        &self.lanes
    }

    pub fn decoder(&self) -> &InputDecoder {
        &self.decoder
    }

    /// Shows the starting lives and begins the first round.
    pub fn start<P, B, S, W>(&mut self, now: u32, cx: &mut GameContext<'_, P, B, S, W>)
    where
        P: Playfield + ?Sized,
        B: ?Sized,
        S: ?Sized,
        W: uWrite,
    {
        cx.field.show_lives(self.lives);
        log_info!(cx.log, "new game, {} lives", self.lives);
        self.begin_round(now, cx);
    }

    fn begin_round<P, B, S, W>(&mut self, now: u32, cx: &mut GameContext<'_, P, B, S, W>)
    where
        P: Playfield + ?Sized,
        B: ?Sized,
        S: ?Sized,
        W: uWrite,
    {
        let level = cx.field.current_level();
        cx.field.show_level(level);
        self.check_level(level, &mut *cx.log);
        self.pause.clear();
        self.lanes.restart(now);
        cx.countdown.reset_countdown();
        cx.countdown.start_countdown();
        log_debug!(cx.log, "round start at {} ms, level {}", now, level);
    }

    fn check_level<W: uWrite>(&mut self, level: u8, log: &mut Logger<W>) {
        if self.checked_level == Some(level) {
            return;
        }
        self.checked_level = Some(level);
        if let Some(defect) = period_defect(level) {
            let err = Error::from(defect);
            log_warn!(log, "lane periods degenerate: {:?}, policy applied", err);
        }
    }

    /// One main-loop pass.
    pub fn step<P, B, S, W>(
        &mut self,
        now: u32,
        cx: &mut GameContext<'_, P, B, S, W>,
    ) -> SessionState
    where
        P: Playfield + ?Sized,
        B: ButtonSource + ?Sized,
        S: Read<u8> + ?Sized,
        W: uWrite,
    {
        if self.state == SessionState::GameOver {
            return self.state;
        }

        if cx.field.is_frog_dead() || cx.field.riverbank_full() {
            self.finish_round(now, cx);
            return self.state;
        }

        if cx.field.frog_reached_far_bank() {
            cx.field.put_frog_in_start_position();
            cx.countdown.reset_countdown();
            cx.countdown.start_countdown();
        }

        if cx.countdown.sample_countdown() == 0 {
            cx.field.time_out();
        }

        let event = match self.decoder.poll_input(now, &mut *cx.buttons, &mut *cx.serial) {
            Ok(event) => event,
            Err(err) => {
                log_warn!(cx.log, "{:?}", err);
                InputEvent::None
            }
        };

        match event {
            InputEvent::Direction(direction) if !self.pause.is_paused() => {
                cx.field.move_frog(direction);
            }
            InputEvent::TogglePause => {
                let paused = self.pause.toggle(now, &cx.countdown, &mut self.lanes);
                cx.field.show_paused(paused);
                if paused {
                    log_info!(cx.log, "paused at {} ms", now);
                } else {
                    log_info!(cx.log, "resumed at {} ms", now);
                }
            }
            _ => {}
        }

        if !self.pause.is_paused() {
            let level = cx.field.current_level();
            self.check_level(level, &mut *cx.log);
            let fired = self.lanes.tick(now, level, cx.field.is_frog_dead());
            for lane in fired.iter() {
                cx.field.scroll_lane(lane.id, lane.direction);
            }
        }

        self.state
    }

    fn finish_round<P, B, S, W>(&mut self, now: u32, cx: &mut GameContext<'_, P, B, S, W>)
    where
        P: Playfield + ?Sized,
        B: ?Sized,
        S: ?Sized,
        W: uWrite,
    {
        if !cx.field.is_frog_dead() {
            // riverbank full
            cx.field.advance_level();
            log_info!(cx.log, "level up to {}", cx.field.current_level());
            cx.field.put_frog_in_start_position();
            self.begin_round(now, cx);
            return;
        }

        self.lives = self.lives.saturating_sub(1);
        cx.field.show_lives(self.lives);
        if self.lives > 0 {
            log_info!(cx.log, "life lost, {} left", self.lives);
            cx.field.put_frog_in_start_position();
            self.begin_round(now, cx);
        } else {
            cx.countdown.stop_countdown();
            self.pause.clear();
            self.state = SessionState::GameOver;
            cx.field.show_game_over();
            log_info!(cx.log, "game over");
        }
    }
}

#[cfg(test)]
mod tests;
