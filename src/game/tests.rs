use std::collections::VecDeque;
use std::string::String;
use std::vec::Vec;

use core::cell::RefCell;
use core::convert::Infallible;
use critical_section::Mutex;
use embedded_hal::serial::Read;

use super::*;
use crate::config::GameConfig;
use crate::countdown::{self, display, CountdownState};
use crate::input::Button;
use crate::logger::Level;

#[derive(Default)]
struct Field {
    dead: bool,
    far_bank: bool,
    full: bool,
    level: u8,
    moves: Vec<Direction>,
    scrolls: Vec<(LaneId, ScrollDirection)>,
    restarts: u32,
    timeouts: u32,
    advances: u32,
    lives_shown: Vec<u8>,
    levels_shown: Vec<u8>,
    paused_shown: Vec<bool>,
    game_over: bool,
}

impl Field {
    fn new() -> Self {
        Self {
            level: 1,
            ..Self::default()
        }
    }
}

impl Playfield for Field {
    fn is_frog_dead(&self) -> bool {
        self.dead
    }

    fn frog_reached_far_bank(&self) -> bool {
        self.far_bank
    }

    fn riverbank_full(&self) -> bool {
        self.full
    }

    fn current_level(&self) -> u8 {
        self.level
    }

    fn move_frog(&mut self, direction: Direction) {
        self.moves.push(direction);
    }

    fn scroll_lane(&mut self, lane: LaneId, direction: ScrollDirection) {
        self.scrolls.push((lane, direction));
    }

    fn put_frog_in_start_position(&mut self) {
        self.restarts += 1;
        self.dead = false;
        self.far_bank = false;
    }

    fn time_out(&mut self) {
        self.timeouts += 1;
    }

    fn advance_level(&mut self) {
        self.advances += 1;
        self.level += 1;
        self.full = false;
    }

    fn show_lives(&mut self, lives: u8) {
        self.lives_shown.push(lives);
    }

    fn show_level(&mut self, level: u8) {
        self.levels_shown.push(level);
    }

    fn show_paused(&mut self, paused: bool) {
        self.paused_shown.push(paused);
    }

    fn show_game_over(&mut self) {
        self.game_over = true;
    }
}

#[derive(Default)]
struct Buttons(VecDeque<Button>);

impl ButtonSource for Buttons {
    fn button_pushed(&mut self, _now: u32) -> Option<Button> {
        self.0.pop_front()
    }
}

#[derive(Default)]
struct Terminal(VecDeque<u8>);

impl Read<u8> for Terminal {
    type Error = Infallible;

    fn read(&mut self) -> nb::Result<u8, Infallible> {
        self.0.pop_front().ok_or(nb::Error::WouldBlock)
    }
}

struct Rig {
    field: Field,
    buttons: Buttons,
    serial: Terminal,
    log: Logger<String>,
    config: GameConfig,
}

impl Rig {
    fn new() -> Self {
        Self {
            field: Field::new(),
            buttons: Buttons::default(),
            serial: Terminal::default(),
            log: Logger::new(String::new(), Level::Debug),
            config: GameConfig::new(),
        }
    }

    fn context<'a>(
        &'a mut self,
        cell: &'a ClockCell,
    ) -> GameContext<'a, Field, Buttons, Terminal, String> {
        GameContext {
            field: &mut self.field,
            buttons: &mut self.buttons,
            serial: &mut self.serial,
            countdown: Countdown::new(cell, self.config.countdown_start),
            log: &mut self.log,
        }
    }
}

type ClockCell = Mutex<RefCell<CountdownState>>;

fn clock() -> ClockCell {
    Mutex::new(RefCell::new(CountdownState::new()))
}

fn tick_clock(cell: &ClockCell, ticks: u32) -> display::SegmentOutput {
    let mut last = display::SegmentOutput::Hold;
    for _ in 0..ticks {
        last = critical_section::with(|cs| countdown::isr_tick(cs, cell));
    }
    last
}

#[test]
fn start_shows_lives_and_runs_the_clock() {
    let mut rig = Rig::new();
    let mut session = Session::new(&rig.config, 0);
    let cell = clock();
    let mut cx = rig.context(&cell);
    session.start(0, &mut cx);

    let state = cx.countdown.snapshot();
    assert!(state.is_running());
    assert!(state.display_enabled());
    assert_eq!(state.remaining(), 1_500);
    assert_eq!(cx.countdown.sample_countdown(), 15);
    assert_eq!(cx.field.lives_shown, [3]);
    assert_eq!(cx.field.levels_shown, [1]);
    assert!(cx.log.sink().contains("[INF] new game, 3 lives\r\n"));
}

#[test]
fn three_deaths_end_the_game() {
    let mut rig = Rig::new();
    let mut session = Session::new(&rig.config, 0);
    let cell = clock();
    let mut cx = rig.context(&cell);
    session.start(0, &mut cx);

    for (n, now) in [100u32, 200, 300].into_iter().enumerate() {
        cx.field.dead = true;
        let state = session.step(now, &mut cx);
        if n < 2 {
            assert_eq!(state, SessionState::Playing);
            assert!(!cx.field.dead);
            assert!(cx.countdown.snapshot().is_running());
        } else {
            assert_eq!(state, SessionState::GameOver);
        }
    }

    assert_eq!(session.lives(), 0);
    assert_eq!(cx.field.lives_shown, [3, 2, 1, 0]);
    assert_eq!(cx.field.restarts, 2);
    assert!(cx.field.game_over);

    let clock = cx.countdown.snapshot();
    assert!(!clock.is_running());
    assert!(!clock.display_enabled());
    assert_eq!(clock.remaining(), 0);

    // a finished session ignores further passes
    cx.field.dead = true;
    assert_eq!(session.step(400, &mut cx), SessionState::GameOver);
    assert_eq!(cx.field.lives_shown, [3, 2, 1, 0]);
    assert!(cx.log.sink().contains("game over"));
}

#[test]
fn lanes_scroll_on_their_own_periods() {
    let mut rig = Rig::new();
    let mut session = Session::new(&rig.config, 0);
    let cell = clock();
    let mut cx = rig.context(&cell);
    session.start(0, &mut cx);

    session.step(749, &mut cx);
    assert!(cx.field.scrolls.is_empty());

    session.step(750, &mut cx);
    assert_eq!(
        cx.field.scrolls,
        [(LaneId::Road(0), ScrollDirection::Right)]
    );

    session.step(800, &mut cx);
    assert_eq!(
        cx.field.scrolls[1..],
        [(LaneId::River(1), ScrollDirection::Left)]
    );
}

#[test]
fn dead_frog_halts_lanes_until_the_round_restarts() {
    let mut rig = Rig::new();
    rig.config.starting_lives = 2;
    let mut session = Session::new(&rig.config, 0);
    let cell = clock();
    let mut cx = rig.context(&cell);
    session.start(0, &mut cx);

    cx.field.dead = true;
    session.step(1_000, &mut cx);
    assert!(cx.field.scrolls.is_empty());

    // lanes restart from the new round
    session.step(1_749, &mut cx);
    assert!(cx.field.scrolls.is_empty());
    session.step(1_750, &mut cx);
    assert_eq!(cx.field.scrolls, [(LaneId::Road(0), ScrollDirection::Right)]);
}

#[test]
fn pause_freezes_clock_and_lanes_and_credits_the_gap() {
    let mut rig = Rig::new();
    let mut session = Session::new(&rig.config, 0);
    let cell = clock();
    let mut cx = rig.context(&cell);
    session.start(0, &mut cx);

    session.step(50, &mut cx);
    cx.serial.0.push_back(b'p');
    session.step(100, &mut cx);
    assert!(session.is_paused());
    assert_eq!(cx.field.paused_shown, [true]);
    let clock = cx.countdown.snapshot();
    assert!(!clock.is_running());
    assert!(clock.display_enabled());

    // paused: the clock holds and the display keeps its last digit
    assert_eq!(tick_clock(&cell, 50), display::SegmentOutput::Hold);
    assert_eq!(cx.countdown.snapshot().remaining(), 1_500);

    session.step(900, &mut cx);
    assert!(cx.field.scrolls.is_empty());
    cx.serial.0.push_back(b'u');
    session.step(950, &mut cx);
    assert!(cx.field.moves.is_empty());

    cx.serial.0.push_back(b'P');
    session.step(1_000, &mut cx);
    assert!(!session.is_paused());
    assert_eq!(cx.field.paused_shown, [true, false]);
    assert!(cx.countdown.snapshot().is_running());

    // 950 ms credited since the last pass at 50
    session.step(1_699, &mut cx);
    assert!(cx.field.scrolls.is_empty());
    session.step(1_700, &mut cx);
    assert_eq!(cx.field.scrolls, [(LaneId::Road(0), ScrollDirection::Right)]);
}

#[test]
fn expired_clock_reports_time_out() {
    let mut rig = Rig::new();
    let mut session = Session::new(&rig.config, 0);
    let cell = clock();
    let mut cx = rig.context(&cell);
    session.start(0, &mut cx);

    tick_clock(&cell, 1_499);
    session.step(10, &mut cx);
    assert_eq!(cx.field.timeouts, 0);

    assert_eq!(tick_clock(&cell, 1), display::EXPIRED);
    session.step(20, &mut cx);
    assert_eq!(cx.field.timeouts, 1);
}

#[test]
fn far_bank_restarts_the_crossing_clock() {
    let mut rig = Rig::new();
    let mut session = Session::new(&rig.config, 0);
    let cell = clock();
    let mut cx = rig.context(&cell);
    session.start(0, &mut cx);

    tick_clock(&cell, 500);
    assert_eq!(cx.countdown.snapshot().remaining(), 1_000);

    cx.field.far_bank = true;
    session.step(5_000, &mut cx);
    assert_eq!(cx.field.restarts, 1);
    let clock = cx.countdown.snapshot();
    assert_eq!(clock.remaining(), 1_500);
    assert!(clock.is_running());
    assert_eq!(session.lives(), 3);
}

#[test]
fn full_riverbank_advances_level_without_losing_a_life() {
    let mut rig = Rig::new();
    let mut session = Session::new(&rig.config, 0);
    let cell = clock();
    let mut cx = rig.context(&cell);
    session.start(0, &mut cx);

    cx.field.full = true;
    assert_eq!(session.step(10, &mut cx), SessionState::Playing);
    assert_eq!(cx.field.advances, 1);
    assert_eq!(cx.field.level, 2);
    assert_eq!(cx.field.levels_shown, [1, 2]);
    assert_eq!(session.lives(), 3);
    assert_eq!(cx.field.lives_shown, [3]);
    assert!(cx.log.sink().contains("level up to 2"));
}

#[test]
fn degenerate_level_warns_once_and_clamps() {
    let mut rig = Rig::new();
    rig.field.level = 11;
    let mut session = Session::new(&rig.config, 0);
    let cell = clock();
    let mut cx = rig.context(&cell);
    session.start(0, &mut cx);

    session.step(99, &mut cx);
    assert!(cx.field.scrolls.is_empty());
    session.step(100, &mut cx);
    assert_eq!(cx.field.scrolls.len(), 5);
    session.step(150, &mut cx);

    assert_eq!(cx.log.sink().matches("[WRN] lane periods degenerate").count(), 1);
}

#[test]
fn buttons_win_over_terminal_input() {
    let mut rig = Rig::new();
    let mut session = Session::new(&rig.config, 0);
    let cell = clock();
    let mut cx = rig.context(&cell);
    session.start(0, &mut cx);

    cx.buttons.0.push_back(Button::Button2);
    cx.serial.0.push_back(b'd');
    session.step(10, &mut cx);
    assert_eq!(cx.field.moves, [Direction::Up]);
    session.step(20, &mut cx);
    assert_eq!(cx.field.moves, [Direction::Up, Direction::Down]);
}

#[test]
fn arrow_keys_decode_across_passes() {
    let mut rig = Rig::new();
    let mut session = Session::new(&rig.config, 0);
    let cell = clock();
    let mut cx = rig.context(&cell);
    session.start(0, &mut cx);

    cx.serial.0.extend([crate::input::ESCAPE, b'[', b'C']);
    session.step(10, &mut cx);
    session.step(20, &mut cx);
    assert!(cx.field.moves.is_empty());
    session.step(30, &mut cx);
    assert_eq!(cx.field.moves, [Direction::Right]);
}

struct BrokenTerminal;

impl Read<u8> for BrokenTerminal {
    type Error = ();

    fn read(&mut self) -> nb::Result<u8, ()> {
        Err(nb::Error::Other(()))
    }
}

#[test]
fn serial_error_is_logged_and_play_continues() {
    let cell = clock();
    let mut field = Field::new();
    let mut buttons = Buttons::default();
    let mut log = Logger::new(String::new(), Level::Debug);
    let config = GameConfig::new();
    let mut session = Session::new(&config, 0);
    let mut cx = GameContext {
        field: &mut field,
        buttons: &mut buttons,
        serial: &mut BrokenTerminal,
        countdown: Countdown::new(&cell, config.countdown_start),
        log: &mut log,
    };
    session.start(0, &mut cx);

    assert_eq!(session.step(750, &mut cx), SessionState::Playing);
    assert!(cx.field.moves.is_empty());
    assert_eq!(cx.field.scrolls, [(LaneId::Road(0), ScrollDirection::Right)]);
    assert_eq!(cx.log.sink().matches("[WRN] SerialRead").count(), 1);
    assert_eq!(session.decoder().read_errors(), 1);
}
