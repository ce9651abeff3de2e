//! Configuration constants for the Frogger board firmware

use crate::lanes::{LaneId, LaneSpec, PeriodPolicy, ScrollDirection, LANE_COUNT};

/// CPU frequency in Hz
pub const CPU_FREQ_HZ: u32 = 8_000_000;

/// UART baud rate for the terminal
pub const UART_BAUD: u32 = 19_200;

/// Countdown/display interrupt rate (one tick every 10 ms)
pub const TICK_HZ: u32 = 100;

/// System clock rate used for `current_time()`, in Hz
pub const MILLIS_HZ: u32 = 1_000;

/// Milliseconds a button must hold a new level before the edge counts
pub const BUTTON_DEBOUNCE_MS: u32 = 5;

/// Countdown length for each crossing attempt, in hundredths of a second
pub const COUNTDOWN_START: u16 = 1_500;

/// Lower bound of the whole-seconds band, in hundredths
pub const SECONDS_BAND_FLOOR: u16 = 1_000;

/// Lower bound of the tenths band, in hundredths
pub const TENTHS_BAND_FLOOR: u16 = 100;

/// Lives at the start of a session
pub const STARTING_LIVES: u8 = 3;

/// Period substituted when a level scales a lane period to zero or below
pub const MIN_LANE_PERIOD_MS: u32 = 100;

/// Road lane 0 (nearest the start), scrolls right
pub const ROAD_0_PERIOD_MS: u32 = 750;

/// Road lane 1, scrolls left
pub const ROAD_1_PERIOD_MS: u32 = 1_100;

/// Road lane 2, scrolls right
pub const ROAD_2_PERIOD_MS: u32 = 900;

/// River channel 0, scrolls right
pub const RIVER_0_PERIOD_MS: u32 = 1_100;

/// River channel 1 (next to the far bank), scrolls left
pub const RIVER_1_PERIOD_MS: u32 = 800;

/// Game parameters that can be tuned per build or per test.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub starting_lives: u8,
    /// Hundredths of a second loaded by `reset_countdown`
    pub countdown_start: u16,
    pub lanes: [LaneSpec; LANE_COUNT],
    pub period_policy: PeriodPolicy,
}

impl GameConfig {
    pub const fn new() -> Self {
        Self {
            starting_lives: STARTING_LIVES,
            countdown_start: COUNTDOWN_START,
            lanes: [
                LaneSpec::new(LaneId::Road(0), ROAD_0_PERIOD_MS, ScrollDirection::Right),
                LaneSpec::new(LaneId::Road(1), ROAD_1_PERIOD_MS, ScrollDirection::Left),
                LaneSpec::new(LaneId::Road(2), ROAD_2_PERIOD_MS, ScrollDirection::Right),
                LaneSpec::new(LaneId::River(0), RIVER_0_PERIOD_MS, ScrollDirection::Right),
                LaneSpec::new(LaneId::River(1), RIVER_1_PERIOD_MS, ScrollDirection::Left),
            ],
            period_policy: PeriodPolicy::Clamp {
                min: MIN_LANE_PERIOD_MS,
            },
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Build-time game configuration used by the firmware binary.
pub const CONFIG: GameConfig = GameConfig::new();
