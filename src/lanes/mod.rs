//! Cooperative lane scheduler
//!
//! Five lane actors (three road lanes, two river channels) each move at
//! their own period. The main loop calls [`LaneScheduler::tick`] once per
//! pass; every lane whose period has elapsed since it last moved fires.
//! Periods shrink with the level through an integer scale factor that
//! matches the original board timing exactly, including where it collapses
//! to zero at level 11.

use ufmt::derive::uDebug;

pub const LANE_COUNT: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, uDebug)]
pub enum LaneId {
    Road(u8),
    River(u8),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, uDebug)]
pub enum ScrollDirection {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LaneSpec {
    pub id: LaneId,
    /// Milliseconds between moves at level 1.
    pub base_period: u32,
    pub direction: ScrollDirection,
}

impl LaneSpec {
    pub const fn new(id: LaneId, base_period: u32, direction: ScrollDirection) -> Self {
        Self {
            id,
            base_period,
            direction,
        }
    }
}

/// What to do when a level scales a period to zero or below.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeriodPolicy {
    /// Keep the raw arithmetic: a non-positive period becomes 0 and the
    /// lane fires on every pass.
    Replicate,
    /// Substitute `min` milliseconds.
    Clamp { min: u32 },
}

/// A level whose scale factor leaves lanes with no positive period.
#[derive(Clone, Copy, Debug, PartialEq, Eq, uDebug)]
pub struct PeriodDefect {
    pub level: u8,
    pub scale: i16,
}

/// `1 - (level - 1) / 10`, truncating toward zero.
pub const fn level_scale(level: u8) -> i16 {
    1 - (level as i16 - 1) / 10
}

pub const fn period_defect(level: u8) -> Option<PeriodDefect> {
    let scale = level_scale(level);
    if scale <= 0 {
        Some(PeriodDefect { level, scale })
    } else {
        None
    }
}

/// Period of a lane at `level` under `policy`.
pub const fn effective_period(base_period: u32, level: u8, policy: PeriodPolicy) -> u32 {
    let scaled = base_period as i64 * level_scale(level) as i64;
    if scaled > 0 {
        scaled as u32
    } else {
        match policy {
            PeriodPolicy::Replicate => 0,
            PeriodPolicy::Clamp { min } => min,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LaneTimer {
    last_fire_time: u32,
    accumulated_gap: u32,
    base_period: u32,
}

impl LaneTimer {
    pub const fn new(base_period: u32, now: u32) -> Self {
        Self {
            last_fire_time: now,
            accumulated_gap: 0,
            base_period,
        }
    }

    pub const fn last_fire_time(&self) -> u32 {
        self.last_fire_time
    }

    pub const fn accumulated_gap(&self) -> u32 {
        self.accumulated_gap
    }

    /// Absolute time of the next move for the given period.
    pub const fn next_due(&self, period: u32) -> u32 {
        self.last_fire_time
            .wrapping_add(self.accumulated_gap)
            .wrapping_add(period)
    }

    fn is_due(&self, now: u32, period: u32) -> bool {
        now.wrapping_sub(self.last_fire_time) >= self.accumulated_gap.saturating_add(period)
    }

    fn fire(&mut self, now: u32) {
        self.last_fire_time = now;
        self.accumulated_gap = 0;
    }
}

/// Lanes fired in one pass, in lane-table order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FiredLanes {
    mask: u8,
    lanes: [LaneSpec; LANE_COUNT],
}

impl FiredLanes {
    pub const fn is_empty(&self) -> bool {
        self.mask == 0
    }

    pub const fn len(&self) -> usize {
        self.mask.count_ones() as usize
    }

    pub fn contains(&self, id: LaneId) -> bool {
        self.iter().any(|lane| lane.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = LaneSpec> + '_ {
        self.lanes
            .iter()
            .enumerate()
            .filter(move |(idx, _)| self.mask & (1 << *idx) != 0)
            .map(|(_, lane)| *lane)
    }
}

pub struct LaneScheduler {
    lanes: [LaneSpec; LANE_COUNT],
    timers: [LaneTimer; LANE_COUNT],
    policy: PeriodPolicy,
    /// Time of the latest pass; the shared reference for pause credit.
    last_pass: u32,
}

impl LaneScheduler {
    pub fn new(lanes: [LaneSpec; LANE_COUNT], policy: PeriodPolicy, now: u32) -> Self {
        Self {
            lanes,
            timers: lanes.map(|lane| LaneTimer::new(lane.base_period, now)),
            policy,
            last_pass: now,
        }
    }

    /// Start every lane afresh, as at the beginning of a round.
    pub fn restart(&mut self, now: u32) {
        for timer in self.timers.iter_mut() {
            *timer = LaneTimer::new(timer.base_period, now);
        }
        self.last_pass = now;
    }

    pub fn timers(&self) -> &[LaneTimer; LANE_COUNT] {
        &self.timers
    }

    pub fn last_pass(&self) -> u32 {
        self.last_pass
    }

    pub fn period(&self, index: usize, level: u8) -> u32 {
        effective_period(self.timers[index].base_period, level, self.policy)
    }

    /// Next due time of every lane at `level`.
    pub fn next_due(&self, level: u8) -> [u32; LANE_COUNT] {
        let mut due = [0; LANE_COUNT];
        for (idx, slot) in due.iter_mut().enumerate() {
            *slot = self.timers[idx].next_due(self.period(idx, level));
        }
        due
    }

    /// One scheduling pass. Nothing fires while the frog is dead.
    pub fn tick(&mut self, now: u32, level: u8, frog_dead: bool) -> FiredLanes {
        self.last_pass = now;
        let mut mask = 0u8;
        if !frog_dead {
            for idx in 0..LANE_COUNT {
                let period = self.period(idx, level);
                let timer = &mut self.timers[idx];
                if timer.is_due(now, period) {
                    timer.fire(now);
                    mask |= 1 << idx;
                }
            }
        }
        FiredLanes {
            mask,
            lanes: self.lanes,
        }
    }

    /// Credits the time since the last pass to every lane after a pause.
    ///
    /// All lanes share the one reference timestamp, whatever their own last
    /// move time was. The credit adds to any gap the lane has not yet
    /// consumed.
    pub fn credit_pause(&mut self, now: u32) {
        let gap = now.wrapping_sub(self.last_pass);
        for timer in self.timers.iter_mut() {
            timer.accumulated_gap = timer.accumulated_gap.saturating_add(gap);
        }
    }
}
