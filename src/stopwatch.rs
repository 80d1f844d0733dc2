//! Stopwatch model: run state, elapsed time and recorded laps.
//!
//! All times are milliseconds on a free-running `u32` clock; differences
//! use wrapping arithmetic so a clock rollover does not corrupt a
//! running measurement.

use heapless::Vec;

use crate::config::MAX_LAPS;

/// Run state. The discriminant is the value published over BLE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Status {
    Reset = 0,
    Running = 1,
    Stopped = 2,
}

impl From<Status> for u8 {
    fn from(status: Status) -> Self {
        status as u8
    }
}

#[derive(Debug, Clone)]
pub struct Stopwatch {
    status: Status,
    /// Clock value at the most recent start.
    started_at: u32,
    /// Time accumulated before the most recent start.
    banked: u32,
    /// Elapsed value at which the current lap began.
    lap_start: u32,
    laps: Vec<u32, MAX_LAPS>,
}

impl Stopwatch {
    pub const fn new() -> Self {
        Self {
            status: Status::Reset,
            started_at: 0,
            banked: 0,
            lap_start: 0,
            laps: Vec::new(),
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }

    /// Start, or resume after a stop. Returns `false` if already running.
    pub fn start(&mut self, now: u32) -> bool {
        if self.is_running() {
            return false;
        }
        self.started_at = now;
        self.status = Status::Running;
        true
    }

    /// Returns `false` if not running.
    pub fn stop(&mut self, now: u32) -> bool {
        if !self.is_running() {
            return false;
        }
        self.banked = self.elapsed(now);
        self.status = Status::Stopped;
        true
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Close the current lap. Returns its duration, or `None` when not
    /// running or when the lap list is full.
    pub fn lap(&mut self, now: u32) -> Option<u32> {
        if !self.is_running() || self.laps.is_full() {
            return None;
        }
        let elapsed = self.elapsed(now);
        let duration = elapsed.wrapping_sub(self.lap_start);
        self.lap_start = elapsed;
        self.laps.push(duration).ok()?;
        Some(duration)
    }

    pub fn elapsed(&self, now: u32) -> u32 {
        match self.status {
            Status::Running => self.banked.wrapping_add(now.wrapping_sub(self.started_at)),
            Status::Reset | Status::Stopped => self.banked,
        }
    }

    /// Time since the last lap was closed (or since the start).
    pub fn current_lap(&self, now: u32) -> u32 {
        self.elapsed(now).wrapping_sub(self.lap_start)
    }

    /// Duration of lap `n` (zero-based), or 0 if there is no such lap.
    pub fn lap_time(&self, n: usize) -> u32 {
        self.laps.get(n).copied().unwrap_or(0)
    }

    pub fn laps_count(&self) -> u8 {
        // MAX_LAPS fits in a u8.
        self.laps.len() as u8
    }

    pub fn laps(&self) -> &[u32] {
        &self.laps
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}
