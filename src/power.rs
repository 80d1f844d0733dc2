//! Screen power management for battery operation.
//!
//! The OLED is the largest consumer that the user controls directly. It
//! is switched off after a period without button presses while the
//! stopwatch is not running, and the next press wakes it.
//!
//! Times are uptime milliseconds, the same clock as button timestamps.

use crate::{config, power_logic};

/// Screen power state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScreenState {
    On,
    Off,
}

/// Tracks activity and decides when the screen sleeps and wakes.
#[derive(Debug, Clone)]
pub struct PowerManager {
    screen: ScreenState,
    last_activity_ms: u32,
}

impl PowerManager {
    pub const fn new(now_ms: u32) -> Self {
        Self {
            screen: ScreenState::On,
            last_activity_ms: now_ms,
        }
    }

    /// Record a button press. Returns `true` if it woke the screen; such a
    /// press is consumed by the wake-up.
    pub fn activity(&mut self, now_ms: u32) -> bool {
        self.last_activity_ms = now_ms;
        if self.screen == ScreenState::Off {
            self.screen = ScreenState::On;
            return true;
        }
        false
    }

    /// Periodic check. Returns the new state when it changes.
    pub fn tick(&mut self, now_ms: u32, stopwatch_running: bool) -> Option<ScreenState> {
        if stopwatch_running {
            self.last_activity_ms = now_ms;
        }
        let idle_secs = u64::from(now_ms.wrapping_sub(self.last_activity_ms) / 1_000);
        let on = power_logic::screen_should_be_on(
            stopwatch_running,
            config::SCREEN_AUTO_OFF_ENABLED,
            idle_secs,
            config::SCREEN_AUTO_OFF_TIMEOUT_SECS,
        );

        let new_state = if on { ScreenState::On } else { ScreenState::Off };
        if new_state == self.screen || new_state == ScreenState::On {
            // Only a button press turns the screen back on.
            return None;
        }
        self.screen = new_state;
        Some(new_state)
    }

    pub fn screen(&self) -> ScreenState {
        self.screen
    }

    pub fn screen_on(&self) -> bool {
        self.screen == ScreenState::On
    }
}
