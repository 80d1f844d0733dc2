//! GUI state and button handling.
//!
//! Kept free of hardware so the whole interaction model can be tested on
//! the host. The GUI task feeds it presses and status updates, then calls
//! [`screen::render`](super::screen::render).

use super::{Button, ButtonPress};
use crate::ble::BleStatus;
use crate::fuel_gauge::BatteryStatus;
use crate::stopwatch::{Status, Stopwatch};

#[derive(Debug, Clone, Default)]
pub struct Gui {
    ble: BleStatus,
    battery: BatteryStatus,
    /// Lap being browsed with the LEFT button.
    selected_lap: Option<usize>,
}

impl Gui {
    pub const fn new() -> Self {
        Self {
            ble: BleStatus::Idle,
            battery: BatteryStatus {
                percent: 0,
                charging: false,
            },
            selected_lap: None,
        }
    }

    /// Apply a debounced press to the stopwatch, using the press time as
    /// the event time.
    pub fn handle_press(&mut self, watch: &mut Stopwatch, press: ButtonPress) {
        let now = press.at_ms;
        match press.button {
            Button::Right => {
                if !watch.stop(now) {
                    watch.start(now);
                }
            }
            Button::Middle => match watch.status() {
                Status::Running => {
                    watch.lap(now);
                }
                Status::Stopped => {
                    watch.reset();
                    self.selected_lap = None;
                }
                Status::Reset => {}
            },
            Button::Left => {
                self.selected_lap = match (self.selected_lap, watch.laps().len()) {
                    (_, 0) | (Some(0), _) => None,
                    (None, count) => Some(count - 1),
                    (Some(n), _) => Some(n - 1),
                };
            }
        }
    }

    pub fn set_ble_advertising(&mut self, advertising: bool) {
        match (advertising, self.ble) {
            (true, BleStatus::Idle) => self.ble = BleStatus::Advertising,
            (false, BleStatus::Advertising) => self.ble = BleStatus::Idle,
            _ => {}
        }
    }

    pub fn set_ble_connected(&mut self, connected: bool) {
        self.ble = if connected {
            BleStatus::Connected
        } else {
            BleStatus::Idle
        };
    }

    pub fn set_ble_status(&mut self, status: BleStatus) {
        self.ble = status;
    }

    pub fn set_battery(&mut self, battery: BatteryStatus) {
        self.battery = battery;
    }

    pub fn ble_status(&self) -> BleStatus {
        self.ble
    }

    pub fn battery(&self) -> BatteryStatus {
        self.battery
    }

    pub fn selected_lap(&self) -> Option<usize> {
        self.selected_lap
    }
}
