//! Bluetooth Low Energy subsystem.
//!
//! This module drives the Nordic SoftDevice S140 in **Peripheral** role:
//!
//! 1. **Advertiser** - connectable advertising with the device name in
//!    the scan response, restarted after every disconnect.
//! 2. **GATT server** - the Stopwatch service (status, elapsed time,
//!    laps) plus the standard Battery service.
//! 3. **Publisher** - while connected, mirrors the stopwatch into the
//!    attribute table and notifies subscribed clients of changes.
//!
//! The types here are hardware independent; the SoftDevice glue lives in
//! [`server`].

#[cfg(feature = "embedded")]
pub mod server;

use crate::fuel_gauge::BatteryStatus;
use crate::stopwatch::Stopwatch;

/// Link state shown on screen and on the status LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BleStatus {
    #[default]
    Idle,
    Advertising,
    Connected,
}

/// Values published through the attribute table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot {
    pub status: u8,
    pub elapsed_ms: u32,
    pub laps_count: u8,
    pub battery_percent: u8,
}

impl Snapshot {
    pub fn capture(stopwatch: &Stopwatch, battery: BatteryStatus, now_ms: u32) -> Self {
        Self {
            status: stopwatch.status().into(),
            elapsed_ms: stopwatch.elapsed(now_ms),
            laps_count: stopwatch.laps_count(),
            battery_percent: battery.percent,
        }
    }
}

/// Notifiable attributes whose value changed since the last publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Changes {
    pub status: bool,
    pub laps_count: bool,
    pub battery: bool,
}

/// Remembers what was last published so only changes are notified.
#[derive(Debug, Clone, Default)]
pub struct Publisher {
    last: Option<Snapshot>,
}

impl Publisher {
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Record `next` and report which notifiable values differ from the
    /// previous snapshot. The first snapshot of a connection counts as
    /// unchanged: its values are written but not notified.
    pub fn update(&mut self, next: Snapshot) -> Changes {
        let changes = match self.last {
            Some(prev) => Changes {
                status: prev.status != next.status,
                laps_count: prev.laps_count != next.laps_count,
                battery: prev.battery_percent != next.battery_percent,
            },
            None => Changes::default(),
        };
        self.last = Some(next);
        changes
    }
}

/// Lap Select write: the Lap Time attribute value for lap `index`.
pub fn selected_lap_time(stopwatch: &Stopwatch, index: u8) -> u32 {
    stopwatch.lap_time(usize::from(index))
}
