//! Battery monitoring: MAX17048 fuel gauge and MAX20303 charger status.
//!
//! Both chips are polled on one timer. Most polls read the charger
//! status; every `FUEL_GAUGE_SOC_EVERY`th poll reads the state of charge.

#[cfg(feature = "embedded")]
pub mod task;

use crate::config::FUEL_GAUGE_SOC_EVERY;

/// Latest battery reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryStatus {
    /// State of charge, 0-100.
    pub percent: u8,
    pub charging: bool,
}

impl BatteryStatus {
    /// Apply a state-of-charge register read. `None` means the read failed.
    pub fn record_soc(&mut self, raw: Option<[u8; 2]>) {
        self.percent = raw.map_or(0, soc_percent);
    }

    /// Apply a charger status register read. `None` means the read failed.
    pub fn record_charger(&mut self, raw: Option<u8>) {
        self.charging = raw.is_some_and(is_charging);
    }
}

/// Which register the next poll reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reading {
    StateOfCharge,
    ChargerStatus,
}

#[derive(Debug, Clone, Default)]
pub struct PollSchedule {
    count: u8,
}

impl PollSchedule {
    pub const fn new() -> Self {
        Self { count: 0 }
    }

    pub fn next_reading(&mut self) -> Reading {
        self.count += 1;
        if self.count >= FUEL_GAUGE_SOC_EVERY {
            self.count = 0;
            Reading::StateOfCharge
        } else {
            Reading::ChargerStatus
        }
    }
}

/// SOC register (big-endian, 1/256 % per bit) to whole percent.
pub fn soc_percent(raw: [u8; 2]) -> u8 {
    // The gauge reports slightly above 100 % when full.
    (u16::from_be_bytes(raw) / 256).min(100) as u8
}

/// Charger state field values 2 through 6 are the charging phases.
pub fn is_charging(status: u8) -> bool {
    matches!(status & 0x07, 2..=6)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soc_register_to_percent() {
        assert_eq!(soc_percent([0x00, 0x00]), 0);
        assert_eq!(soc_percent([0x32, 0x80]), 50);
        assert_eq!(soc_percent([0x64, 0x00]), 100);
        assert_eq!(soc_percent([0x65, 0xFF]), 100);
        assert_eq!(soc_percent([0xFF, 0xFF]), 100);
    }

    #[test]
    fn charger_states() {
        for status in 0..=7u8 {
            assert_eq!(is_charging(status), (2..=6).contains(&status));
        }
        assert!(is_charging(0xF3));
        assert!(!is_charging(0xF8));
    }

    #[test]
    fn schedule_reads_soc_every_fourth_poll() {
        let mut schedule = PollSchedule::new();
        let readings: Vec<Reading> = (0..8).map(|_| schedule.next_reading()).collect();
        use Reading::{ChargerStatus as C, StateOfCharge as S};
        assert_eq!(readings, vec![C, C, C, S, C, C, C, S]);
    }

    #[test]
    fn failed_reads_reset_values() {
        let mut battery = BatteryStatus::default();
        battery.record_soc(Some([0x4B, 0x00]));
        battery.record_charger(Some(0x03));
        assert_eq!(battery, BatteryStatus { percent: 75, charging: true });

        battery.record_soc(None);
        battery.record_charger(None);
        assert_eq!(battery, BatteryStatus::default());
    }
}
