//! Unified error type for the stopwatch firmware.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (behind the `defmt` feature) for on-target logging.

use crate::display::TransportError;

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Display
    /// The display bus could not be configured. Latched until reset.
    DisplayInit(TransportError),

    /// The transport refused to start a display transaction.
    DisplaySubmit(TransportError),

    // BLE
    /// The SoftDevice returned a BLE-level error.
    Ble(BleError),

    // Fuel gauge
    /// I²C read from the fuel gauge or charger failed.
    FuelGauge,
}

/// Subset of BLE errors we propagate (keeps the enum `Copy`-friendly).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BleError {
    /// Advertising could not be started.
    AdvertiseFailed,
    /// Writing a local attribute value failed.
    SetValueFailed,
    /// Sending a notification failed.
    NotifyFailed,
}

// Convenience conversions

impl From<BleError> for Error {
    fn from(e: BleError) -> Self {
        Error::Ble(e)
    }
}
