//! Library for the BLE stopwatch firmware.
//!
//! Everything hardware independent (display pipeline, stopwatch, GUI,
//! debouncing, fuel gauge decoding, power policy) builds and tests on the
//! host with no features:
//!
//! Usage: `cargo test --lib` or `cargo test`
//!
//! The `embedded` feature adds the Embassy/SoftDevice glue used by the
//! `#![no_std]` `#![no_main]` binary in main.rs.

#![cfg_attr(not(test), no_std)]

pub mod ble;
pub mod config;
pub mod display;
pub mod error;
pub mod fuel_gauge;
pub mod led;
pub mod power;
pub mod power_logic;
pub mod stopwatch;
pub mod ui;

// ═══════════════════════════════════════════════════════════════════════════
// Shared state between tasks (embedded only)
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(feature = "embedded")]
pub use shared::*;

#[cfg(feature = "embedded")]
mod shared {
    use core::cell::{Cell, RefCell};

    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use embassy_sync::blocking_mutex::Mutex;

    use crate::stopwatch::Stopwatch;

    /// A small `Copy` value published by one task and read by others.
    pub type Shared<T> = Mutex<CriticalSectionRawMutex, Cell<T>>;

    /// The stopwatch, mutated by the GUI and read by BLE.
    pub type SharedStopwatch = Mutex<CriticalSectionRawMutex, RefCell<Stopwatch>>;

    /// Uptime in milliseconds on the `u32` clock used for all timestamps.
    pub fn uptime_ms() -> u32 {
        // Wraps after ~49 days; every consumer uses wrapping differences.
        embassy_time::Instant::now().as_millis() as u32
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Cross-module tests
// ═══════════════════════════════════════════════════════════════════════════
