//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, bus addresses and timing parameters
//! live here so they can be tuned in one place.

// Display

/// 7-bit I²C address of the SSD1306-class OLED controller.
pub const DISPLAY_I2C_ADDRESS: u8 = 0x3C;

/// Display bus clock (Hz).
pub const DISPLAY_I2C_SPEED_HZ: u32 = 100_000;

/// Visible panel width in pixel columns.
pub const DISPLAY_WIDTH: usize = 64;

/// Visible panel height in 8-pixel pages.
pub const DISPLAY_ROWS: usize = 6;

/// Delay between power-up and the first display tick (ms).
pub const DISPLAY_START_DELAY_MS: u64 = 250;

/// Display state machine tick period (ms).
pub const DISPLAY_TICK_MS: u64 = 1;

// GUI

/// Screen redraw period while the display is on (ms).
pub const GUI_REFRESH_MS: u64 = 50;

/// Advertising indicator blink half-period (ms).
pub const GUI_BLINK_MS: u32 = 500;

/// Maximum number of laps kept by the stopwatch. Further laps are dropped.
pub const MAX_LAPS: usize = 99;

/// Enable automatic OLED power-off after inactivity.
pub const SCREEN_AUTO_OFF_ENABLED: bool = true;

/// Inactivity timeout before the OLED is turned off (seconds).
/// A running stopwatch keeps the screen on regardless.
pub const SCREEN_AUTO_OFF_TIMEOUT_SECS: u64 = 60;

// Buttons
//
//   Button RIGHT   → P0.11   start / stop
//   Button LEFT    → P0.12   browse laps
//   Button MIDDLE  → P0.24   lap / reset
//   Display SDA    → P0.26   (TWIM0)
//   Display SCL    → P0.27
//   Gauge SDA      → P0.30   (TWIM1, fuel gauge + charger)
//   Gauge SCL      → P0.31
//   Status LED     → P0.06

/// Button debounce window (ms).
pub const BUTTON_DEBOUNCE_MS: u32 = 30;

/// Depth of the button event queue.
pub const BUTTON_QUEUE_DEPTH: usize = 4;

// Fuel gauge

/// MAX17048 fuel gauge address and state-of-charge register.
pub const FUEL_GAUGE_ADDRESS: u8 = 0x36;
pub const FUEL_GAUGE_SOC_REGISTER: u8 = 0x04;

/// MAX20303 PMIC address and charger status register.
pub const CHARGER_ADDRESS: u8 = 0x28;
pub const CHARGER_STATUS_REGISTER: u8 = 0x06;

/// Delay before the first fuel gauge poll (ms).
pub const FUEL_GAUGE_START_DELAY_MS: u64 = 250;

/// Fuel gauge poll period (ms).
pub const FUEL_GAUGE_POLL_MS: u64 = 1000;

/// Every Nth poll reads the state of charge; the rest read the charger.
pub const FUEL_GAUGE_SOC_EVERY: u8 = 4;

// BLE

/// Complete local name placed in the scan response.
pub const BLE_DEVICE_NAME: &str = "Stopwatch";

/// Advertising interval (in 0.625 ms units). 160 = 100 ms.
pub const BLE_ADV_INTERVAL: u32 = 160;

/// How often connected attributes are refreshed from the stopwatch (ms).
pub const BLE_UPDATE_MS: u64 = 100;

/// Back-off after a failed advertising attempt (ms).
pub const BLE_RETRY_MS: u64 = 1000;

// Status LED

/// LED blink half-period while advertising (ms).
pub const LED_BLINK_MS: u64 = 250;
