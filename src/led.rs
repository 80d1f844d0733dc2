//! Status LED.
//!
//! Blinks while advertising, solid while connected, dark otherwise and
//! whenever the screen is off.

use crate::ble::BleStatus;

/// LED level for one blink phase.
pub fn led_level(ble: BleStatus, screen_on: bool, blink_phase: bool) -> bool {
    if !screen_on {
        return false;
    }
    match ble {
        BleStatus::Connected => true,
        BleStatus::Advertising => blink_phase,
        BleStatus::Idle => false,
    }
}

#[cfg(feature = "embedded")]
pub use task::led_task;

#[cfg(feature = "embedded")]
mod task {
    use embassy_time::{Duration, Timer};
    use embedded_hal::digital::OutputPin;

    use super::led_level;
    use crate::ble::BleStatus;
    use crate::config::LED_BLINK_MS;
    use crate::Shared;

    /// Drive `led` from the shared link and screen state, forever.
    pub async fn led_task<P: OutputPin>(
        mut led: P,
        ble: &'static Shared<BleStatus>,
        screen_on: &'static Shared<bool>,
    ) -> ! {
        let mut phase = false;
        loop {
            phase = !phase;
            let on = led_level(ble.lock(|c| c.get()), screen_on.lock(|c| c.get()), phase);
            // GPIO writes on nRF are infallible.
            let _ = if on { led.set_high() } else { led.set_low() };
            Timer::after(Duration::from_millis(LED_BLINK_MS)).await;
        }
    }
}
