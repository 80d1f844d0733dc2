//! GPIO button input with async debouncing.
//!
//! Three physical buttons (active-low with internal pull-up):
//!   - RIGHT  - start / stop
//!   - LEFT   - browse laps
//!   - MIDDLE - lap / reset
//!
//! Each button is handled by an async task that waits for a GPIO edge,
//! debounces it, and sends a `ButtonPress` to the GUI channel.

use crate::config::{BUTTON_DEBOUNCE_MS, BUTTON_QUEUE_DEPTH};
use crate::ui::debounce::Debouncer;
use crate::ui::{Button, ButtonPress};
use crate::uptime_ms;
use defmt::info;
use embassy_nrf::gpio::{AnyPin, Input, Pull};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Sender;
use embassy_time::{Duration, Timer};

/// Run a single button loop.
///
/// Waits for the pin to go low (pressed), debounces, sends the press
/// stamped with its first edge, then waits for release before repeating.
pub async fn button_task(
    pin: AnyPin,
    button: Button,
    tx: &Sender<'static, CriticalSectionRawMutex, ButtonPress, BUTTON_QUEUE_DEPTH>,
) -> ! {
    let mut btn = Input::new(pin, Pull::Up);
    let mut debouncer = Debouncer::new(BUTTON_DEBOUNCE_MS);
    let window = Duration::from_millis(BUTTON_DEBOUNCE_MS.into());

    loop {
        // Wait for falling edge (button press, active-low).
        btn.wait_for_falling_edge().await;
        debouncer.edge(uptime_ms());

        Timer::after(window).await;

        if let Some(at_ms) = debouncer.confirm(btn.is_low()) {
            info!("Button: {} at {} ms", button, at_ms);
            tx.send(ButtonPress { button, at_ms }).await;

            // Wait for release to avoid repeat triggers.
            btn.wait_for_rising_edge().await;
            Timer::after(window).await;
        }
    }
}
