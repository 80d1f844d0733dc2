//! GUI task: button presses in, frames out.

use defmt::info;
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Receiver;
use embassy_time::{Duration, Timer};

use super::gui::Gui;
use super::{screen, ButtonPress};
use crate::ble::BleStatus;
use crate::config::{BUTTON_QUEUE_DEPTH, GUI_REFRESH_MS};
use crate::display::bus::SharedDisplay;
use crate::fuel_gauge::BatteryStatus;
use crate::power::{PowerManager, ScreenState};
use crate::{uptime_ms, Shared, SharedStopwatch};

/// Shared state the GUI reads and writes.
pub struct GuiContext {
    pub display: &'static SharedDisplay,
    pub stopwatch: &'static SharedStopwatch,
    pub ble: &'static Shared<BleStatus>,
    pub battery: &'static Shared<BatteryStatus>,
    pub screen_on: &'static Shared<bool>,
}

/// Apply presses and redraw every `GUI_REFRESH_MS`, forever.
pub async fn gui_task(
    ctx: GuiContext,
    rx: &Receiver<'static, CriticalSectionRawMutex, ButtonPress, BUTTON_QUEUE_DEPTH>,
) -> ! {
    let mut gui = Gui::new();
    let mut power = PowerManager::new(uptime_ms());
    ctx.screen_on.lock(|c| c.set(true));

    loop {
        let refresh = Timer::after(Duration::from_millis(GUI_REFRESH_MS));
        if let Either::First(press) = select(rx.receive(), refresh).await {
            if power.activity(press.at_ms) {
                info!("GUI: screen on");
                ctx.display.lock(|d| d.borrow_mut().reset());
                ctx.screen_on.lock(|c| c.set(true));
            } else {
                ctx.stopwatch
                    .lock(|s| gui.handle_press(&mut s.borrow_mut(), press));
                info!("GUI: {} -> {}", press.button, ctx.stopwatch.lock(|s| s.borrow().status()));
            }
        }

        gui.set_ble_status(ctx.ble.lock(|c| c.get()));
        gui.set_battery(ctx.battery.lock(|c| c.get()));

        let now = uptime_ms();
        let running = ctx.stopwatch.lock(|s| s.borrow().is_running());
        if power.tick(now, running) == Some(ScreenState::Off) {
            info!("GUI: screen off after inactivity");
            ctx.display.lock(|d| d.borrow_mut().power_off());
            ctx.screen_on.lock(|c| c.set(false));
        }

        if power.screen_on() {
            ctx.stopwatch.lock(|s| {
                let watch = s.borrow();
                ctx.display.lock(|d| {
                    let mut display = d.borrow_mut();
                    screen::render(&mut display.surface(), &gui, &watch, now);
                    display.show();
                });
            });
        }
    }
}
