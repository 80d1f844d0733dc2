//! BLE stopwatch firmware for nRF52840 + S140.
//!
//! Task layout:
//!
//! ```text
//!   buttons ──ButtonPress──► gui ──show──► DISPLAY ◄──tick── display_tick
//!                             │                               │ submit
//!                  STOPWATCH ◄┘                         display_bus ──► TWIM0
//!                      │
//!                      └──────────► ble (GATT server) ◄── BATTERY ◄── fuel_gauge ──► TWIM1
//! ```

#![no_std]
#![no_main]

use core::cell::{Cell, RefCell};
use core::mem;

use defmt::{info, unwrap};
use embassy_executor::Spawner;
use embassy_nrf::gpio::{AnyPin, Level, Output, OutputDrive, Pin};
use embassy_nrf::interrupt::{self, InterruptExt, Priority};
use embassy_nrf::twim::{self, Twim};
use embassy_nrf::{bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use nrf_softdevice::{raw, Softdevice};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use stopwatch::ble::server::{self, BleContext, Server};
use stopwatch::ble::BleStatus;
use stopwatch::config::{BLE_DEVICE_NAME, BUTTON_QUEUE_DEPTH};
use stopwatch::display::bus::{self as display_bus, DisplayBus, SharedDisplay, COMPLETION};
use stopwatch::display::Display;
use stopwatch::fuel_gauge::{self, BatteryStatus};
use stopwatch::stopwatch::Stopwatch;
use stopwatch::ui::task::GuiContext;
use stopwatch::ui::{self, Button, ButtonPress};
use stopwatch::{led, Shared, SharedStopwatch};

bind_interrupts!(struct Irqs {
    TWISPI0 => twim::InterruptHandler<peripherals::TWISPI0>;
    TWISPI1 => twim::InterruptHandler<peripherals::TWISPI1>;
});

// ═══════════════════════════════════════════════════════════════════════════
// Shared state
// ═══════════════════════════════════════════════════════════════════════════

static DISPLAY: SharedDisplay = Mutex::new(RefCell::new(Display::new(DisplayBus::new(), &COMPLETION)));
static STOPWATCH: SharedStopwatch = Mutex::new(RefCell::new(Stopwatch::new()));
static BLE_STATUS: Shared<BleStatus> = Mutex::new(Cell::new(BleStatus::Idle));
static BATTERY: Shared<BatteryStatus> = Mutex::new(Cell::new(BatteryStatus {
    percent: 0,
    charging: false,
}));
static SCREEN_ON: Shared<bool> = Mutex::new(Cell::new(true));

static BUTTONS: Channel<CriticalSectionRawMutex, ButtonPress, BUTTON_QUEUE_DEPTH> = Channel::new();

// ═══════════════════════════════════════════════════════════════════════════
// Tasks
// ═══════════════════════════════════════════════════════════════════════════

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

#[embassy_executor::task]
async fn display_bus_task(i2c: Twim<'static, peripherals::TWISPI0>) -> ! {
    display_bus::bus_task(i2c).await
}

#[embassy_executor::task]
async fn display_tick_task() -> ! {
    display_bus::tick_task(&DISPLAY).await
}

#[embassy_executor::task(pool_size = 3)]
async fn button_task(pin: AnyPin, button: Button) -> ! {
    ui::buttons::button_task(pin, button, &BUTTONS.sender()).await
}

#[embassy_executor::task]
async fn gui_task() -> ! {
    let ctx = GuiContext {
        display: &DISPLAY,
        stopwatch: &STOPWATCH,
        ble: &BLE_STATUS,
        battery: &BATTERY,
        screen_on: &SCREEN_ON,
    };
    ui::task::gui_task(ctx, &BUTTONS.receiver()).await
}

#[embassy_executor::task]
async fn fuel_gauge_task(i2c: Twim<'static, peripherals::TWISPI1>) -> ! {
    fuel_gauge::task::fuel_gauge_task(i2c, &BATTERY).await
}

#[embassy_executor::task]
async fn ble_task(sd: &'static Softdevice, server: &'static Server) -> ! {
    let ctx = BleContext {
        stopwatch: &STOPWATCH,
        status: &BLE_STATUS,
        battery: &BATTERY,
    };
    server::ble_task(sd, server, ctx).await
}

#[embassy_executor::task]
async fn led_task(led: Output<'static>) -> ! {
    led::led_task(led, &BLE_STATUS, &SCREEN_ON).await
}

// ═══════════════════════════════════════════════════════════════════════════
// Entry point
// ═══════════════════════════════════════════════════════════════════════════

fn softdevice_config() -> nrf_softdevice::Config {
    nrf_softdevice::Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t { att_mtu: 256 }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
            central_role_count: 0,
            central_sec_count: 0,
            _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: BLE_DEVICE_NAME.as_ptr() as _,
            current_len: BLE_DEVICE_NAME.len() as u16,
            max_len: BLE_DEVICE_NAME.len() as u16,
            write_perm: unsafe { mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("stopwatch starting");

    // The SoftDevice reserves priorities 0, 1 and 4.
    let mut config = embassy_nrf::config::Config::default();
    config.gpiote_interrupt_priority = Priority::P2;
    config.time_interrupt_priority = Priority::P2;
    let p = embassy_nrf::init(config);
    interrupt::TWISPI0.set_priority(Priority::P3);
    interrupt::TWISPI1.set_priority(Priority::P3);

    let sd = Softdevice::enable(&softdevice_config());
    static SERVER: StaticCell<Server> = StaticCell::new();
    let server = SERVER.init(unwrap!(Server::new(sd)));
    unwrap!(spawner.spawn(softdevice_task(sd)));

    // Display on TWIM0, fuel gauge and charger on TWIM1.
    let mut twim_config = twim::Config::default();
    twim_config.frequency = twim::Frequency::K100;
    let display_i2c = Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim_config);
    let gauge_i2c = Twim::new(p.TWISPI1, Irqs, p.P0_30, p.P0_31, twim::Config::default());

    unwrap!(spawner.spawn(display_bus_task(display_i2c)));
    unwrap!(spawner.spawn(display_tick_task()));
    unwrap!(spawner.spawn(fuel_gauge_task(gauge_i2c)));

    unwrap!(spawner.spawn(button_task(p.P0_11.degrade(), Button::Right)));
    unwrap!(spawner.spawn(button_task(p.P0_12.degrade(), Button::Left)));
    unwrap!(spawner.spawn(button_task(p.P0_24.degrade(), Button::Middle)));
    unwrap!(spawner.spawn(gui_task()));

    let led = Output::new(p.P0_06, Level::Low, OutputDrive::Standard);
    unwrap!(spawner.spawn(led_task(led)));

    unwrap!(spawner.spawn(ble_task(sd, server)));
}
