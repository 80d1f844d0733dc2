//! SoftDevice GATT server, advertising and attribute publishing.
//!
//! One connection at a time. After a disconnect the task goes straight
//! back to advertising.

use core::cell::Cell;

use defmt::{error, info};
use embassy_futures::select::select;
use embassy_time::{Duration, Timer};
use nrf_softdevice::ble::advertisement_builder::{
    Flag, LegacyAdvertisementBuilder, LegacyAdvertisementPayload, ServiceList,
};
use nrf_softdevice::ble::{gatt_server, peripheral, Connection};
use nrf_softdevice::Softdevice;

use super::{selected_lap_time, BleStatus, Changes, Publisher, Snapshot};
use crate::config::{BLE_ADV_INTERVAL, BLE_DEVICE_NAME, BLE_RETRY_MS, BLE_UPDATE_MS};
use crate::error::{BleError, Error};
use crate::fuel_gauge::BatteryStatus;
use crate::{uptime_ms, Shared, SharedStopwatch};

/// Stopwatch service. Every characteristic shares the service base UUID.
#[nrf_softdevice::gatt_service(uuid = "2c611e88-85cc-7c21-d6f5-9595051fca00")]
pub struct StopwatchService {
    /// 0 = reset, 1 = running, 2 = stopped.
    #[characteristic(uuid = "2c611e88-85cc-7c21-d6f5-9595051fca01", read, notify)]
    pub status: u8,

    /// Elapsed time in milliseconds.
    #[characteristic(uuid = "2c611e88-85cc-7c21-d6f5-9595051fca10", read)]
    pub elapsed: u32,

    #[characteristic(uuid = "2c611e88-85cc-7c21-d6f5-9595051fca20", read, notify)]
    pub laps_count: u8,

    /// Zero-based lap index; selects what Lap Time reports.
    #[characteristic(uuid = "2c611e88-85cc-7c21-d6f5-9595051fca21", write)]
    pub lap_select: u8,

    /// Duration of the selected lap in milliseconds.
    #[characteristic(uuid = "2c611e88-85cc-7c21-d6f5-9595051fca22", read)]
    pub lap_time: u32,
}

#[nrf_softdevice::gatt_service(uuid = "180f")]
pub struct BatteryService {
    #[characteristic(uuid = "2a19", read, notify)]
    pub battery_level: u8,
}

#[nrf_softdevice::gatt_server]
pub struct Server {
    pub stopwatch: StopwatchService,
    pub battery: BatteryService,
}

/// Service UUID, least significant byte first.
const STOPWATCH_SERVICE_UUID_LE: [u8; 16] = [
    0x00, 0xca, 0x1f, 0x05, 0x95, 0x95, 0xf5, 0xd6, 0x21, 0x7c, 0xcc, 0x85, 0x88, 0x1e, 0x61, 0x2c,
];

static ADV_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .flags(&[Flag::GeneralDiscovery, Flag::LE_Only])
    .services_128(ServiceList::Complete, &[STOPWATCH_SERVICE_UUID_LE])
    .build();

static SCAN_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .full_name(BLE_DEVICE_NAME)
    .build();

/// Shared state the BLE task reads and writes.
pub struct BleContext {
    pub stopwatch: &'static SharedStopwatch,
    pub status: &'static Shared<BleStatus>,
    pub battery: &'static Shared<BatteryStatus>,
}

/// CCCD state of the current connection.
#[derive(Default)]
struct Subscriptions {
    status: Cell<bool>,
    laps_count: Cell<bool>,
    battery: Cell<bool>,
}

impl Subscriptions {
    fn on_event(&self, server: &Server, ctx: &BleContext, event: ServerEvent) {
        match event {
            ServerEvent::Stopwatch(e) => match e {
                StopwatchServiceEvent::StatusCccdWrite { notifications } => {
                    self.status.set(notifications);
                }
                StopwatchServiceEvent::LapsCountCccdWrite { notifications } => {
                    self.laps_count.set(notifications);
                }
                StopwatchServiceEvent::LapSelectWrite(index) => {
                    let time = ctx.stopwatch.lock(|s| selected_lap_time(&s.borrow(), index));
                    info!("BLE: lap {} selected ({} ms)", index, time);
                    if server.stopwatch.lap_time_set(&time).is_err() {
                        error!("BLE: {}", Error::from(BleError::SetValueFailed));
                    }
                }
            },
            ServerEvent::Battery(BatteryServiceEvent::BatteryLevelCccdWrite { notifications }) => {
                self.battery.set(notifications);
            }
        }
    }
}

/// Advertise, serve one connection, repeat. Never returns.
pub async fn ble_task(sd: &'static Softdevice, server: &'static Server, ctx: BleContext) -> ! {
    let config = peripheral::Config {
        interval: BLE_ADV_INTERVAL,
        ..Default::default()
    };

    loop {
        ctx.status.lock(|c| c.set(BleStatus::Advertising));
        info!("BLE: advertising as \"{}\"", BLE_DEVICE_NAME);

        let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
            adv_data: &ADV_DATA,
            scan_data: &SCAN_DATA,
        };
        let conn = match peripheral::advertise_connectable(sd, adv, &config).await {
            Ok(conn) => conn,
            Err(e) => {
                error!("BLE: {}: {}", Error::from(BleError::AdvertiseFailed), e);
                ctx.status.lock(|c| c.set(BleStatus::Idle));
                Timer::after(Duration::from_millis(BLE_RETRY_MS)).await;
                continue;
            }
        };

        info!("BLE: connected");
        ctx.status.lock(|c| c.set(BleStatus::Connected));

        let subscriptions = Subscriptions::default();
        let gatt = gatt_server::run(&conn, server, |event| {
            subscriptions.on_event(server, &ctx, event)
        });
        select(gatt, publish(&conn, server, &ctx, &subscriptions)).await;

        info!("BLE: disconnected");
        ctx.status.lock(|c| c.set(BleStatus::Idle));
    }
}

/// Mirror the stopwatch into the attribute table while connected.
async fn publish(conn: &Connection, server: &Server, ctx: &BleContext, subs: &Subscriptions) {
    let mut publisher = Publisher::new();
    loop {
        let battery = ctx.battery.lock(|c| c.get());
        let snapshot = ctx
            .stopwatch
            .lock(|s| Snapshot::capture(&s.borrow(), battery, uptime_ms()));
        let changes = publisher.update(snapshot);

        if let Err(e) = write_values(server, &snapshot) {
            error!("BLE: {}", e);
        }
        if let Err(e) = notify_changes(conn, server, &snapshot, changes, subs) {
            error!("BLE: {}", e);
        }

        Timer::after(Duration::from_millis(BLE_UPDATE_MS)).await;
    }
}

fn write_values(server: &Server, snapshot: &Snapshot) -> Result<(), Error> {
    let stopwatch = &server.stopwatch;
    stopwatch
        .status_set(&snapshot.status)
        .map_err(|_| BleError::SetValueFailed)?;
    stopwatch
        .elapsed_set(&snapshot.elapsed_ms)
        .map_err(|_| BleError::SetValueFailed)?;
    stopwatch
        .laps_count_set(&snapshot.laps_count)
        .map_err(|_| BleError::SetValueFailed)?;
    server
        .battery
        .battery_level_set(&snapshot.battery_percent)
        .map_err(|_| BleError::SetValueFailed)?;
    Ok(())
}

fn notify_changes(
    conn: &Connection,
    server: &Server,
    snapshot: &Snapshot,
    changes: Changes,
    subs: &Subscriptions,
) -> Result<(), Error> {
    if changes.status && subs.status.get() {
        server
            .stopwatch
            .status_notify(conn, &snapshot.status)
            .map_err(|_| BleError::NotifyFailed)?;
    }
    if changes.laps_count && subs.laps_count.get() {
        server
            .stopwatch
            .laps_count_notify(conn, &snapshot.laps_count)
            .map_err(|_| BleError::NotifyFailed)?;
    }
    if changes.battery && subs.battery.get() {
        server
            .battery
            .battery_level_notify(conn, &snapshot.battery_percent)
            .map_err(|_| BleError::NotifyFailed)?;
    }
    Ok(())
}
