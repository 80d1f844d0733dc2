//! Fuel gauge polling task.

use defmt::{debug, error};
use embassy_time::{Duration, Ticker, Timer};
use embedded_hal_async::i2c::I2c;

use super::{BatteryStatus, PollSchedule, Reading};
use crate::config::{
    CHARGER_ADDRESS, CHARGER_STATUS_REGISTER, FUEL_GAUGE_ADDRESS, FUEL_GAUGE_POLL_MS,
    FUEL_GAUGE_SOC_REGISTER, FUEL_GAUGE_START_DELAY_MS,
};
use crate::error::Error;
use crate::Shared;

/// Poll the gauge and charger on `i2c`, publishing into `battery`.
pub async fn fuel_gauge_task<I: I2c>(mut i2c: I, battery: &'static Shared<BatteryStatus>) -> ! {
    Timer::after(Duration::from_millis(FUEL_GAUGE_START_DELAY_MS)).await;

    let mut schedule = PollSchedule::new();
    let mut ticker = Ticker::every(Duration::from_millis(FUEL_GAUGE_POLL_MS));

    loop {
        let mut status = battery.lock(|b| b.get());
        match schedule.next_reading() {
            Reading::StateOfCharge => {
                let raw = read_soc(&mut i2c).await;
                if let Err(e) = raw {
                    error!("Fuel gauge: SOC read failed: {}", e);
                }
                status.record_soc(raw.ok());
            }
            Reading::ChargerStatus => {
                let raw = read_charger(&mut i2c).await;
                if let Err(e) = raw {
                    error!("Fuel gauge: charger read failed: {}", e);
                }
                status.record_charger(raw.ok());
            }
        }
        debug!("Fuel gauge: {}", status);
        battery.lock(|b| b.set(status));

        ticker.next().await;
    }
}

async fn read_soc<I: I2c>(i2c: &mut I) -> Result<[u8; 2], Error> {
    let mut raw = [0u8; 2];
    i2c.write_read(FUEL_GAUGE_ADDRESS, &[FUEL_GAUGE_SOC_REGISTER], &mut raw)
        .await
        .map_err(|_| Error::FuelGauge)?;
    Ok(raw)
}

async fn read_charger<I: I2c>(i2c: &mut I) -> Result<u8, Error> {
    let mut raw = [0u8; 1];
    i2c.write_read(CHARGER_ADDRESS, &[CHARGER_STATUS_REGISTER], &mut raw)
        .await
        .map_err(|_| Error::FuelGauge)?;
    Ok(raw[0])
}
