//! Hardware side of the display pipeline.
//!
//! - [`DisplayBus`] implements [`Transport`] by staging the bytes and
//!   signalling [`bus_task`].
//! - [`bus_task`] owns the TWIM peripheral, performs each write and
//!   reports the outcome through [`COMPLETION`]. It stands in for the
//!   transfer-complete interrupt.
//! - [`tick_task`] is the polling loop: one [`Display::tick`] per
//!   `DISPLAY_TICK_MS`, inside the display mutex.

use core::cell::RefCell;

use defmt::{error, info, warn};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Timer};
use embedded_hal_async::i2c::I2c;
use heapless::Vec;

use super::{Completion, Display, State, Transport, TransportError, FRAME_BYTES};
use crate::config::{DISPLAY_I2C_SPEED_HZ, DISPLAY_START_DELAY_MS, DISPLAY_TICK_MS};
use crate::error::Error;

/// Display driver shared between the tick task and the GUI.
pub type SharedDisplay = Mutex<CriticalSectionRawMutex, RefCell<Display<'static, DisplayBus>>>;

/// Completion flags written by [`bus_task`].
pub static COMPLETION: Completion = Completion::new();

/// One staged write for the bus task.
struct Request {
    address: u8,
    bytes: Vec<u8, FRAME_BYTES>,
}

static REQUEST: Signal<CriticalSectionRawMutex, Request> = Signal::new();

/// Transport handing writes to [`bus_task`].
///
/// The TWIM clock is fixed when the peripheral is created, so
/// `initialize` only accepts the configured speed.
pub struct DisplayBus {
    address: Option<u8>,
}

impl DisplayBus {
    pub const fn new() -> Self {
        Self { address: None }
    }
}

impl Default for DisplayBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for DisplayBus {
    fn initialize(&mut self, address: u8, speed_hz: u32) -> Result<(), TransportError> {
        if address > 0x7F || speed_hz != DISPLAY_I2C_SPEED_HZ {
            return Err(TransportError::Unsupported);
        }
        REQUEST.reset();
        self.address = Some(address);
        Ok(())
    }

    fn submit(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        let address = self.address.ok_or(TransportError::Bus)?;
        if REQUEST.signaled() {
            return Err(TransportError::Busy);
        }
        let bytes = Vec::from_slice(bytes).map_err(|_| TransportError::Unsupported)?;
        REQUEST.signal(Request { address, bytes });
        Ok(())
    }
}

/// Perform staged display writes on `i2c`, forever.
pub async fn bus_task<I: I2c>(mut i2c: I) -> ! {
    loop {
        let request = REQUEST.wait().await;
        let ok = i2c.write(request.address, &request.bytes).await.is_ok();
        if !ok {
            warn!("Display: write of {} bytes failed", request.bytes.len());
        }
        COMPLETION.finish(ok);
    }
}

/// Drive the display state machine, forever.
pub async fn tick_task(display: &'static SharedDisplay) -> ! {
    Timer::after(Duration::from_millis(DISPLAY_START_DELAY_MS)).await;
    info!("Display: driver started");
    let mut was_off = false;
    let mut failures: u32 = 0;

    loop {
        let (result, state, count) = display.lock(|d| {
            let mut d = d.borrow_mut();
            let result = d.tick();
            (result, d.state(), d.machine().consecutive_failures())
        });

        match result {
            Err(Error::DisplayInit(e)) => error!("Display: bus init failed: {}", e),
            Err(e) => warn!("Display: {}", e),
            Ok(_) => {}
        }
        if count > failures {
            warn!("Display: transaction failed, re-initialising (#{})", count);
        }
        failures = count;
        let off = matches!(state, State::Off | State::OffRequested);
        if off && !was_off {
            info!("Display: off");
        }
        was_off = off;

        Timer::after(Duration::from_millis(DISPLAY_TICK_MS)).await;
    }
}
