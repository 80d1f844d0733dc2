//! Asynchronous OLED display driver.
//!
//! The application draws into the working frame through a [`Surface`] and
//! publishes it with [`Display::show`]. A periodic task calls
//! [`Display::tick`], which advances the transmission state machine by at
//! most one step and starts at most one bus transaction. Transaction
//! results come back through a shared [`Completion`].
//!
//! ```text
//!   draw ──► working ──show──► ready ──tick──► transmit ──► I²C
//! ```

pub mod commands;
pub mod font;
pub mod frame;
pub mod machine;
pub mod surface;
pub mod transport;

#[cfg(feature = "embedded")]
pub mod bus;

#[cfg(test)]
mod tests;

pub use frame::{FramePool, Roles, FRAME_BYTES, FRAME_SIZE};
pub use machine::{Action, Bus, Machine, State};
pub use surface::{char_width, string_width, Surface};
pub use transport::{Completion, Transport, TransportError};

use crate::config::{DISPLAY_I2C_ADDRESS, DISPLAY_I2C_SPEED_HZ};
use crate::error::Error;
use commands::COMMAND_PREFIX;

/// Display driver: frame pool, state machine and transport.
pub struct Display<'c, T> {
    transport: T,
    completion: &'c Completion,
    frames: FramePool,
    machine: Machine,
    command: [u8; 2],
}

impl<'c, T: Transport> Display<'c, T> {
    pub const fn new(transport: T, completion: &'c Completion) -> Self {
        Self {
            transport,
            completion,
            frames: FramePool::new(),
            machine: Machine::new(),
            command: [COMMAND_PREFIX, 0],
        }
    }

    /// Advance the driver by one step.
    ///
    /// Returns the action taken. An error means the step failed to reach
    /// the bus; a submit error is also recorded as a failed transaction,
    /// so the next tick starts recovery.
    pub fn tick(&mut self) -> Result<Action, Error> {
        let bus = if self.completion.is_busy() {
            Bus::Busy
        } else if self.completion.take_failure() {
            Bus::Failed
        } else {
            Bus::Ready
        };

        let action = self.machine.step(bus, self.frames.transmit_requested());
        match action {
            Action::None => {}
            Action::InitBus => {
                if let Err(e) = self
                    .transport
                    .initialize(DISPLAY_I2C_ADDRESS, DISPLAY_I2C_SPEED_HZ)
                {
                    self.machine.bus_init_failed();
                    return Err(Error::DisplayInit(e));
                }
                self.completion.clear();
                self.machine.bus_initialized();
            }
            Action::Command(byte) => {
                self.command[1] = byte;
                self.completion.arm();
                let result = self.transport.submit(&self.command);
                self.check_submit(result)?;
            }
            Action::BeginTransmit => self.frames.begin_transmit(),
            Action::SendFrame => {
                self.completion.arm();
                let result = self.transport.submit(self.frames.transmit_bytes());
                self.check_submit(result)?;
            }
        }
        Ok(action)
    }

    /// Drawing access to the working frame.
    pub fn surface(&mut self) -> Surface<'_> {
        Surface::new(self.frames.working_mut())
    }

    /// Publish the working frame. Returns immediately; the frame goes out
    /// on a later tick unless a newer one replaces it first.
    pub fn show(&mut self) {
        self.frames.commit();
    }

    /// Turn the panel off. Frames shown afterwards are kept but not sent
    /// until [`reset`](Self::reset).
    pub fn power_off(&mut self) {
        self.machine.request_off();
    }

    /// Start over from Uninitialized: re-acquire the bus, replay the init
    /// sequence and send the latest frame.
    pub fn reset(&mut self) {
        self.machine.reset();
    }

    pub fn state(&self) -> State {
        self.machine.state()
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn frames(&self) -> &FramePool {
        &self.frames
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    fn check_submit(&self, result: Result<(), TransportError>) -> Result<(), Error> {
        result.map_err(|e| {
            self.completion.finish(false);
            Error::DisplaySubmit(e)
        })
    }
}
