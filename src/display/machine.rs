//! Transmission state machine.
//!
//! [`Machine::step`] is a pure transition function: it looks at the bus
//! observation and the transmit request, updates the state and cursors,
//! and names at most one side effect for the driver to perform. It never
//! touches the transport or the frame pool itself.

use super::commands::{Cursor, ADDRESSING_COMMANDS, DISPLAY_OFF, INIT_COMMANDS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    Uninitialized,
    InitCommands,
    SendBufferCommands,
    SendBuffer,
    Idle,
    OffRequested,
    Off,
}

/// What a tick observed on the bus before stepping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bus {
    /// A transaction is still outstanding.
    Busy,
    /// The last transaction (if any) succeeded.
    Ready,
    /// The last transaction failed.
    Failed,
}

/// Side effect requested by one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    None,
    /// Configure the transport; report back with
    /// [`Machine::bus_initialized`] or [`Machine::bus_init_failed`].
    InitBus,
    /// Send one command byte.
    Command(u8),
    /// Move the ready frame into the transmit role.
    BeginTransmit,
    /// Send the whole transmit buffer.
    SendFrame,
}

#[derive(Debug, Clone)]
pub struct Machine {
    state: State,
    init: Cursor,
    addressing: Cursor,
    init_fault: bool,
    failures: u32,
}

impl Machine {
    pub const fn new() -> Self {
        Self {
            state: State::Uninitialized,
            init: Cursor::new(INIT_COMMANDS),
            addressing: Cursor::new(ADDRESSING_COMMANDS),
            init_fault: false,
            failures: 0,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn init_position(&self) -> usize {
        self.init.position()
    }

    pub fn addressing_position(&self) -> usize {
        self.addressing.position()
    }

    /// True after a failed bus initialisation, until [`reset`](Self::reset).
    pub fn init_fault(&self) -> bool {
        self.init_fault
    }

    /// Failed transactions since the driver last reached Idle.
    pub fn consecutive_failures(&self) -> u32 {
        self.failures
    }

    /// Advance by one tick.
    pub fn step(&mut self, bus: Bus, transmit_requested: bool) -> Action {
        match self.state {
            State::Uninitialized if self.init_fault => Action::None,
            // A transaction issued before a reset may still be outstanding.
            State::Uninitialized if bus == Bus::Busy => Action::None,
            State::Uninitialized => Action::InitBus,

            State::Idle if transmit_requested => self.start_transfer(),
            State::Idle => Action::None,

            _ if bus == Bus::Busy => Action::None,

            State::InitCommands => {
                if bus == Bus::Failed {
                    self.failures = self.failures.saturating_add(1);
                    self.init.rewind();
                    return Action::None;
                }
                if let Some(byte) = self.init.advance() {
                    Action::Command(byte)
                } else if transmit_requested {
                    self.start_transfer()
                } else {
                    self.enter_idle()
                }
            }
            State::SendBufferCommands => {
                if bus == Bus::Failed {
                    return self.recover();
                }
                match self.addressing.advance() {
                    Some(byte) => Action::Command(byte),
                    None => {
                        self.state = State::SendBuffer;
                        Action::SendFrame
                    }
                }
            }
            State::SendBuffer => {
                if bus == Bus::Failed {
                    return self.recover();
                }
                self.failures = 0;
                if transmit_requested {
                    self.start_transfer()
                } else {
                    self.enter_idle()
                }
            }
            State::OffRequested => {
                self.state = State::Off;
                Action::Command(DISPLAY_OFF)
            }
            State::Off => {
                self.state = State::OffRequested;
                Action::None
            }
        }
    }

    /// The transport accepted the configuration.
    pub fn bus_initialized(&mut self) {
        self.init.rewind();
        self.state = State::InitCommands;
    }

    /// The transport could not be configured. Nothing more happens until
    /// [`reset`](Self::reset).
    pub fn bus_init_failed(&mut self) {
        self.init_fault = true;
    }

    /// Enter the Off cycle. Only [`reset`](Self::reset) leaves it.
    /// Ignored while an initialisation failure is latched: there is no bus
    /// to send the off command on.
    pub fn request_off(&mut self) {
        if !self.init_fault {
            self.state = State::OffRequested;
        }
    }

    /// Back to Uninitialized, clearing a latched initialisation failure.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn start_transfer(&mut self) -> Action {
        self.addressing.rewind();
        self.state = State::SendBufferCommands;
        Action::BeginTransmit
    }

    fn enter_idle(&mut self) -> Action {
        self.failures = 0;
        self.state = State::Idle;
        Action::None
    }

    fn recover(&mut self) -> Action {
        self.failures = self.failures.saturating_add(1);
        self.init.rewind();
        self.state = State::InitCommands;
        Action::None
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}
