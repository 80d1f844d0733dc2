//! Driver scenarios against a recording transport.
//!
//! The test plays the completion interrupt: after each tick it decides
//! whether the outstanding transaction succeeded.

use super::commands::{ADDRESSING_COMMANDS, COMMAND_PREFIX, DATA_PREFIX, DISPLAY_OFF, INIT_COMMANDS};
use super::*;
use crate::config::{DISPLAY_I2C_ADDRESS, DISPLAY_I2C_SPEED_HZ, DISPLAY_WIDTH};

#[derive(Default)]
struct MockBus {
    sent: Vec<Vec<u8>>,
    inits: Vec<(u8, u32)>,
    fail_init: bool,
    reject_submit: bool,
}

impl MockBus {
    fn frames(&self) -> Vec<&Vec<u8>> {
        self.sent.iter().filter(|t| t.len() == FRAME_BYTES).collect()
    }

    fn commands(&self) -> Vec<u8> {
        self.sent
            .iter()
            .filter(|t| t.len() == 2)
            .map(|t| {
                assert_eq!(t[0], COMMAND_PREFIX);
                t[1]
            })
            .collect()
    }
}

impl Transport for MockBus {
    fn initialize(&mut self, address: u8, speed_hz: u32) -> Result<(), TransportError> {
        self.inits.push((address, speed_hz));
        if self.fail_init {
            Err(TransportError::Bus)
        } else {
            Ok(())
        }
    }

    fn submit(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        if self.reject_submit {
            return Err(TransportError::Busy);
        }
        self.sent.push(bytes.to_vec());
        Ok(())
    }
}

/// Tick, completing every transaction successfully, until the driver
/// reaches `target` with nothing outstanding.
fn run_until(display: &mut Display<'_, MockBus>, completion: &Completion, target: State) {
    for _ in 0..1000 {
        if completion.is_busy() {
            completion.finish(true);
        }
        display.tick().unwrap();
        if display.state() == target && !completion.is_busy() {
            return;
        }
    }
    panic!("never reached {target:?}, stuck in {:?}", display.state());
}

/// Tick until the driver is in `target` with a transaction outstanding.
fn run_until_busy_in(display: &mut Display<'_, MockBus>, completion: &Completion, target: State) {
    for _ in 0..1000 {
        if completion.is_busy() {
            completion.finish(true);
        }
        display.tick().unwrap();
        if display.state() == target && completion.is_busy() {
            return;
        }
    }
    panic!("never busy in {target:?}");
}

#[test]
fn first_tick_initializes_bus() {
    let completion = Completion::new();
    let mut display = Display::new(MockBus::default(), &completion);
    assert_eq!(display.state(), State::Uninitialized);
    assert_eq!(display.tick(), Ok(Action::InitBus));
    assert_eq!(display.state(), State::InitCommands);
    assert_eq!(display.machine().init_position(), 0);
    assert_eq!(
        display.transport().inits,
        vec![(DISPLAY_I2C_ADDRESS, DISPLAY_I2C_SPEED_HZ)]
    );
}

#[test]
fn init_sequence_sent_in_order() {
    let completion = Completion::new();
    let mut display = Display::new(MockBus::default(), &completion);
    run_until(&mut display, &completion, State::Idle);
    assert_eq!(display.transport().commands(), INIT_COMMANDS);
    assert!(display.transport().frames().is_empty());
}

#[test]
fn single_pixel_frame_is_transmitted() {
    let completion = Completion::new();
    let mut display = Display::new(MockBus::default(), &completion);
    {
        let mut surface = display.surface();
        surface.clear();
        surface.set_pixel(5, 0, 0xFF);
    }
    display.show();
    run_until(&mut display, &completion, State::Idle);

    let bus = display.transport();
    let mut expected_commands = INIT_COMMANDS.to_vec();
    expected_commands.extend_from_slice(ADDRESSING_COMMANDS);
    assert_eq!(bus.commands(), expected_commands);

    let frames = bus.frames();
    assert_eq!(frames.len(), 1);
    let frame = frames[0];
    assert_eq!(frame[0], DATA_PREFIX);
    for (index, &byte) in frame[1..].iter().enumerate() {
        let expected = if index == 5 { 0xFF } else { 0x00 };
        assert_eq!(byte, expected, "byte {index}");
    }
    assert_eq!(bus.sent.last(), Some(frame));
}

#[test]
fn busy_bus_stalls_progress() {
    let completion = Completion::new();
    let mut display = Display::new(MockBus::default(), &completion);
    display.tick().unwrap();
    display.tick().unwrap();
    assert!(completion.is_busy());
    let sent = display.transport().sent.len();
    for _ in 0..50 {
        assert_eq!(display.tick(), Ok(Action::None));
    }
    assert_eq!(display.transport().sent.len(), sent);
}

#[test]
fn failure_in_send_buffer_restarts_init() {
    let completion = Completion::new();
    let mut display = Display::new(MockBus::default(), &completion);
    display.show();
    run_until_busy_in(&mut display, &completion, State::SendBuffer);

    completion.finish(false);
    assert_eq!(display.tick(), Ok(Action::None));
    assert_eq!(display.state(), State::InitCommands);
    assert_eq!(display.machine().init_position(), 0);

    // The failure is consumed: the next tick replays the sequence.
    assert_eq!(display.tick(), Ok(Action::Command(INIT_COMMANDS[0])));
}

#[test]
fn failure_in_each_busy_state_recovers() {
    for target in [State::InitCommands, State::SendBufferCommands, State::SendBuffer] {
        let completion = Completion::new();
        let mut display = Display::new(MockBus::default(), &completion);
        display.show();
        run_until_busy_in(&mut display, &completion, target);

        completion.finish(false);
        display.tick().unwrap();
        assert_eq!(display.state(), State::InitCommands, "from {target:?}");
        assert_eq!(display.machine().init_position(), 0, "from {target:?}");
    }
}

#[test]
fn frame_resent_after_recovery() {
    let completion = Completion::new();
    let mut display = Display::new(MockBus::default(), &completion);
    display.surface().set_pixel(0, 0, 0xAA);
    display.show();
    run_until_busy_in(&mut display, &completion, State::SendBufferCommands);
    completion.finish(false);
    display.tick().unwrap();

    // The frame already moved to transmit; a new show is needed to send
    // it again, exactly like any other update.
    display.surface().set_pixel(0, 0, 0xBB);
    display.show();
    run_until(&mut display, &completion, State::Idle);
    let frames = display.transport().frames();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0][1], 0xBB);
}

#[test]
fn latest_show_wins_during_addressing() {
    let completion = Completion::new();
    let mut display = Display::new(MockBus::default(), &completion);
    display.surface().set_pixel(0, 0, 0x10);
    display.show();
    run_until_busy_in(&mut display, &completion, State::SendBufferCommands);

    for marker in [0x01u8, 0x02, 0x03] {
        let mut surface = display.surface();
        surface.clear();
        surface.set_pixel(1, 2, marker);
        display.show();
    }
    run_until(&mut display, &completion, State::Idle);

    let frames = display.transport().frames();
    assert_eq!(frames.len(), 2, "in-flight frame plus the latest");
    assert_eq!(frames[0][1], 0x10);
    let latest = frames[1];
    assert_eq!(latest[1 + 2 * DISPLAY_WIDTH + 1], 0x03);
    assert_eq!(latest.iter().filter(|&&b| b != 0).count(), 2);
}

#[test]
fn idle_ticks_change_nothing() {
    let completion = Completion::new();
    let mut display = Display::new(MockBus::default(), &completion);
    display.show();
    run_until(&mut display, &completion, State::Idle);

    let roles = display.frames().roles();
    let sent = display.transport().sent.len();
    for _ in 0..100 {
        assert_eq!(display.tick(), Ok(Action::None));
    }
    assert_eq!(display.state(), State::Idle);
    assert_eq!(display.frames().roles(), roles);
    assert_eq!(display.transport().sent.len(), sent);
}

#[test]
fn show_while_idle_sends_frame() {
    let completion = Completion::new();
    let mut display = Display::new(MockBus::default(), &completion);
    run_until(&mut display, &completion, State::Idle);

    display.show();
    assert_eq!(display.tick(), Ok(Action::BeginTransmit));
    assert_eq!(display.state(), State::SendBufferCommands);
    run_until(&mut display, &completion, State::Idle);
    assert_eq!(display.transport().frames().len(), 1);
}

#[test]
fn power_off_cycle_holds_frames_until_reset() {
    let completion = Completion::new();
    let mut display = Display::new(MockBus::default(), &completion);
    run_until(&mut display, &completion, State::Idle);

    display.power_off();
    assert_eq!(display.tick(), Ok(Action::Command(DISPLAY_OFF)));
    assert_eq!(display.state(), State::Off);

    display.surface().set_pixel(9, 1, 0x42);
    display.show();
    for _ in 0..20 {
        if completion.is_busy() {
            completion.finish(true);
        }
        display.tick().unwrap();
        assert!(matches!(display.state(), State::Off | State::OffRequested));
    }
    assert!(display.transport().frames().is_empty());
    assert!(display.frames().transmit_requested());

    display.reset();
    assert_eq!(display.state(), State::Uninitialized);
    run_until(&mut display, &completion, State::Idle);
    let frames = display.transport().frames();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0][1 + DISPLAY_WIDTH + 9], 0x42);
    assert_eq!(display.transport().inits.len(), 2);
}

#[test]
fn reset_waits_for_outstanding_off_command() {
    let completion = Completion::new();
    let mut display = Display::new(MockBus::default(), &completion);
    run_until(&mut display, &completion, State::Idle);

    display.power_off();
    assert_eq!(display.tick(), Ok(Action::Command(DISPLAY_OFF)));
    assert!(completion.is_busy());

    display.reset();
    let sent = display.transport().sent.len();
    for _ in 0..5 {
        assert_eq!(display.tick(), Ok(Action::None));
    }
    assert_eq!(display.state(), State::Uninitialized);
    assert_eq!(display.transport().sent.len(), sent);
    assert!(completion.is_busy());

    completion.finish(true);
    assert_eq!(display.tick(), Ok(Action::InitBus));
    assert_eq!(display.tick(), Ok(Action::Command(INIT_COMMANDS[0])));

    // From here on each submit waits for the previous completion.
    for _ in 0..INIT_COMMANDS.len() * 2 {
        let before = display.transport().sent.len();
        display.tick().unwrap();
        assert_eq!(display.transport().sent.len(), before);
        completion.finish(true);
        display.tick().unwrap();
        if display.state() == State::Idle {
            break;
        }
    }
    assert_eq!(display.state(), State::Idle);
    let commands = display.transport().commands();
    assert_eq!(&commands[commands.len() - INIT_COMMANDS.len()..], INIT_COMMANDS);
}

#[test]
fn power_off_ignored_while_init_fault_latched() {
    let completion = Completion::new();
    let bus = MockBus {
        fail_init: true,
        ..MockBus::default()
    };
    let mut display = Display::new(bus, &completion);
    assert!(display.tick().is_err());

    display.power_off();
    for _ in 0..10 {
        assert_eq!(display.tick(), Ok(Action::None));
    }
    assert_eq!(display.state(), State::Uninitialized);
    assert!(display.transport().sent.is_empty());
}

#[test]
fn init_failure_latches() {
    let completion = Completion::new();
    let bus = MockBus {
        fail_init: true,
        ..MockBus::default()
    };
    let mut display = Display::new(bus, &completion);
    display.show();

    assert_eq!(display.tick(), Err(Error::DisplayInit(TransportError::Bus)));
    for _ in 0..10 {
        assert_eq!(display.tick(), Ok(Action::None));
    }
    assert_eq!(display.state(), State::Uninitialized);
    assert_eq!(display.transport().inits.len(), 1);

    display.transport_mut().fail_init = false;
    display.reset();
    run_until(&mut display, &completion, State::Idle);
    assert_eq!(display.transport().frames().len(), 1);
}

#[test]
fn rejected_submit_counts_as_failure() {
    let completion = Completion::new();
    let mut display = Display::new(MockBus::default(), &completion);
    display.tick().unwrap();
    display.tick().unwrap();
    completion.finish(true);

    display.transport_mut().reject_submit = true;
    assert_eq!(
        display.tick(),
        Err(Error::DisplaySubmit(TransportError::Busy))
    );
    assert!(!completion.is_busy());

    display.transport_mut().reject_submit = false;
    assert_eq!(display.tick(), Ok(Action::None));
    assert_eq!(display.state(), State::InitCommands);
    assert_eq!(display.machine().init_position(), 0);
}
