//! User interface subsystem - OLED screen + physical buttons.
//!
//! The GUI task reacts to button presses, applies them to the stopwatch
//! and redraws the screen through the display driver.
//!
//! ## Components
//!
//! - **Screen**: 64×48 OLED, rendered by [`screen::render`]
//! - **Buttons**: 3 tactile switches with debouncing (RIGHT, LEFT, MIDDLE)

pub mod debounce;
pub mod gui;
pub mod screen;

#[cfg(feature = "embedded")]
pub mod buttons;
#[cfg(feature = "embedded")]
pub mod task;

/// Physical buttons.
///
///   - RIGHT:  start / stop
///   - MIDDLE: lap while running, reset while stopped
///   - LEFT:   browse recorded laps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Right,
    Left,
    Middle,
}

/// A debounced press, stamped with the time of its first edge (ms).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonPress {
    pub button: Button,
    pub at_ms: u32,
}
