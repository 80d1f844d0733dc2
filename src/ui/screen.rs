//! Screen layout.
//!
//! ```text
//!   row 0   *              87%     status bar, underlined
//!   row 2       01:23.45           elapsed time
//!   row 4        LAP 3             lap label   } inverted while a lap
//!   row 5       00:12.34           lap time    } is being browsed
//! ```

use core::fmt::Write;

use heapless::String;

use super::gui::Gui;
use crate::ble::BleStatus;
use crate::config::{DISPLAY_WIDTH, GUI_BLINK_MS};
use crate::display::{string_width, Surface};
use crate::stopwatch::{Status, Stopwatch};

const STATUS_ROW: usize = 0;
const ELAPSED_ROW: usize = 2;
const LAP_LABEL_ROW: usize = 4;
const LAP_TIME_ROW: usize = 5;

/// Bottom pixel of a row, used for the status bar underline.
const UNDERLINE: u8 = 0x80;

/// Redraw the whole screen into `surface`.
pub fn render(surface: &mut Surface<'_>, gui: &Gui, watch: &Stopwatch, now_ms: u32) {
    surface.clear();
    draw_status_bar(surface, gui, now_ms);
    draw_elapsed(surface, watch.elapsed(now_ms));
    draw_lap(surface, gui, watch, now_ms);
}

/// `MM:SS.cc`, or `H:MM:SS` from 100 minutes on.
pub fn format_time(ms: u32) -> String<12> {
    let mut text = String::new();
    let minutes = ms / 60_000;
    let seconds = ms / 1_000 % 60;
    // Capacity covers the longest possible value.
    let _ = if minutes < 100 {
        write!(text, "{:02}:{:02}.{:02}", minutes, seconds, ms / 10 % 100)
    } else {
        write!(text, "{}:{:02}:{:02}", minutes / 60, minutes % 60, seconds)
    };
    text
}

fn draw_status_bar(surface: &mut Surface<'_>, gui: &Gui, now_ms: u32) {
    let blink_on = (now_ms / GUI_BLINK_MS) % 2 == 0;
    match gui.ble_status() {
        BleStatus::Connected => {
            surface.print_char(0, STATUS_ROW, '*');
        }
        BleStatus::Advertising if blink_on => {
            surface.print_char(0, STATUS_ROW, '*');
        }
        _ => {}
    }

    let battery = gui.battery();
    let mut text: String<4> = String::new();
    let _ = write!(text, "{}%", battery.percent);
    let start = DISPLAY_WIDTH.saturating_sub(string_width(&text));
    let end = surface.print_string(start, STATUS_ROW, &text);
    if battery.charging {
        for col in start..end {
            surface.invert_pixel(col, STATUS_ROW);
        }
    }

    for col in 0..DISPLAY_WIDTH {
        surface.or_pixel(col, STATUS_ROW, UNDERLINE);
    }
}

fn draw_elapsed(surface: &mut Surface<'_>, elapsed_ms: u32) {
    let text = format_time(elapsed_ms);
    let (start, end) = print_centered(surface, ELAPSED_ROW, &text);
    // Centre the 5-pixel glyphs vertically in the row.
    for col in start..end {
        surface.shift_left(col, ELAPSED_ROW, 1);
    }
}

fn draw_lap(surface: &mut Surface<'_>, gui: &Gui, watch: &Stopwatch, now_ms: u32) {
    let (number, time) = match gui.selected_lap() {
        Some(index) => (index + 1, watch.lap_time(index)),
        None if watch.status() == Status::Reset => return,
        None => (watch.laps().len() + 1, watch.current_lap(now_ms)),
    };

    let mut label: String<8> = String::new();
    let _ = write!(label, "LAP {}", number);
    print_centered(surface, LAP_LABEL_ROW, &label);
    print_centered(surface, LAP_TIME_ROW, &format_time(time));

    if gui.selected_lap().is_some() {
        for col in 0..DISPLAY_WIDTH {
            surface.invert_pixel(col, LAP_LABEL_ROW);
            surface.invert_pixel(col, LAP_TIME_ROW);
        }
    }
}

fn print_centered(surface: &mut Surface<'_>, row: usize, text: &str) -> (usize, usize) {
    let start = DISPLAY_WIDTH.saturating_sub(string_width(text)) / 2;
    let end = surface.print_string(start, row, text);
    (start, end)
}
