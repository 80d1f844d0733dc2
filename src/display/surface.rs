//! Drawing primitives over the working frame.
//!
//! Coordinates are (column, row) where a row is one 8-pixel page and each
//! byte holds a vertical strip with bit 0 at the top. Writes outside the
//! panel are ignored.

use super::font;
use crate::config::{DISPLAY_ROWS, DISPLAY_WIDTH};

/// Mutable view of the working buffer handed out by
/// [`Display::surface`](super::Display::surface).
pub struct Surface<'a> {
    frame: &'a mut [u8],
}

impl<'a> Surface<'a> {
    pub(crate) fn new(frame: &'a mut [u8]) -> Self {
        Self { frame }
    }

    pub fn clear(&mut self) {
        self.frame.fill(0);
    }

    pub fn set_pixel(&mut self, col: usize, row: usize, byte: u8) {
        if let Some(cell) = self.cell(col, row) {
            *cell = byte;
        }
    }

    pub fn or_pixel(&mut self, col: usize, row: usize, byte: u8) {
        if let Some(cell) = self.cell(col, row) {
            *cell |= byte;
        }
    }

    pub fn invert_pixel(&mut self, col: usize, row: usize) {
        if let Some(cell) = self.cell(col, row) {
            *cell = !*cell;
        }
    }

    /// Shift the strip towards bit 7 (down the panel). Shifting by 8 or
    /// more clears it.
    pub fn shift_left(&mut self, col: usize, row: usize, n: u32) {
        if let Some(cell) = self.cell(col, row) {
            *cell = cell.checked_shl(n).unwrap_or(0);
        }
    }

    /// Shift the strip towards bit 0 (up the panel).
    pub fn shift_right(&mut self, col: usize, row: usize, n: u32) {
        if let Some(cell) = self.cell(col, row) {
            *cell = cell.checked_shr(n).unwrap_or(0);
        }
    }

    /// Draw `ch` with its left edge at `col` and return the column after
    /// it. Unsupported characters draw nothing and return `col`.
    pub fn print_char(&mut self, col: usize, row: usize, ch: char) -> usize {
        let Some(columns) = font::glyph(ch) else {
            return col;
        };
        for (offset, &bits) in columns.iter().enumerate() {
            self.set_pixel(col + offset, row, bits);
        }
        self.set_pixel(col + columns.len(), row, 0);
        col + columns.len() + 1
    }

    pub fn print_string(&mut self, col: usize, row: usize, text: &str) -> usize {
        text.chars().fold(col, |col, ch| self.print_char(col, row, ch))
    }

    fn cell(&mut self, col: usize, row: usize) -> Option<&mut u8> {
        if col >= DISPLAY_WIDTH || row >= DISPLAY_ROWS {
            return None;
        }
        self.frame.get_mut(row * DISPLAY_WIDTH + col)
    }
}

/// Columns `print_char` would advance for `ch`.
pub fn char_width(ch: char) -> usize {
    font::glyph(ch).map_or(0, |columns| columns.len() + 1)
}

/// Columns `print_string` would advance for `text`.
pub fn string_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::frame::FRAME_SIZE;

    fn blank() -> [u8; FRAME_SIZE] {
        [0; FRAME_SIZE]
    }

    #[test]
    fn set_or_invert() {
        let mut frame = blank();
        let mut surface = Surface::new(&mut frame);
        surface.set_pixel(3, 1, 0x0F);
        surface.or_pixel(3, 1, 0x30);
        surface.invert_pixel(4, 1);
        assert_eq!(frame[DISPLAY_WIDTH + 3], 0x3F);
        assert_eq!(frame[DISPLAY_WIDTH + 4], 0xFF);
    }

    #[test]
    fn out_of_range_writes_are_ignored() {
        let mut frame = blank();
        let mut surface = Surface::new(&mut frame);
        surface.set_pixel(DISPLAY_WIDTH, 0, 0xFF);
        surface.or_pixel(0, DISPLAY_ROWS, 0xFF);
        surface.invert_pixel(usize::MAX, usize::MAX);
        surface.shift_left(DISPLAY_WIDTH + 10, 2, 1);
        assert_eq!(surface.print_string(DISPLAY_WIDTH - 2, 5, "88"), DISPLAY_WIDTH + 8);
        assert!(frame[..FRAME_SIZE - 2].iter().all(|&b| b == 0));
    }

    #[test]
    fn shifts() {
        let mut frame = blank();
        let mut surface = Surface::new(&mut frame);
        surface.set_pixel(0, 0, 0b0001_1111);
        surface.shift_left(0, 0, 2);
        surface.set_pixel(1, 0, 0b1100_0000);
        surface.shift_right(1, 0, 6);
        surface.set_pixel(2, 0, 0xFF);
        surface.shift_left(2, 0, 8);
        surface.set_pixel(3, 0, 0xFF);
        surface.shift_right(3, 0, 40);
        assert_eq!(&frame[..4], &[0b0111_1100, 0b0000_0011, 0, 0]);
    }

    #[test]
    fn print_char_writes_glyph_and_gap() {
        let mut frame = blank();
        frame[4] = 0xFF;
        let mut surface = Surface::new(&mut frame);
        assert_eq!(surface.print_char(0, 0, '0'), 5);
        assert_eq!(&frame[..5], &[0x0e, 0x11, 0x11, 0x0e, 0x00]);
    }

    #[test]
    fn unknown_char_has_zero_width() {
        let mut frame = blank();
        let mut surface = Surface::new(&mut frame);
        assert_eq!(surface.print_char(7, 0, '#'), 7);
        assert_eq!(char_width('#'), 0);
        assert!(frame.iter().all(|&b| b == 0));
    }

    #[test]
    fn char_widths() {
        assert_eq!(char_width('1'), 4);
        assert_eq!(char_width('I'), 2);
        assert_eq!(char_width('M'), 6);
        assert_eq!(char_width(':'), 2);
        assert_eq!(char_width('.'), 2);
        assert_eq!(char_width(' '), 2);
        assert_eq!(char_width('*'), 6);
        assert_eq!(char_width('%'), 6);
        assert_eq!(char_width('a'), char_width('A'));
        assert_eq!(string_width("LAP"), 14);
    }

    #[test]
    fn string_width_matches_print_string() {
        let samples = [
            "", "0123456789", "ABCDEFGHIJKLMNOPQRSTUVWXYZ", "lap 12", "12:34.56", "*99%", "  ",
        ];
        for text in samples {
            let mut frame = blank();
            let mut surface = Surface::new(&mut frame);
            assert_eq!(surface.print_string(0, 0, text), string_width(text), "{text:?}");
        }
    }
}
