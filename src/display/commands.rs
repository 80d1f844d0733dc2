//! Controller command tables and the cursor that walks them.
//!
//! Every command byte is sent in its own transaction, preceded by the
//! command control byte. Frame data goes out as one transaction led by
//! the data control byte.

/// Control byte announcing a single command byte.
pub const COMMAND_PREFIX: u8 = 0x00;

/// Control byte announcing a run of display RAM data.
pub const DATA_PREFIX: u8 = 0x40;

/// Panel off (sleep).
pub const DISPLAY_OFF: u8 = 0xAE;

/// Issued once each time the bus is (re)acquired.
#[rustfmt::skip]
pub const INIT_COMMANDS: &[u8] = &[
    DISPLAY_OFF,
    0xD5, 0x80, // clock divide ratio / oscillator frequency
    0xA8, 47,   // multiplex ratio: 48 lines
    0xD3, 0x00, // display offset
    0x40,       // start line 0
    0x8D, 0x14, // charge pump on
    0x20, 0x00, // horizontal addressing mode
    0xA1,       // segment remap
    0xC8,       // COM scan direction: remapped
    0xDA, 0x12, // COM pins: alternative configuration
    0x81, 0xFF, // contrast
    0xD9, 0x22, // pre-charge period
    0xDB, 0x40, // VCOMH deselect level
    0xA4,       // resume to RAM content
    0xA6,       // normal (non-inverted) display
    0xAF,       // panel on
];

/// Issued before every frame transfer. The 64-column panel sits in the
/// middle of the controller's 128-column RAM.
#[rustfmt::skip]
pub const ADDRESSING_COMMANDS: &[u8] = &[
    0x22, 0, 6,   // page range
    0x21, 32, 95, // column range
];

/// Position within one of the immutable command tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    table: &'static [u8],
    position: usize,
}

impl Cursor {
    pub const fn new(table: &'static [u8]) -> Self {
        Self { table, position: 0 }
    }

    /// Return the next command and move past it.
    pub fn advance(&mut self) -> Option<u8> {
        let byte = self.table.get(self.position).copied()?;
        self.position += 1;
        Some(byte)
    }

    pub fn rewind(&mut self) {
        self.position = 0;
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_walks_table_then_stops() {
        let mut cursor = Cursor::new(ADDRESSING_COMMANDS);
        let mut seen = heapless::Vec::<u8, 8>::new();
        while let Some(byte) = cursor.advance() {
            seen.push(byte).unwrap();
        }
        assert_eq!(&seen[..], ADDRESSING_COMMANDS);
        assert_eq!(cursor.position(), ADDRESSING_COMMANDS.len());
        assert_eq!(cursor.advance(), None);
        assert_eq!(cursor.position(), ADDRESSING_COMMANDS.len());
    }

    #[test]
    fn rewind_restarts_sequence() {
        let mut cursor = Cursor::new(INIT_COMMANDS);
        cursor.advance();
        cursor.advance();
        cursor.rewind();
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.advance(), Some(DISPLAY_OFF));
    }

    #[test]
    fn init_sequence_ends_with_panel_on() {
        assert_eq!(INIT_COMMANDS.len(), 25);
        assert_eq!(INIT_COMMANDS.first(), Some(&DISPLAY_OFF));
        assert_eq!(INIT_COMMANDS.last(), Some(&0xAF));
    }
}
