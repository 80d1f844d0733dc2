//! Column bitmaps for the 5-pixel-high display font.
//!
//! Each byte is one column, bit 0 at the top. Glyphs are variable width
//! (1 to 5 columns); rendering appends one blank column.

#[rustfmt::skip]
const GLYPHS: [u8; 141] = [
    0x0e, 0x11, 0x11, 0x0e, 0x12, 0x1f, 0x10, 0x12, 0x19, 0x15, 0x12, 0x11, 0x15, 0x15, 0x0a, 0x0c,
    0x0a, 0x09, 0x1f, 0x17, 0x15, 0x15, 0x0d, 0x0e, 0x15, 0x15, 0x08, 0x01, 0x01, 0x1d, 0x03, 0x0a,
    0x15, 0x15, 0x0a, 0x02, 0x15, 0x15, 0x0e, 0x1e, 0x05, 0x05, 0x1e, 0x1f, 0x15, 0x15, 0x0a, 0x0e,
    0x11, 0x11, 0x11, 0x1f, 0x11, 0x11, 0x0e, 0x1f, 0x15, 0x15, 0x1f, 0x05, 0x05, 0x0e, 0x11, 0x15,
    0x1d, 0x1f, 0x04, 0x04, 0x1f, 0x1f, 0x08, 0x10, 0x10, 0x0f, 0x1f, 0x04, 0x0a, 0x11, 0x1f, 0x10,
    0x10, 0x1f, 0x02, 0x04, 0x02, 0x1f, 0x1f, 0x02, 0x04, 0x1f, 0x0e, 0x11, 0x11, 0x0e, 0x1f, 0x05,
    0x05, 0x02, 0x0e, 0x11, 0x09, 0x16, 0x1f, 0x05, 0x0d, 0x12, 0x12, 0x15, 0x15, 0x09, 0x01, 0x01,
    0x1f, 0x01, 0x01, 0x0f, 0x10, 0x10, 0x0f, 0x03, 0x0c, 0x10, 0x0c, 0x03, 0x07, 0x18, 0x07, 0x18,
    0x07, 0x1b, 0x04, 0x04, 0x1b, 0x17, 0x14, 0x14, 0x0f, 0x19, 0x15, 0x15, 0x13,
];

/// Start offset into `GLYPHS` for every character from `'0'` to `'Z'`,
/// followed by the end offset. The punctuation between `'9'` and `'A'`
/// maps to empty ranges.
#[rustfmt::skip]
const OFFSETS: [u8; 44] = [
    0x00, 0x04, 0x07, 0x0b, 0x0f, 0x13, 0x17, 0x1b, 0x1f, 0x23, 0x27, 0x27, 0x27, 0x27, 0x27, 0x27,
    0x27, 0x27, 0x2b, 0x2f, 0x33, 0x37, 0x3a, 0x3d, 0x41, 0x45, 0x46, 0x4a, 0x4e, 0x51, 0x56, 0x5a,
    0x5e, 0x62, 0x66, 0x6a, 0x6e, 0x73, 0x77, 0x7c, 0x81, 0x85, 0x89, 0x8d,
];

const COLON: &[u8] = &[0x0a];
const PERIOD: &[u8] = &[0x10];
const STAR: &[u8] = &[0x02, 0x04, 0x08, 0x04, 0x02];
const SPACE: &[u8] = &[0x00];
const PERCENT: &[u8] = &[0x13, 0x0b, 0x04, 0x1a, 0x19];

/// Column bitmap for `ch`, without the trailing blank column.
/// Lowercase letters fold to uppercase. `None` for unsupported characters.
pub fn glyph(ch: char) -> Option<&'static [u8]> {
    match ch.to_ascii_uppercase() {
        c @ ('0'..='9' | 'A'..='Z') => {
            let index = c as usize - '0' as usize;
            let start = usize::from(OFFSETS[index]);
            let end = usize::from(OFFSETS[index + 1]);
            GLYPHS.get(start..end)
        }
        ':' => Some(COLON),
        '.' => Some(PERIOD),
        '*' => Some(STAR),
        ' ' => Some(SPACE),
        '%' => Some(PERCENT),
        _ => None,
    }
}
