//! 5x7 bitmap font for titles, tick values and body labels.
//!
//! Each glyph is seven rows of five bits, most significant bit on the left.

pub const GLYPH_WIDTH: u32 = 5;
pub const GLYPH_HEIGHT: u32 = 7;
/// Horizontal distance between glyph origins, in unscaled pixels.
pub const GLYPH_ADVANCE: u32 = GLYPH_WIDTH + 1;

pub type Glyph = [u8; GLYPH_HEIGHT as usize];

const BLANK: Glyph = [0; 7];

pub fn glyph(c: char) -> &'static Glyph {
    match c {
        '0' => &[0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => &[0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => &[0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => &[0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => &[0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => &[0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => &[0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => &[0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => &[0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => &[0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '.' => &[0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        '-' => &[0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '+' => &[0x00, 0x04, 0x04, 0x1F, 0x04, 0x04, 0x00],
        ':' => &[0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        '=' => &[0x00, 0x00, 0x1F, 0x00, 0x1F, 0x00, 0x00],
        'T' => &[0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'e' => &[0x00, 0x00, 0x0E, 0x11, 0x1F, 0x10, 0x0E],
        'i' => &[0x04, 0x00, 0x0C, 0x04, 0x04, 0x04, 0x0E],
        'm' => &[0x00, 0x00, 0x1A, 0x15, 0x15, 0x11, 0x11],
        'p' => &[0x00, 0x00, 0x1E, 0x11, 0x1E, 0x10, 0x10],
        's' => &[0x00, 0x00, 0x0E, 0x10, 0x0E, 0x01, 0x1E],
        't' => &[0x08, 0x08, 0x1C, 0x08, 0x08, 0x09, 0x06],
        'x' => &[0x00, 0x00, 0x11, 0x0A, 0x04, 0x0A, 0x11],
        'y' => &[0x00, 0x00, 0x11, 0x11, 0x0F, 0x01, 0x0E],
        'z' => &[0x00, 0x00, 0x1F, 0x02, 0x04, 0x08, 0x1F],
        _ => &BLANK,
    }
}

/// Whether the pixel at (`col`, `row`) of the glyph is set.
pub fn is_set(glyph: &Glyph, col: u32, row: u32) -> bool {
    col < GLYPH_WIDTH && row < GLYPH_HEIGHT && glyph[row as usize] & (0x10 >> col) != 0
}

/// Rendered width of `text` in pixels at the given scale.
pub fn text_width(text: &str, scale: u32) -> u32 {
    let chars = text.chars().count() as u32;
    if chars == 0 {
        0
    } else {
        (chars * GLYPH_ADVANCE - 1) * scale
    }
}
