/// 8x8 glyphs for the printable ASCII range, `' '` (32) through `'~'` (126).
///
/// each glyph is eight columns in display byte order: bit 0 is the top pixel of the page. set bits
/// are lit pixels, so glyphs have to be inverted before they are written into an active-low layer.
const GLYPHS: [[u8; 8]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x00, 0x5F, 0x5F, 0x00, 0x00, 0x00], // '!'
    [0x00, 0x03, 0x07, 0x00, 0x03, 0x07, 0x00, 0x00], // '"'
    [0x14, 0x7F, 0x7F, 0x14, 0x7F, 0x7F, 0x14, 0x00], // '#'
    [0x24, 0x2E, 0x2A, 0x6B, 0x6B, 0x3A, 0x12, 0x00], // '$'
    [0x46, 0x66, 0x30, 0x18, 0x0C, 0x66, 0x62, 0x00], // '%'
    [0x30, 0x7A, 0x4F, 0x5D, 0x37, 0x7A, 0x48, 0x00], // '&'
    [0x00, 0x00, 0x04, 0x07, 0x03, 0x00, 0x00, 0x00], // "'"
    [0x00, 0x00, 0x1C, 0x3E, 0x63, 0x41, 0x00, 0x00], // '('
    [0x00, 0x00, 0x41, 0x63, 0x3E, 0x1C, 0x00, 0x00], // ')'
    [0x08, 0x2A, 0x3E, 0x1C, 0x1C, 0x3E, 0x2A, 0x08], // '*'
    [0x00, 0x08, 0x08, 0x3E, 0x3E, 0x08, 0x08, 0x00], // '+'
    [0x00, 0x00, 0x80, 0xE0, 0x60, 0x00, 0x00, 0x00], // ','
    [0x00, 0x08, 0x08, 0x08, 0x08, 0x08, 0x08, 0x00], // '-'
    [0x00, 0x00, 0x00, 0x60, 0x60, 0x00, 0x00, 0x00], // '.'
    [0x60, 0x30, 0x18, 0x0C, 0x06, 0x03, 0x01, 0x00], // '/'
    [0x3E, 0x7F, 0x59, 0x4D, 0x47, 0x7F, 0x3E, 0x00], // '0'
    [0x00, 0x40, 0x42, 0x7F, 0x7F, 0x40, 0x40, 0x00], // '1'
    [0x72, 0x7B, 0x49, 0x49, 0x49, 0x4F, 0x46, 0x00], // '2'
    [0x41, 0x41, 0x49, 0x49, 0x49, 0x7F, 0x36, 0x00], // '3'
    [0x1E, 0x1E, 0x10, 0x10, 0x7F, 0x7F, 0x10, 0x00], // '4'
    [0x27, 0x67, 0x45, 0x45, 0x45, 0x7D, 0x39, 0x00], // '5'
    [0x3E, 0x7F, 0x49, 0x49, 0x49, 0x79, 0x30, 0x00], // '6'
    [0x01, 0x01, 0x01, 0x71, 0x79, 0x0F, 0x07, 0x00], // '7'
    [0x36, 0x7F, 0x49, 0x49, 0x49, 0x7F, 0x36, 0x00], // '8'
    [0x06, 0x4F, 0x49, 0x49, 0x49, 0x7F, 0x3E, 0x00], // '9'
    [0x00, 0x00, 0x00, 0x66, 0x66, 0x00, 0x00, 0x00], // ':'
    [0x00, 0x00, 0x80, 0xE6, 0x66, 0x00, 0x00, 0x00], // ';'
    [0x00, 0x08, 0x1C, 0x36, 0x63, 0x41, 0x00, 0x00], // '<'
    [0x00, 0x14, 0x14, 0x14, 0x14, 0x14, 0x14, 0x00], // '='
    [0x00, 0x00, 0x41, 0x63, 0x36, 0x1C, 0x08, 0x00], // '>'
    [0x00, 0x02, 0x03, 0x59, 0x5D, 0x07, 0x02, 0x00], // '?'
    [0x3E, 0x7F, 0x41, 0x5D, 0x5D, 0x5F, 0x5E, 0x00], // '@'
    [0x7C, 0x7E, 0x13, 0x11, 0x13, 0x7E, 0x7C, 0x00], // 'A'
    [0x7F, 0x7F, 0x49, 0x49, 0x49, 0x7F, 0x36, 0x00], // 'B'
    [0x3E, 0x7F, 0x41, 0x41, 0x41, 0x63, 0x22, 0x00], // 'C'
    [0x7F, 0x7F, 0x41, 0x41, 0x63, 0x3E, 0x1C, 0x00], // 'D'
    [0x7F, 0x7F, 0x49, 0x49, 0x49, 0x41, 0x41, 0x00], // 'E'
    [0x7F, 0x7F, 0x09, 0x09, 0x09, 0x01, 0x01, 0x00], // 'F'
    [0x3E, 0x7F, 0x41, 0x41, 0x49, 0x7B, 0x3A, 0x00], // 'G'
    [0x7F, 0x7F, 0x08, 0x08, 0x08, 0x7F, 0x7F, 0x00], // 'H'
    [0x00, 0x41, 0x41, 0x7F, 0x7F, 0x41, 0x41, 0x00], // 'I'
    [0x30, 0x70, 0x40, 0x40, 0x40, 0x7F, 0x3F, 0x00], // 'J'
    [0x7F, 0x7F, 0x08, 0x1C, 0x36, 0x63, 0x41, 0x00], // 'K'
    [0x7F, 0x7F, 0x40, 0x40, 0x40, 0x40, 0x40, 0x00], // 'L'
    [0x7F, 0x7F, 0x06, 0x0C, 0x06, 0x7F, 0x7F, 0x00], // 'M'
    [0x7F, 0x7F, 0x06, 0x0C, 0x18, 0x7F, 0x7F, 0x00], // 'N'
    [0x3E, 0x7F, 0x41, 0x41, 0x41, 0x7F, 0x3E, 0x00], // 'O'
    [0x7F, 0x7F, 0x09, 0x09, 0x09, 0x0F, 0x06, 0x00], // 'P'
    [0x3E, 0x7F, 0x41, 0x71, 0x61, 0xFF, 0xBE, 0x00], // 'Q'
    [0x7F, 0x7F, 0x09, 0x19, 0x39, 0x6F, 0x46, 0x00], // 'R'
    [0x26, 0x6F, 0x49, 0x49, 0x49, 0x7B, 0x32, 0x00], // 'S'
    [0x00, 0x01, 0x01, 0x7F, 0x7F, 0x01, 0x01, 0x00], // 'T'
    [0x3F, 0x7F, 0x40, 0x40, 0x40, 0x7F, 0x3F, 0x00], // 'U'
    [0x0F, 0x1F, 0x30, 0x60, 0x30, 0x1F, 0x0F, 0x00], // 'V'
    [0x7F, 0x7F, 0x30, 0x18, 0x30, 0x7F, 0x7F, 0x00], // 'W'
    [0x63, 0x77, 0x1C, 0x08, 0x1C, 0x77, 0x63, 0x00], // 'X'
    [0x00, 0x07, 0x0F, 0x78, 0x78, 0x0F, 0x07, 0x00], // 'Y'
    [0x41, 0x61, 0x71, 0x59, 0x4D, 0x47, 0x43, 0x00], // 'Z'
    [0x00, 0x00, 0x7F, 0x7F, 0x41, 0x41, 0x00, 0x00], // '['
    [0x01, 0x03, 0x06, 0x0C, 0x18, 0x30, 0x60, 0x00], // '\\'
    [0x00, 0x00, 0x41, 0x41, 0x7F, 0x7F, 0x00, 0x00], // ']'
    [0x08, 0x0C, 0x06, 0x03, 0x06, 0x0C, 0x08, 0x00], // '^'
    [0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x00], // '_'
    [0x00, 0x00, 0x00, 0x03, 0x07, 0x04, 0x00, 0x00], // '`'
    [0x20, 0x74, 0x54, 0x54, 0x54, 0x7C, 0x78, 0x00], // 'a'
    [0x7F, 0x7F, 0x44, 0x44, 0x44, 0x7C, 0x38, 0x00], // 'b'
    [0x38, 0x7C, 0x44, 0x44, 0x44, 0x6C, 0x28, 0x00], // 'c'
    [0x38, 0x7C, 0x44, 0x44, 0x44, 0x7F, 0x7F, 0x00], // 'd'
    [0x38, 0x7C, 0x54, 0x54, 0x54, 0x5C, 0x18, 0x00], // 'e'
    [0x00, 0x08, 0x7E, 0x7F, 0x09, 0x09, 0x00, 0x00], // 'f'
    [0x18, 0xBC, 0xA4, 0xA4, 0xA4, 0xFC, 0x7C, 0x00], // 'g'
    [0x7F, 0x7F, 0x04, 0x04, 0x04, 0x7C, 0x78, 0x00], // 'h'
    [0x00, 0x00, 0x44, 0x7D, 0x7D, 0x40, 0x00, 0x00], // 'i'
    [0x00, 0x80, 0x84, 0xFD, 0x7D, 0x00, 0x00, 0x00], // 'j'
    [0x7F, 0x7F, 0x10, 0x10, 0x38, 0x6C, 0x44, 0x00], // 'k'
    [0x00, 0x00, 0x41, 0x7F, 0x7F, 0x40, 0x00, 0x00], // 'l'
    [0x7C, 0x7C, 0x0C, 0x18, 0x0C, 0x7C, 0x78, 0x00], // 'm'
    [0x7C, 0x7C, 0x04, 0x04, 0x04, 0x7C, 0x78, 0x00], // 'n'
    [0x38, 0x7C, 0x44, 0x44, 0x44, 0x7C, 0x38, 0x00], // 'o'
    [0xFC, 0xFC, 0x24, 0x24, 0x24, 0x3C, 0x18, 0x00], // 'p'
    [0x18, 0x3C, 0x24, 0x24, 0x24, 0xFC, 0xFC, 0x00], // 'q'
    [0x7C, 0x7C, 0x08, 0x04, 0x04, 0x0C, 0x08, 0x00], // 'r'
    [0x48, 0x5C, 0x54, 0x54, 0x54, 0x74, 0x24, 0x00], // 's'
    [0x00, 0x04, 0x3F, 0x7F, 0x44, 0x44, 0x00, 0x00], // 't'
    [0x3C, 0x7C, 0x40, 0x40, 0x40, 0x7C, 0x7C, 0x00], // 'u'
    [0x1C, 0x3C, 0x60, 0x40, 0x60, 0x3C, 0x1C, 0x00], // 'v'
    [0x3C, 0x7C, 0x60, 0x30, 0x60, 0x7C, 0x3C, 0x00], // 'w'
    [0x44, 0x6C, 0x38, 0x10, 0x38, 0x6C, 0x44, 0x00], // 'x'
    [0x1C, 0xBC, 0xA0, 0xA0, 0xA0, 0xFC, 0x7C, 0x00], // 'y'
    [0x44, 0x64, 0x74, 0x54, 0x5C, 0x4C, 0x44, 0x00], // 'z'
    [0x00, 0x08, 0x08, 0x3E, 0x77, 0x41, 0x41, 0x00], // '{'
    [0x00, 0x00, 0x00, 0x7F, 0x7F, 0x00, 0x00, 0x00], // '|'
    [0x00, 0x41, 0x41, 0x77, 0x3E, 0x08, 0x08, 0x00], // '}'
    [0x02, 0x01, 0x01, 0x03, 0x02, 0x02, 0x01, 0x00], // '~'
];

const FIRST_GLYPH: u8 = b' ';
const LAST_GLYPH: u8 = b'~';

/// looks up the glyph for an ASCII character.
/// characters outside the printable range render as a blank cell.
pub fn glyph(c: u8) -> &'static [u8; 8] {
    match c {
        FIRST_GLYPH..=LAST_GLYPH => &GLYPHS[(c - FIRST_GLYPH) as usize],
        _ => &GLYPHS[0],
    }
}
