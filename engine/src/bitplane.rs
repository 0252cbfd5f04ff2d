//! packed monochrome layout shared by every layer and by the display.
//!
//! the display is split into horizontal pages of 8 rows. each byte holds one column of a page,
//! with bit 0 as the top row. bytes run left to right within a page and pages run top to bottom.
//! a set bit is a dark pixel and a cleared bit is a lit one, so independent layers can be merged
//! with a bitwise AND.

pub const DISPLAY_WIDTH: usize = 128;
pub const DISPLAY_HEIGHT: usize = 32;
pub const PAGE_HEIGHT: usize = 8;
pub const PAGE_COUNT: usize = DISPLAY_HEIGHT / PAGE_HEIGHT;
pub const BUFFER_LEN: usize = DISPLAY_WIDTH * PAGE_COUNT;

/// byte value of a column with all 8 pixels dark.
pub const ALL_OFF: u8 = u8::MAX;

const _CHECKS: () = {
    assert!(
        DISPLAY_HEIGHT % PAGE_HEIGHT == 0,
        "display height must be a whole number of pages"
    );
    assert!(BUFFER_LEN == 512);
};

/// location of a single pixel inside a [`PageBuffer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelAddr {
    pub page: usize,
    pub column: usize,
    pub bit: u8,
}

impl PixelAddr {
    pub fn new(x: usize, y: usize) -> Self {
        let page = y / PAGE_HEIGHT;
        Self {
            page,
            column: x,
            bit: (y - page * PAGE_HEIGHT) as u8,
        }
    }

    pub fn index(self) -> usize {
        self.page * DISPLAY_WIDTH + self.column
    }

    pub fn mask(self) -> u8 {
        1 << self.bit
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct PageBuffer {
    bytes: [u8; BUFFER_LEN],
}

impl PageBuffer {
    pub const fn blank() -> Self {
        Self {
            bytes: [ALL_OFF; BUFFER_LEN],
        }
    }

    pub fn clear(&mut self) {
        self.bytes.fill(ALL_OFF);
    }

    pub fn light(&mut self, x: usize, y: usize) {
        let addr = PixelAddr::new(x, y);
        self.bytes[addr.index()] &= !addr.mask();
    }

    pub fn is_on(&self, x: usize, y: usize) -> bool {
        let addr = PixelAddr::new(x, y);
        self.bytes[addr.index()] & addr.mask() == 0
    }

    /// overwrites one column byte of a page.
    pub fn set_column(&mut self, page: usize, column: usize, value: u8) {
        self.bytes[page * DISPLAY_WIDTH + column] = value;
    }

    /// keeps a pixel lit only where both layers have it lit.
    pub fn and_assign(&mut self, other: &PageBuffer) {
        for (dst, src) in self.bytes.iter_mut().zip(other.bytes.iter()) {
            *dst &= src;
        }
    }

    pub fn as_bytes(&self) -> &[u8; BUFFER_LEN] {
        &self.bytes
    }

    /// the column bytes of each page, top page first.
    pub fn pages(&self) -> impl Iterator<Item = &[u8]> {
        self.bytes.chunks_exact(DISPLAY_WIDTH)
    }

    pub fn lit_count(&self) -> usize {
        self.bytes
            .iter()
            .map(|byte| byte.count_zeros() as usize)
            .sum()
    }
}

impl Default for PageBuffer {
    fn default() -> Self {
        Self::blank()
    }
}

impl std::fmt::Debug for PageBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // one line per pixel row reads far better in assertion diffs than 512 numbers.
        writeln!(f, "PageBuffer [")?;
        for y in 0..DISPLAY_HEIGHT {
            let row: String = (0..DISPLAY_WIDTH)
                .map(|x| if self.is_on(x, y) { '#' } else { '.' })
                .collect();
            writeln!(f, "  {row}")?;
        }
        write!(f, "]")
    }
}
