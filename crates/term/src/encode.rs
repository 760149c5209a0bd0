//! Half-block cell encoder.
//!
//! Turns a canonical-RGB pixel grid into terminal lines. Pixel rows are
//! consumed in pairs: row `2i` becomes the foreground (top half of `▀`), row
//! `2i + 1` the background. Each cell restates both colors; the reset is
//! written once at the end of the line.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::RasterFrame;
use crate::types::{ChannelOrder, Rgb, CHANNELS, HALF_BLOCK};

/// `ESC[0m`, written once per line.
pub const RESET: &[u8] = b"\x1b[0m";

/// UTF-8 bytes of the upper half block glyph.
pub const HALF_BLOCK_UTF8: &[u8] = "▀".as_bytes();

/// Worst-case bytes per cell: two `ESC[x8;2;RRR;GGG;BBBm` (19 each) plus the
/// 3-byte glyph.
const MAX_CELL_BYTES: usize = 19 * 2 + 3;

/// One terminal character position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Top pixel.
    pub fg: Rgb,
    /// Bottom pixel.
    pub bg: Rgb,
}

impl Cell {
    pub const fn new(fg: Rgb, bg: Rgb) -> Self {
        Self { fg, bg }
    }

    pub const fn glyph(&self) -> char {
        HALF_BLOCK
    }

    /// Append this cell's escape sequences and glyph to `out`.
    #[inline]
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        push_sgr_rgb(out, b"38", self.fg);
        push_sgr_rgb(out, b"48", self.bg);
        out.extend_from_slice(HALF_BLOCK_UTF8);
    }
}

/// Bytes for one printed terminal row (without the trailing newline).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputLine {
    bytes: Vec<u8>,
}

impl OutputLine {
    pub fn with_capacity_for(columns: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(line_capacity(columns)),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl AsRef<[u8]> for OutputLine {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Capacity hint for a line of `columns` cells.
pub fn line_capacity(columns: usize) -> usize {
    columns * MAX_CELL_BYTES + RESET.len()
}

/// Number of printed lines for a grid of `height` pixel rows.
pub fn line_count(grid: &RasterFrame) -> usize {
    grid.height() / 2
}

/// Read the cell at column `x` of printed line `line`.
pub fn cell_at(grid: &RasterFrame, x: usize, line: usize) -> Cell {
    let top = grid.row(line * 2);
    let bottom = grid.row(line * 2 + 1);
    let i = x * CHANNELS;
    Cell::new(
        Rgb::from_slice(&top[i..i + CHANNELS]),
        Rgb::from_slice(&bottom[i..i + CHANNELS]),
    )
}

/// Append printed line `line` of `grid` to `out`.
pub fn encode_line_into(grid: &RasterFrame, line: usize, out: &mut Vec<u8>) {
    let top = grid.row(line * 2);
    let bottom = grid.row(line * 2 + 1);
    for (t, b) in top
        .chunks_exact(CHANNELS)
        .zip(bottom.chunks_exact(CHANNELS))
    {
        Cell::new(Rgb::from_slice(t), Rgb::from_slice(b)).encode_into(out);
    }
    out.extend_from_slice(RESET);
}

/// Encode `grid` into `lines`, reusing the line allocations already there.
///
/// `lines` ends up with exactly `height / 2` entries in top-to-bottom order.
pub fn encode_into(grid: &RasterFrame, lines: &mut Vec<OutputLine>) {
    check_grid(grid);

    let count = line_count(grid);
    lines.truncate(count);
    while lines.len() < count {
        lines.push(OutputLine::with_capacity_for(grid.width()));
    }

    for (i, line) in lines.iter_mut().enumerate() {
        line.bytes.clear();
        line.bytes.reserve(line_capacity(grid.width()));
        encode_line_into(grid, i, &mut line.bytes);
    }
}

/// Encode `grid` into freshly allocated lines.
pub fn encode(grid: &RasterFrame) -> Vec<OutputLine> {
    let mut lines = Vec::with_capacity(line_count(grid));
    encode_into(grid, &mut lines);
    lines
}

fn check_grid(grid: &RasterFrame) {
    debug_assert!(
        grid.height() % 2 == 0,
        "encoder needs an even pixel height, got {}",
        grid.height()
    );
    debug_assert_eq!(grid.order(), ChannelOrder::Rgb);
    debug_assert_eq!(
        grid.data().len(),
        grid.width() * grid.height() * CHANNELS
    );
}

/// `ESC[{selector};2;R;G;Bm`
#[inline]
fn push_sgr_rgb(out: &mut Vec<u8>, selector: &[u8], c: Rgb) {
    out.extend_from_slice(b"\x1b[");
    out.extend_from_slice(selector);
    out.extend_from_slice(b";2;");
    push_decimal(out, c.r);
    out.push(b';');
    push_decimal(out, c.g);
    out.push(b';');
    push_decimal(out, c.b);
    out.push(b'm');
}

#[inline(always)]
fn push_decimal(out: &mut Vec<u8>, v: u8) {
    if v >= 100 {
        out.push(b'0' + v / 100);
        out.push(b'0' + (v / 10) % 10);
    } else if v >= 10 {
        out.push(b'0' + v / 10);
    }
    out.push(b'0' + v % 10);
}
