//! Core types module - shared data structures and constants
//!
//! This module defines the small value types passed between the frame adapter,
//! the cell renderer, the frame source and the run loop. All types are plain
//! data with no external dependencies.
//!
//! # Terminal Geometry
//!
//! Every printed line shows two pixel rows (top half = foreground, bottom
//! half = background), and one terminal row is left unused so the final
//! newline never scrolls the screen:
//!
//! - **Target width**: `columns`
//! - **Target height**: `2 * max(rows - 1, 1)` (always even, at least 2)
//! - **Fallback**: 80 columns by 24 rows when the size cannot be queried
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `FRAME_DELAY_MS` | 30 | Fixed sleep between frames |
//! | `SHUTDOWN_GRACE_MS` | 500 | How long shutdown waits for the loop |
//!
//! # Examples
//!
//! ```
//! use halfcam_types::{SourceRef, TerminalGeometry};
//!
//! let geometry = TerminalGeometry::resolve(Some((120, 40)));
//! assert_eq!(geometry.target_width(), 120);
//! assert_eq!(geometry.target_height(), 78);
//! assert_eq!(geometry.line_count(), 39);
//!
//! // Unqueryable terminals fall back to 80x24.
//! assert_eq!(TerminalGeometry::resolve(None), TerminalGeometry::FALLBACK);
//!
//! assert_eq!(SourceRef::parse(Some("1")), SourceRef::DeviceIndex(1));
//! ```

use std::fmt;

/// Fallback terminal width in columns.
pub const FALLBACK_COLUMNS: u16 = 80;

/// Fallback terminal height in rows.
pub const FALLBACK_ROWS: u16 = 24;

/// Fixed delay between frames in milliseconds.
pub const FRAME_DELAY_MS: u64 = 30;

/// Time the shutdown path waits for the render loop before forcing exit.
pub const SHUTDOWN_GRACE_MS: u64 = 500;

/// Default width of the raw frames requested from the capture process.
pub const DEFAULT_CAPTURE_WIDTH: u32 = 640;

/// Default height of the raw frames requested from the capture process.
pub const DEFAULT_CAPTURE_HEIGHT: u32 = 480;

/// Bytes per pixel in every raster buffer (three 8-bit channels).
pub const CHANNELS: usize = 3;

/// Upper half block (U+2580). Foreground paints the top, background the bottom.
pub const HALF_BLOCK: char = '▀';

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from the first three bytes of a canonical RGB pixel.
    #[inline(always)]
    pub fn from_slice(px: &[u8]) -> Self {
        Self {
            r: px[0],
            g: px[1],
            b: px[2],
        }
    }
}

/// Byte order of the three channels inside a pixel.
///
/// Capture devices commonly deliver `Bgr`. Everything downstream of the frame
/// adapter works in canonical `Rgb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChannelOrder {
    #[default]
    Rgb,
    Bgr,
}

impl ChannelOrder {
    /// Position of (R, G, B) inside a pixel stored in this order.
    ///
    /// # Examples
    ///
    /// ```
    /// use halfcam_types::ChannelOrder;
    ///
    /// assert_eq!(ChannelOrder::Rgb.permutation(), [0, 1, 2]);
    /// assert_eq!(ChannelOrder::Bgr.permutation(), [2, 1, 0]);
    /// ```
    pub const fn permutation(self) -> [usize; 3] {
        match self {
            ChannelOrder::Rgb => [0, 1, 2],
            ChannelOrder::Bgr => [2, 1, 0],
        }
    }

    /// The matching ffmpeg `-pix_fmt` name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelOrder::Rgb => "rgb24",
            ChannelOrder::Bgr => "bgr24",
        }
    }
}

/// Terminal size in character cells.
///
/// Queried once per frame; nothing ties one frame's geometry to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalGeometry {
    pub columns: u16,
    pub rows: u16,
}

impl TerminalGeometry {
    pub const FALLBACK: TerminalGeometry = TerminalGeometry {
        columns: FALLBACK_COLUMNS,
        rows: FALLBACK_ROWS,
    };

    pub const fn new(columns: u16, rows: u16) -> Self {
        Self { columns, rows }
    }

    /// Turn a raw size query into a usable geometry.
    ///
    /// `None` (query failed) and degenerate sizes with a zero dimension both
    /// yield [`TerminalGeometry::FALLBACK`].
    ///
    /// # Examples
    ///
    /// ```
    /// use halfcam_types::TerminalGeometry;
    ///
    /// assert_eq!(TerminalGeometry::resolve(Some((0, 0))), TerminalGeometry::FALLBACK);
    /// assert_eq!(TerminalGeometry::resolve(Some((10, 1))).target_height(), 2);
    /// ```
    pub fn resolve(queried: Option<(u16, u16)>) -> Self {
        Self::from_query(queried).unwrap_or(Self::FALLBACK)
    }

    /// The queried size if it is usable, `None` when the fallback applies.
    pub fn from_query(queried: Option<(u16, u16)>) -> Option<Self> {
        match queried {
            Some((columns, rows)) if columns > 0 && rows > 0 => Some(Self { columns, rows }),
            _ => None,
        }
    }

    /// Width of the target pixel grid.
    pub fn target_width(&self) -> usize {
        self.columns.max(1) as usize
    }

    /// Height of the target pixel grid: two pixel rows per printed line.
    pub fn target_height(&self) -> usize {
        self.line_count() * 2
    }

    /// Number of printed lines per frame. One row is kept free to avoid scroll.
    pub fn line_count(&self) -> usize {
        (self.rows.saturating_sub(1)).max(1) as usize
    }
}

impl Default for TerminalGeometry {
    fn default() -> Self {
        Self::FALLBACK
    }
}

impl fmt::Display for TerminalGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.columns, self.rows)
    }
}

/// Which video source to open.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceRef {
    /// Numbered capture device (`/dev/videoN` on Linux). Negative numbers are
    /// kept as indices and fail when the device is opened.
    DeviceIndex(i32),
    /// File path, URL or explicit device path.
    DevicePath(String),
}

impl SourceRef {
    /// Resolve the optional positional argument.
    ///
    /// No argument means device 0. Anything that parses as an integer
    /// (including negative ones) is a device index, everything else is a path.
    ///
    /// # Examples
    ///
    /// ```
    /// use halfcam_types::SourceRef;
    ///
    /// assert_eq!(SourceRef::parse(None), SourceRef::DeviceIndex(0));
    /// assert_eq!(SourceRef::parse(Some("2")), SourceRef::DeviceIndex(2));
    /// assert_eq!(
    ///     SourceRef::parse(Some("clip.mp4")),
    ///     SourceRef::DevicePath("clip.mp4".to_string())
    /// );
    /// ```
    pub fn parse(arg: Option<&str>) -> Self {
        match arg {
            None => SourceRef::DeviceIndex(0),
            Some(raw) => match raw.trim().parse::<i32>() {
                Ok(index) => SourceRef::DeviceIndex(index),
                Err(_) => SourceRef::DevicePath(raw.to_string()),
            },
        }
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceRef::DeviceIndex(index) => write!(f, "device #{index}"),
            SourceRef::DevicePath(path) => write!(f, "{path}"),
        }
    }
}
