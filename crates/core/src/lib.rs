//! Frame adapter - pure, deterministic, and testable
//!
//! This crate turns raster frames of arbitrary resolution into the exact pixel
//! grid a terminal can show with half-block glyphs. It has **zero
//! dependencies** on terminals, processes, or I/O, making it:
//!
//! - **Deterministic**: the same frame and geometry always yield the same grid
//! - **Testable**: resampling and reordering are plain functions over buffers
//! - **Fast**: the pooled [`FrameAdapter::fit_into`] path reuses its scratch
//!   buffers across frames
//!
//! # Module Structure
//!
//! - [`frame`]: `RasterFrame` pixel buffer and `FrameError`
//! - [`resample`]: separable area-weighted resampling
//! - [`adapter`]: `FrameAdapter` / [`fit`], resample followed by channel reorder
//!
//! # Example
//!
//! ```
//! use halfcam_core::{fit, RasterFrame};
//! use halfcam_types::{ChannelOrder, TerminalGeometry};
//!
//! // 4x4 BGR frame, every pixel red.
//! let frame = RasterFrame::filled(4, 4, ChannelOrder::Bgr, [0, 0, 255]).unwrap();
//! let grid = fit(&frame, TerminalGeometry::new(2, 2)).unwrap();
//!
//! assert_eq!((grid.width(), grid.height()), (2, 2));
//! assert_eq!(grid.order(), ChannelOrder::Rgb);
//! assert!(grid.pixels().all(|px| px == [255, 0, 0]));
//! ```

pub mod adapter;
pub mod frame;
pub mod resample;

pub use adapter::{fit, reorder_channels, FrameAdapter};
pub use frame::{FrameError, RasterFrame};
pub use resample::{resample_area, AreaResampler, AxisWeights};

pub use halfcam_types as types;
