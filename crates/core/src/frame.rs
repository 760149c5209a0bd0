//! Raster frame module - owned pixel buffers
//!
//! A frame is a flat row-major byte buffer of `width * height` pixels, three
//! bytes each, tagged with the order its channels are stored in.
//! Coordinates: (x, y) where x grows left to right and y top to bottom.

use thiserror::Error;

use crate::types::{ChannelOrder, CHANNELS};

/// Reasons a frame cannot be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameError {
    /// No usable pixels: a read failed or a dimension is zero.
    #[error("empty frame")]
    EmptyFrame,

    /// The byte buffer does not match the declared dimensions.
    #[error("frame buffer has {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
}

impl FrameError {
    /// Whether the caller should simply move on to the next frame.
    pub fn is_recoverable(self) -> bool {
        matches!(self, FrameError::EmptyFrame)
    }
}

/// A 2D grid of 3-channel 8-bit pixels.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RasterFrame {
    width: usize,
    height: usize,
    order: ChannelOrder,
    /// Flat pixel bytes, row-major order ((y * width + x) * 3).
    data: Vec<u8>,
}

impl RasterFrame {
    /// Wrap an existing pixel buffer.
    pub fn new(
        width: usize,
        height: usize,
        order: ChannelOrder,
        data: Vec<u8>,
    ) -> Result<Self, FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::EmptyFrame);
        }
        let expected = width * height * CHANNELS;
        if data.len() != expected {
            return Err(FrameError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            order,
            data,
        })
    }

    /// A frame where every pixel holds the same three bytes.
    pub fn filled(
        width: usize,
        height: usize,
        order: ChannelOrder,
        px: [u8; 3],
    ) -> Result<Self, FrameError> {
        let data = px.repeat(width * height);
        Self::new(width, height, order, data)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Bytes in one row.
    #[inline(always)]
    pub fn stride(&self) -> usize {
        self.width * CHANNELS
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y * self.width + x) * CHANNELS)
    }

    /// Pixel bytes at (x, y) in storage order, or `None` if out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        self.index(x, y)
            .map(|i| [self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    /// Overwrite pixel bytes at (x, y). Returns false if out of bounds.
    pub fn set(&mut self, x: usize, y: usize, px: [u8; 3]) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.data[i..i + CHANNELS].copy_from_slice(&px);
                true
            }
            None => false,
        }
    }

    /// One full row of pixel bytes.
    pub fn row(&self, y: usize) -> &[u8] {
        let stride = self.stride();
        &self.data[y * stride..(y + 1) * stride]
    }

    /// Iterate all pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.data.chunks_exact(CHANNELS).map(|c| [c[0], c[1], c[2]])
    }

    /// Reshape in place, keeping the allocation where possible.
    ///
    /// Existing bytes are not meaningful afterwards; callers must overwrite
    /// every pixel before reading.
    pub(crate) fn reshape(&mut self, width: usize, height: usize, order: ChannelOrder) {
        self.width = width;
        self.height = height;
        self.order = order;
        self.data.resize(width * height * CHANNELS, 0);
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub(crate) fn set_order(&mut self, order: ChannelOrder) {
        self.order = order;
    }
}
