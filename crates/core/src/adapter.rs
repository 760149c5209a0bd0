//! FrameAdapter: fits a captured frame to the terminal's pixel grid.
//!
//! Resampling runs first, channel reordering second, so the reorder only
//! touches the (much smaller) target buffer.

use crate::frame::{FrameError, RasterFrame};
use crate::resample::AreaResampler;
use crate::types::{ChannelOrder, TerminalGeometry, CHANNELS};

/// Pooled frame adapter.
///
/// Keeps the resampler's weight tables and scratch space alive between
/// frames. Callers can also keep one output grid and pass it to
/// [`FrameAdapter::fit_into`] every frame.
#[derive(Debug, Default)]
pub struct FrameAdapter {
    resampler: AreaResampler,
}

impl FrameAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit `frame` to `geometry`, returning a fresh grid in canonical RGB.
    pub fn fit(
        &mut self,
        frame: &RasterFrame,
        geometry: TerminalGeometry,
    ) -> Result<RasterFrame, FrameError> {
        let mut out = RasterFrame::default();
        self.fit_into(frame, geometry, &mut out)?;
        Ok(out)
    }

    /// Fit `frame` to `geometry`, writing into `out`.
    ///
    /// `out` is reshaped to `(columns, 2 * max(rows - 1, 1))` and every pixel
    /// is overwritten, so a grid reused from a differently sized frame never
    /// shows stale pixels.
    pub fn fit_into(
        &mut self,
        frame: &RasterFrame,
        geometry: TerminalGeometry,
        out: &mut RasterFrame,
    ) -> Result<(), FrameError> {
        if frame.is_empty() {
            return Err(FrameError::EmptyFrame);
        }

        let dst_w = geometry.target_width();
        let dst_h = geometry.target_height();
        out.reshape(dst_w, dst_h, frame.order());

        self.resampler.resample_into(
            frame.data(),
            frame.width(),
            frame.height(),
            out.data_mut(),
            dst_w,
            dst_h,
        );

        reorder_channels(out.data_mut(), frame.order(), ChannelOrder::Rgb);
        out.set_order(ChannelOrder::Rgb);

        debug_assert_eq!(out.height() % 2, 0);
        Ok(())
    }
}

/// Fit a frame with a throwaway adapter.
///
/// Prefer a long-lived [`FrameAdapter`] in loops.
pub fn fit(frame: &RasterFrame, geometry: TerminalGeometry) -> Result<RasterFrame, FrameError> {
    FrameAdapter::new().fit(frame, geometry)
}

/// Rewrite pixels stored in `from` order so they are stored in `to` order.
pub fn reorder_channels(data: &mut [u8], from: ChannelOrder, to: ChannelOrder) {
    if from == to {
        return;
    }
    // Both supported orders are involutions, so going through canonical RGB
    // composes the two permutations.
    let src = from.permutation();
    let dst = to.permutation();
    for px in data.chunks_exact_mut(CHANNELS) {
        let rgb = [px[src[0]], px[src[1]], px[src[2]]];
        px[dst[0]] = rgb[0];
        px[dst[1]] = rgb[1];
        px[dst[2]] = rgb[2];
    }
}
