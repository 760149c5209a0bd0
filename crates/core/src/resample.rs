//! Area-weighted resampling.
//!
//! Each destination pixel covers the source interval `[i*s, (i+1)*s)` on both
//! axes, where `s = src / dst`. Its value is the overlap-weighted mean of the
//! source pixels inside that box. The filter is separable: a horizontal pass
//! into an `f32` scratch buffer, then a vertical pass into the output bytes.
//!
//! Weights for one destination index always sum to 1, so a uniform frame stays
//! uniform after any resize.

use crate::types::CHANNELS;

/// Per-axis contribution table.
///
/// For destination index `i`, source indices `start..start + len` contribute
/// with the weights stored at `weights[offset..offset + len]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisWeights {
    src_len: usize,
    dst_len: usize,
    spans: Vec<Span>,
    weights: Vec<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    start: usize,
    len: usize,
    offset: usize,
}

impl AxisWeights {
    /// Build the table for mapping `src_len` samples onto `dst_len` samples.
    pub fn new(src_len: usize, dst_len: usize) -> Self {
        let mut table = Self::default();
        table.rebuild(src_len, dst_len);
        table
    }

    /// Recompute only if the axis lengths changed.
    pub fn ensure(&mut self, src_len: usize, dst_len: usize) {
        if self.src_len != src_len || self.dst_len != dst_len || self.spans.is_empty() {
            self.rebuild(src_len, dst_len);
        }
    }

    fn rebuild(&mut self, src_len: usize, dst_len: usize) {
        self.src_len = src_len;
        self.dst_len = dst_len;
        self.spans.clear();
        self.weights.clear();
        if src_len == 0 || dst_len == 0 {
            return;
        }

        let scale = src_len as f64 / dst_len as f64;
        for i in 0..dst_len {
            let lo = i as f64 * scale;
            let hi = ((i + 1) as f64 * scale).min(src_len as f64);
            let first = (lo.floor() as usize).min(src_len - 1);
            let last = (hi.ceil() as usize).clamp(first + 1, src_len);

            let offset = self.weights.len();
            let mut total = 0.0f64;
            for j in first..last {
                let overlap = (hi.min((j + 1) as f64) - lo.max(j as f64)).max(0.0);
                total += overlap;
                self.weights.push(overlap as f32);
            }

            // Normalize so the weights sum to exactly 1 even with rounding in
            // `scale`.
            if total > 0.0 {
                for w in &mut self.weights[offset..] {
                    *w = (*w as f64 / total) as f32;
                }
            } else {
                self.weights[offset] = 1.0;
            }

            self.spans.push(Span {
                start: first,
                len: last - first,
                offset,
            });
        }
    }

    /// Source indices and weights contributing to destination index `i`.
    #[inline(always)]
    pub fn taps(&self, i: usize) -> (usize, &[f32]) {
        let span = self.spans[i];
        (span.start, &self.weights[span.offset..span.offset + span.len])
    }
}

/// Reusable resampler: keeps both weight tables and the scratch buffers.
#[derive(Debug, Clone, Default)]
pub struct AreaResampler {
    horizontal: AxisWeights,
    vertical: AxisWeights,
    /// Horizontally resampled rows: `src_h` rows of `dst_w * 3` floats.
    scratch: Vec<f32>,
    /// One output row being accumulated by the vertical pass.
    row_acc: Vec<f32>,
}

impl AreaResampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resample `src` (`src_w` x `src_h`, 3 bytes per pixel) into `dst`
    /// (`dst_w` x `dst_h`). Every byte of `dst` is written.
    ///
    /// Channel order is irrelevant here; bytes are averaged per position.
    pub fn resample_into(
        &mut self,
        src: &[u8],
        src_w: usize,
        src_h: usize,
        dst: &mut [u8],
        dst_w: usize,
        dst_h: usize,
    ) {
        debug_assert_eq!(src.len(), src_w * src_h * CHANNELS);
        debug_assert_eq!(dst.len(), dst_w * dst_h * CHANNELS);
        if dst.is_empty() || src.is_empty() {
            return;
        }

        if src_w == dst_w && src_h == dst_h {
            dst.copy_from_slice(src);
            return;
        }

        self.horizontal.ensure(src_w, dst_w);
        self.vertical.ensure(src_h, dst_h);

        let src_stride = src_w * CHANNELS;
        let dst_stride = dst_w * CHANNELS;

        // Horizontal pass: every source row shrinks/grows to dst_w pixels.
        self.scratch.clear();
        self.scratch.resize(src_h * dst_stride, 0.0);
        for y in 0..src_h {
            let src_row = &src[y * src_stride..(y + 1) * src_stride];
            let out_row = &mut self.scratch[y * dst_stride..(y + 1) * dst_stride];
            for x in 0..dst_w {
                let (start, weights) = self.horizontal.taps(x);
                let mut acc = [0.0f32; CHANNELS];
                for (k, &w) in weights.iter().enumerate() {
                    let p = (start + k) * CHANNELS;
                    acc[0] += w * src_row[p] as f32;
                    acc[1] += w * src_row[p + 1] as f32;
                    acc[2] += w * src_row[p + 2] as f32;
                }
                out_row[x * CHANNELS..x * CHANNELS + CHANNELS].copy_from_slice(&acc);
            }
        }

        // Vertical pass: combine scratch rows into each output row.
        self.row_acc.resize(dst_stride, 0.0);
        for y in 0..dst_h {
            self.row_acc.fill(0.0);
            let (start, weights) = self.vertical.taps(y);
            for (k, &w) in weights.iter().enumerate() {
                let row = start + k;
                let src_row = &self.scratch[row * dst_stride..(row + 1) * dst_stride];
                for (acc, &v) in self.row_acc.iter_mut().zip(src_row) {
                    *acc += w * v;
                }
            }

            let out_row = &mut dst[y * dst_stride..(y + 1) * dst_stride];
            for (out, &v) in out_row.iter_mut().zip(&self.row_acc) {
                *out = quantize(v);
            }
        }
    }
}

#[inline(always)]
fn quantize(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// One-shot resample into a fresh buffer.
pub fn resample_area(
    src: &[u8],
    src_w: usize,
    src_h: usize,
    dst_w: usize,
    dst_h: usize,
) -> Vec<u8> {
    let mut dst = vec![0u8; dst_w * dst_h * CHANNELS];
    AreaResampler::new().resample_into(src, src_w, src_h, &mut dst, dst_w, dst_h);
    dst
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weight_sum(table: &AxisWeights, i: usize) -> f32 {
        table.taps(i).1.iter().sum()
    }

    #[test]
    fn integer_downscale_uses_equal_weights() {
        let table = AxisWeights::new(4, 2);
        assert_eq!(table.taps(0), (0, &[0.5f32, 0.5][..]));
        assert_eq!(table.taps(1), (2, &[0.5f32, 0.5][..]));
    }

    #[test]
    fn fractional_downscale_splits_boundary_pixel() {
        // 3 -> 2: dst 0 covers [0, 1.5), dst 1 covers [1.5, 3).
        let table = AxisWeights::new(3, 2);
        let (start, w) = table.taps(0);
        assert_eq!(start, 0);
        assert_eq!(w.len(), 2);
        assert!((w[0] - 2.0 / 3.0).abs() < 1e-6);
        assert!((w[1] - 1.0 / 3.0).abs() < 1e-6);

        let (start, w) = table.taps(1);
        assert_eq!(start, 1);
        assert!((w[0] - 1.0 / 3.0).abs() < 1e-6);
        assert!((w[1] - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn upscale_maps_into_source_pixels() {
        let table = AxisWeights::new(2, 4);
        for i in 0..4 {
            let (start, w) = table.taps(i);
            assert_eq!(start, i / 2);
            assert_eq!(w, &[1.0f32][..]);
        }
    }

    #[test]
    fn weights_always_sum_to_one() {
        for src in 1..40 {
            for dst in 1..40 {
                let table = AxisWeights::new(src, dst);
                for i in 0..dst {
                    assert!((weight_sum(&table, i) - 1.0).abs() < 1e-5, "{src}->{dst} @ {i}");
                }
            }
        }
    }

    #[test]
    fn two_by_two_to_one_is_rounded_mean() {
        let src = [
            10, 20, 30, 20, 40, 60, //
            30, 60, 90, 41, 80, 121,
        ];
        let out = resample_area(&src, 2, 2, 1, 1);
        // Means: (10+20+30+41)/4 = 25.25, (20+40+60+80)/4 = 50, (30+60+90+121)/4 = 75.25
        assert_eq!(out, vec![25, 50, 75]);
    }

    #[test]
    fn same_size_is_a_copy() {
        let src: Vec<u8> = (0..27).collect();
        assert_eq!(resample_area(&src, 3, 3, 3, 3), src);
    }

    #[test]
    fn resampler_reuses_tables_across_calls() {
        let mut r = AreaResampler::new();
        let src = vec![100u8; 8 * 6 * 3];
        let mut dst = vec![0u8; 4 * 2 * 3];
        r.resample_into(&src, 8, 6, &mut dst, 4, 2);
        let tables = (r.horizontal.clone(), r.vertical.clone());
        r.resample_into(&src, 8, 6, &mut dst, 4, 2);
        assert_eq!((r.horizontal.clone(), r.vertical.clone()), tables);
        assert!(dst.iter().all(|&b| b == 100));
    }
}
