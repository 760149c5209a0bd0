//! The capture → fit → encode → draw loop.

use std::io::Write;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use log::{debug, warn};

use crate::core::{FrameAdapter, FrameError, RasterFrame};
use crate::shutdown::CancelFlag;
use crate::source::FrameSource;
use crate::term::{encode_into, GeometryProbe, OutputLine, TerminalRenderer};
use crate::types::TerminalGeometry;

/// What a single loop pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A frame was drawn at `geometry` using `lines` printed rows.
    Rendered {
        geometry: TerminalGeometry,
        lines: usize,
    },
    /// The source had nothing usable; the terminal was left untouched.
    Skipped(FrameError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewerStats {
    pub frames_drawn: u64,
    pub frames_skipped: u64,
}

/// Owns one frame source, one geometry probe and the terminal sink.
///
/// The target grid, adapter scratch and output lines are kept between passes
/// and fully rewritten each frame; source frames are dropped after fitting.
pub struct Viewer<S, P, W: Write> {
    source: S,
    probe: P,
    renderer: TerminalRenderer<W>,
    adapter: FrameAdapter,
    grid: RasterFrame,
    lines: Vec<OutputLine>,
    frame_delay: Duration,
    stats: ViewerStats,
}

impl<S, P, W> Viewer<S, P, W>
where
    S: FrameSource,
    P: GeometryProbe,
    W: Write,
{
    pub fn new(source: S, probe: P, out: W, frame_delay: Duration) -> Self {
        Self {
            source,
            probe,
            renderer: TerminalRenderer::new(out),
            adapter: FrameAdapter::new(),
            grid: RasterFrame::default(),
            lines: Vec::new(),
            frame_delay,
            stats: ViewerStats::default(),
        }
    }

    /// Run one pass: read, fit, encode, draw.
    ///
    /// Per-frame problems are reported as [`StepOutcome::Skipped`]; only a
    /// failing terminal write is an error.
    pub fn step(&mut self) -> Result<StepOutcome> {
        let frame = match self.source.next_frame() {
            Ok(frame) => frame,
            Err(err) => return Ok(self.skip(err)),
        };

        let geometry = self.probe.geometry();
        if let Err(err) = self.adapter.fit_into(&frame, geometry, &mut self.grid) {
            return Ok(self.skip(err));
        }
        drop(frame);

        encode_into(&self.grid, &mut self.lines);
        self.renderer.draw(&self.lines)?;
        self.stats.frames_drawn += 1;

        Ok(StepOutcome::Rendered {
            geometry,
            lines: self.lines.len(),
        })
    }

    fn skip(&mut self, err: FrameError) -> StepOutcome {
        self.stats.frames_skipped += 1;
        if err.is_recoverable() {
            debug!("skipping frame: {err}");
        } else {
            warn!("skipping malformed frame: {err}");
        }
        StepOutcome::Skipped(err)
    }

    /// Loop until `cancel` is raised or the terminal write fails.
    pub fn run(&mut self, cancel: &CancelFlag) -> Result<()> {
        while !cancel.is_cancelled() {
            self.step()?;
            if cancel.is_cancelled() {
                break;
            }
            thread::sleep(self.frame_delay);
        }
        debug!(
            "render loop stopped after {} frames ({} skipped)",
            self.stats.frames_drawn, self.stats.frames_skipped
        );
        Ok(())
    }

    pub fn stats(&self) -> ViewerStats {
        self.stats
    }

    /// The terminal sink, e.g. to inspect bytes written in tests.
    pub fn output(&self) -> &W {
        self.renderer.get_ref()
    }

    pub fn into_output(self) -> W {
        self.renderer.into_inner()
    }
}
