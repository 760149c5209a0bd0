//! Frame sources.
//!
//! A frame source hands out one owned [`RasterFrame`] per call. Failed or
//! empty reads are reported as [`FrameError::EmptyFrame`] and are expected to
//! be retried by the caller on the next loop pass.
//!
//! - [`ffmpeg`]: capture devices, files and URLs read through an `ffmpeg`
//!   child process emitting raw BGR frames

pub mod ffmpeg;

pub use halfcam_core as core;
pub use halfcam_types as types;

pub use ffmpeg::{ffmpeg_args, FfmpegSource, SourceOptions};

use std::io;

use thiserror::Error;

use crate::core::{FrameError, RasterFrame};

/// Produces raw frames on demand.
pub trait FrameSource {
    /// Next captured frame, or `EmptyFrame` when nothing usable was read.
    fn next_frame(&mut self) -> Result<RasterFrame, FrameError>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self) -> Result<RasterFrame, FrameError> {
        (**self).next_frame()
    }
}

/// Why a source could not be opened. Always fatal at startup.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("could not open video source {target}: {detail}")]
    Unavailable { target: String, detail: String },

    #[error("numbered capture devices are unsupported on this platform; pass a path or URL")]
    Unsupported,
}
