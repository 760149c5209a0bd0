//! Viewer settings.
//!
//! The process surface takes no flags and reads no configuration variables;
//! every setting comes from the constants in `halfcam-types`.

use std::time::Duration;

use crate::source::SourceOptions;
use crate::types::{FRAME_DELAY_MS, SHUTDOWN_GRACE_MS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
    /// Sleep between frames.
    pub frame_delay: Duration,
    /// How long shutdown waits for the loop before forcing the exit path.
    pub shutdown_grace: Duration,
    /// How the ffmpeg source is launched.
    pub source: SourceOptions,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            frame_delay: Duration::from_millis(FRAME_DELAY_MS),
            shutdown_grace: Duration::from_millis(SHUTDOWN_GRACE_MS),
            source: SourceOptions::default(),
        }
    }
}
