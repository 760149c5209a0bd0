//! Viewer runtime.
//!
//! Drives the capture → fit → encode → draw loop and the signal listener
//! that stops it.

pub mod config;
pub mod shutdown;
pub mod viewer;

pub use halfcam_core as core;
pub use halfcam_source as source;
pub use halfcam_term as term;
pub use halfcam_types as types;

pub use config::ViewerConfig;
pub use shutdown::{supervise, CancelFlag, ShutdownListener, TerminationSignals};
pub use viewer::{StepOutcome, Viewer, ViewerStats};
