//! halfcam (workspace facade crate).
//!
//! Re-exports the pipeline crates under short module names so the binary,
//! integration tests and benches share one import path:
//! `halfcam::{core, runtime, source, term, types}`.

pub use halfcam_core as core;
pub use halfcam_runtime as runtime;
pub use halfcam_source as source;
pub use halfcam_term as term;
pub use halfcam_types as types;
