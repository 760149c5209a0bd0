//! Terminal "cell renderer" module.
//!
//! This is a small rendering layer for showing pixel grids in a terminal
//! with half-block glyphs. It does not use a widget toolkit; it encodes each
//! frame into per-row byte lines that can be flushed to any `Write` sink.
//!
//! Goals:
//! - Keep encoding pure and testable (`encode`)
//! - Write frames in place with one flush per line (`renderer`)
//! - Guarantee the terminal leaves alternate-screen mode on every exit path

pub mod encode;
pub mod geometry;
pub mod renderer;

pub use halfcam_core as core;
pub use halfcam_types as types;

pub use encode::{encode, encode_into, encode_line_into, Cell, OutputLine};
pub use geometry::{CrosstermProbe, FixedProbe, GeometryProbe};
pub use renderer::{restore_terminal, ScreenGuard, TerminalRenderer};
