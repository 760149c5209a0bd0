//! Terminal webcam viewer (default binary).
//!
//! Usage: `halfcam [DEVICE_INDEX | PATH_OR_URL]`
//!
//! Frames come from an `ffmpeg` child process, are fitted to the terminal and
//! drawn with half-block glyphs until SIGINT/SIGTERM.

use std::io;
use std::panic;

use anyhow::{Context, Result};
use log::{error, info};

use halfcam::runtime::{CancelFlag, ShutdownListener, Viewer, ViewerConfig};
use halfcam::source::FfmpegSource;
use halfcam::term::{restore_terminal, CrosstermProbe, ScreenGuard};
use halfcam::types::SourceRef;

fn main() -> Result<()> {
    init_logging();
    let config = ViewerConfig::default();

    let arg = std::env::args().nth(1);
    let source_ref = SourceRef::parse(arg.as_deref());

    // Nothing has touched the terminal yet, so a failed open just exits.
    let source = FfmpegSource::open(&source_ref, &config.source)
        .with_context(|| format!("error opening video source {source_ref}"))?;

    let cancel = CancelFlag::new();
    // Handlers are installed before this returns, so a signal that lands
    // right after entering the alternate screen is still caught.
    let _listener = ShutdownListener::start(cancel.clone(), config.shutdown_grace, || {
        let _ = restore_terminal();
        std::process::exit(0);
    })?;

    let guard = ScreenGuard::enter()?;
    install_panic_restore();

    let mut viewer = Viewer::new(source, CrosstermProbe, io::stdout(), config.frame_delay);
    let result = viewer.run(&cancel);
    drop(viewer);

    // Always try to restore terminal state.
    let _ = guard.release();
    if let Err(err) = &result {
        error!("render loop failed: {err:#}");
    }
    info!("exiting");
    result
}

// Stderr, `warn` unless RUST_LOG says otherwise. Redirect stderr to keep
// verbose logs off the picture.
fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_micros()
        .init();
}

fn install_panic_restore() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        default_hook(info);
    }));
}
