//! Signal-driven shutdown of a running render loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use halfcam::core::{FrameError, RasterFrame};
use halfcam::runtime::{supervise, CancelFlag, Viewer};
use halfcam::source::FrameSource;
use halfcam::term::FixedProbe;
use halfcam::types::ChannelOrder;

struct Endless;

impl FrameSource for Endless {
    fn next_frame(&mut self) -> Result<RasterFrame, FrameError> {
        RasterFrame::filled(16, 12, ChannelOrder::Bgr, [10, 20, 30])
    }
}

#[tokio::test]
async fn signal_stops_loop_before_grace_expires() {
    let cancel = CancelFlag::new();
    let loop_cancel = cancel.clone();

    let render = tokio::task::spawn_blocking(move || {
        let mut viewer = Viewer::new(
            Endless,
            FixedProbe(Some((8, 4))),
            Vec::new(),
            Duration::from_millis(1),
        );
        viewer.run(&loop_cancel).map(|_| viewer.stats())
    });

    let forced = Arc::new(AtomicBool::new(false));
    let forced_flag = forced.clone();
    let supervisor = tokio::spawn(supervise(
        tokio::time::sleep(Duration::from_millis(30)),
        cancel.clone(),
        Duration::from_secs(5),
        move || forced_flag.store(true, Ordering::SeqCst),
    ));

    let stats = render.await.unwrap().unwrap();
    assert!(cancel.is_cancelled());
    assert!(stats.frames_drawn > 0);

    // Loop finished well inside the grace period: the forced exit never ran.
    supervisor.abort();
    assert!(!forced.load(Ordering::SeqCst));
}
