//! Signal handling.
//!
//! Bridges the sync render loop with an async signal listener. The listener
//! runs on its own small tokio runtime: on SIGINT/SIGTERM it raises the
//! [`CancelFlag`] the loop polls between frames, then gives the loop a grace
//! period to wind down before forcing the exit path itself (the loop may be
//! blocked inside a frame read).
//!
//! Handlers are installed synchronously by [`ShutdownListener::start`]; from
//! the moment it returns, SIGINT/SIGTERM no longer take their default action.

use std::future::Future;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use log::info;
use tokio::runtime::{Builder, Runtime};

/// Cooperative cancellation shared between the listener and the loop.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Running signal listener. Dropping it stops the listener.
pub struct ShutdownListener {
    _rt: Runtime,
}

impl ShutdownListener {
    /// Start listening for termination signals.
    ///
    /// `on_timeout` runs if the loop has not returned `grace` after the
    /// signal; it is expected to restore the terminal and exit the process.
    pub fn start<F>(cancel: CancelFlag, grace: Duration, on_timeout: F) -> Result<Self>
    where
        F: FnOnce() + Send + 'static,
    {
        let rt = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("halfcam-signal")
            .enable_all()
            .build()
            .context("failed to create signal runtime")?;

        let signals = {
            let _ctx = rt.enter();
            TerminationSignals::register().context("failed to install signal handlers")?
        };

        rt.spawn(async move {
            let mut signals = signals;
            supervise(signals.recv(), cancel, grace, on_timeout).await;
        });

        Ok(Self { _rt: rt })
    }
}

/// Wait for `signal`, raise `cancel`, then call `on_timeout` after `grace`.
///
/// The task is normally dropped (together with its runtime) before the grace
/// period elapses, because the loop noticed the flag and returned.
pub async fn supervise<S, F>(signal: S, cancel: CancelFlag, grace: Duration, on_timeout: F)
where
    S: Future<Output = ()>,
    F: FnOnce(),
{
    signal.await;
    info!("termination signal received");
    cancel.cancel();
    tokio::time::sleep(grace).await;
    info!("render loop did not stop within {grace:?}, forcing exit");
    on_timeout();
}

/// Installed termination handlers: SIGINT and SIGTERM on Unix, Ctrl+C on
/// Windows.
pub struct TerminationSignals {
    #[cfg(unix)]
    interrupt: tokio::signal::unix::Signal,
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
    #[cfg(windows)]
    ctrl_c: tokio::signal::windows::CtrlC,
}

impl TerminationSignals {
    /// Install the handlers now. Must run inside a tokio runtime context.
    #[cfg(unix)]
    pub fn register() -> io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    /// Install the handlers now. Must run inside a tokio runtime context.
    #[cfg(windows)]
    pub fn register() -> io::Result<Self> {
        Ok(Self {
            ctrl_c: tokio::signal::windows::ctrl_c()?,
        })
    }

    /// Resolves on the next termination signal.
    pub async fn recv(&mut self) {
        #[cfg(unix)]
        {
            tokio::select! {
                _ = self.interrupt.recv() => {}
                _ = self.terminate.recv() => {}
            }
        }

        #[cfg(windows)]
        {
            let _ = self.ctrl_c.recv().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_pending, task};

    #[test]
    fn flag_is_shared_between_clones() {
        let a = CancelFlag::new();
        let b = a.clone();
        assert!(!b.is_cancelled());
        a.cancel();
        assert!(b.is_cancelled());
    }

    #[test]
    fn nothing_happens_without_a_signal() {
        let cancel = CancelFlag::new();
        let mut fut = task::spawn(supervise(
            std::future::pending::<()>(),
            cancel.clone(),
            Duration::from_millis(1),
            || panic!("must not time out"),
        ));
        assert_pending!(fut.poll());
        assert!(!cancel.is_cancelled());
    }

    #[tokio::test]
    async fn signal_cancels_then_forces_exit_after_grace() {
        let cancel = CancelFlag::new();
        let forced = Arc::new(AtomicBool::new(false));
        let forced_in_task = forced.clone();

        supervise(
            async {},
            cancel.clone(),
            Duration::from_millis(5),
            move || forced_in_task.store(true, Ordering::SeqCst),
        )
        .await;

        assert!(cancel.is_cancelled());
        assert!(forced.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn loop_gets_the_whole_grace_period() {
        let cancel = CancelFlag::new();
        let forced = Arc::new(AtomicBool::new(false));
        let forced_in_task = forced.clone();

        let handle = tokio::spawn(supervise(
            async {},
            cancel.clone(),
            Duration::from_millis(500),
            move || forced_in_task.store(true, Ordering::SeqCst),
        ));

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(cancel.is_cancelled());
        assert!(!forced.load(Ordering::SeqCst));

        handle.await.unwrap();
        assert!(forced.load(Ordering::SeqCst));
    }
}
