//! TerminalRenderer: writes encoded frames to a real terminal.
//!
//! Frames are drawn in place: cursor home, then one line per printed row,
//! each flushed on its own. The screen is never cleared per frame, so the new
//! frame overwrites the old one without flicker or scroll.

use std::io::{self, Write};

use anyhow::{Context, Result};
use crossterm::{cursor, style::ResetColor, terminal, QueueableCommand};
use log::info;

use crate::encode::OutputLine;

pub struct TerminalRenderer<W: Write> {
    out: W,
    buf: Vec<u8>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            buf: Vec::with_capacity(64),
        }
    }

    /// Draw one frame: cursor home followed by every line and a newline.
    pub fn draw(&mut self, lines: &[OutputLine]) -> Result<()> {
        self.buf.clear();
        self.buf.queue(cursor::MoveTo(0, 0))?;
        self.out
            .write_all(&self.buf)
            .context("failed to move cursor home")?;

        for line in lines {
            write_line(&mut self.out, line).context("failed to write frame line")?;
        }
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

// One flush per line, never per cell.
fn write_line(out: &mut impl Write, line: &OutputLine) -> io::Result<()> {
    out.write_all(line.as_bytes())?;
    out.write_all(b"\n")?;
    out.flush()
}

/// Encode the startup sequence: alternate screen on, cursor hidden.
pub fn encode_enter_into(out: &mut Vec<u8>) -> io::Result<()> {
    out.queue(terminal::EnterAlternateScreen)?;
    out.queue(cursor::Hide)?;
    Ok(())
}

/// Encode the shutdown sequence: colors reset, alternate screen off, cursor
/// shown.
pub fn encode_restore_into(out: &mut Vec<u8>) -> io::Result<()> {
    out.queue(ResetColor)?;
    out.queue(terminal::LeaveAlternateScreen)?;
    out.queue(cursor::Show)?;
    Ok(())
}

/// Put the terminal back into normal mode.
///
/// Safe to call more than once and from the shutdown path while a frame may
/// still be mid-write; at worst a half-written color sequence is left on the
/// abandoned alternate screen.
pub fn restore_terminal() -> io::Result<()> {
    let mut buf = Vec::with_capacity(32);
    encode_restore_into(&mut buf)?;
    let mut stdout = io::stdout();
    stdout.write_all(&buf)?;
    stdout.flush()
}

/// Holds the terminal in alternate-screen mode until dropped.
///
/// Raw mode is left off so Ctrl+C still raises SIGINT.
pub struct ScreenGuard {
    active: bool,
}

impl ScreenGuard {
    pub fn enter() -> Result<Self> {
        let mut buf = Vec::with_capacity(32);
        encode_enter_into(&mut buf)?;
        let mut stdout = io::stdout();
        stdout.write_all(&buf)?;
        stdout.flush()?;
        info!("entered alternate screen");
        Ok(Self { active: true })
    }

    /// Restore now instead of at drop.
    pub fn release(mut self) -> Result<()> {
        self.active = false;
        restore_terminal().context("failed to restore terminal")?;
        info!("terminal restored");
        Ok(())
    }
}

impl Drop for ScreenGuard {
    fn drop(&mut self) {
        if self.active {
            self.active = false;
            // Always try to restore terminal state.
            let _ = restore_terminal();
            info!("terminal restored");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RasterFrame;
    use crate::encode::encode;
    use crate::types::ChannelOrder;

    #[test]
    fn draw_starts_at_home_and_terminates_every_line() {
        let grid = RasterFrame::filled(3, 6, ChannelOrder::Rgb, [1, 2, 3]).unwrap();
        let lines = encode(&grid);

        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.draw(&lines).unwrap();
        let out = renderer.into_inner();

        assert!(out.starts_with(b"\x1b[1;1H"));
        assert_eq!(out.iter().filter(|&&b| b == b'\n').count(), 3);
        assert!(out.ends_with(b"\x1b[0m\n"));
    }

    #[test]
    fn draw_never_clears_the_screen() {
        let grid = RasterFrame::filled(2, 2, ChannelOrder::Rgb, [0, 0, 0]).unwrap();
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.draw(&encode(&grid)).unwrap();
        renderer.draw(&encode(&grid)).unwrap();
        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(!text.contains("\x1b[2J"));
        assert_eq!(text.matches("\x1b[1;1H").count(), 2);
    }

    #[test]
    fn enter_and_restore_sequences() {
        let mut enter = Vec::new();
        encode_enter_into(&mut enter).unwrap();
        assert_eq!(enter, b"\x1b[?1049h\x1b[?25l");

        let mut restore = Vec::new();
        encode_restore_into(&mut restore).unwrap();
        let text = String::from_utf8(restore).unwrap();
        assert!(text.starts_with("\x1b[0m"));
        assert!(text.contains("\x1b[?1049l"));
        assert!(text.ends_with("\x1b[?25h"));
    }

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn draw_reports_sink_failures() {
        let grid = RasterFrame::filled(1, 2, ChannelOrder::Rgb, [0, 0, 0]).unwrap();
        let mut renderer = TerminalRenderer::new(FailingSink);
        assert!(renderer.draw(&encode(&grid)).is_err());
    }
}
