//! Terminal size probing.

use crossterm::terminal;
use log::debug;

use crate::types::TerminalGeometry;

/// Something that can report the terminal size in (columns, rows).
pub trait GeometryProbe {
    /// `None` when the size cannot be queried (e.g. output is not a tty).
    fn query(&mut self) -> Option<(u16, u16)>;

    /// Query and apply the 80x24 fallback for failed or degenerate sizes.
    fn geometry(&mut self) -> TerminalGeometry {
        let queried = self.query();
        TerminalGeometry::from_query(queried).unwrap_or_else(|| {
            debug!("terminal size unavailable ({queried:?}), using fallback");
            TerminalGeometry::FALLBACK
        })
    }
}

/// Probe backed by `crossterm::terminal::size`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermProbe;

impl GeometryProbe for CrosstermProbe {
    fn query(&mut self) -> Option<(u16, u16)> {
        terminal::size().ok()
    }
}

/// Probe that always reports the same size. Useful for headless runs.
#[derive(Debug, Clone, Copy)]
pub struct FixedProbe(pub Option<(u16, u16)>);

impl GeometryProbe for FixedProbe {
    fn query(&mut self) -> Option<(u16, u16)> {
        self.0
    }
}
