//! Window size sources used to seed the grid before its first measurement.

use crossterm::terminal;

use crate::geometry::Size;

/// Reports the size of the surface hosting the grid.
pub trait WindowMetrics {
    fn window_size(&self) -> Option<Size>;
}

/// A window size known up front (tests, headless hosts, static layouts).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedWindow(pub Size);

impl WindowMetrics for FixedWindow {
    fn window_size(&self) -> Option<Size> {
        Some(self.0)
    }
}

/// The controlling terminal, measured in character cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalWindow;

impl WindowMetrics for TerminalWindow {
    fn window_size(&self) -> Option<Size> {
        terminal::size()
            .ok()
            .map(|(width, height)| Size::new(width, height))
    }
}

/// No window information at all; the grid starts unmeasured at zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWindow;

impl WindowMetrics for NoWindow {
    fn window_size(&self) -> Option<Size> {
        None
    }
}
