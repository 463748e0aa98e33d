use std::io::{self, Write};

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};

use crate::error::{GridError, Result};
use crate::platform::{TerminalWindow, WindowMetrics};
use crate::runtime::GridRuntime;

/// Owns a [`GridRuntime`] and manages raw mode plus the alternate screen
/// around its loop.
pub struct CliDriver<T> {
    runtime: GridRuntime<T>,
}

impl<T> CliDriver<T> {
    pub fn new(runtime: GridRuntime<T>) -> Self {
        Self { runtime }
    }

    /// Run until the user quits, returning the runtime for inspection.
    pub fn run(mut self) -> Result<GridRuntime<T>> {
        let mut stdout = io::stdout();
        self.enter(&mut stdout)?;
        let result = self.run_inner(&mut stdout);
        self.exit(&mut stdout);
        result.map(|_| self.runtime)
    }

    fn run_inner(&mut self, stdout: &mut impl Write) -> Result<()> {
        let size = TerminalWindow
            .window_size()
            .ok_or_else(|| GridError::Backend("terminal size unavailable".into()))?;
        self.runtime.resize(size);
        self.runtime.run(stdout)
    }

    fn enter(&self, stdout: &mut impl Write) -> Result<()> {
        terminal::enable_raw_mode().map_err(|err| GridError::Backend(err.to_string()))?;
        execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        Ok(())
    }

    fn exit(&self, stdout: &mut impl Write) {
        execute!(stdout, Show, LeaveAlternateScreen).ok();
        terminal::disable_raw_mode().ok();
    }
}
