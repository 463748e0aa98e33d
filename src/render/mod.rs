//! Terminal hosting for grids.

mod terminal;

pub use terminal::{RendererSettings, TerminalList};
