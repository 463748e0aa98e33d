use thiserror::Error;

/// Unified result type for the fallible edges of the grid crate.
pub type Result<T> = std::result::Result<T, GridError>;

/// Errors surfaced by terminal rendering and the runtime loop.
///
/// Layout math never fails; degenerate inputs fall back to a single column.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("terminal backend error: {0}")]
    Backend(String),
    #[error("invalid grid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
