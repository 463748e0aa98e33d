//! Responsive grid layout over a virtualized list.
//!
//! A [`GridView`] measures the space it is given, works out how many items
//! fit per row for a target item size and spacing, groups the caller's items
//! into rows and hands those rows to a [`VirtualList`]. The list decides
//! which rows to materialise and calls back into the grid to render them.
//!
//! The layout math in [`layout`] is pure and usable on its own. The
//! [`render`] and [`runtime`] modules host a grid inside a terminal.
//!
//! ```
//! use flat_grid::{EagerList, FixedWindow, GridConfig, GridView, Size};
//!
//! let config = GridConfig::new().with_item_size(100.0).fixed(true);
//! let mut grid: GridView<&str, String> =
//!     GridView::mount(config, &FixedWindow(Size::new(330, 600)), |ctx| {
//!         format!("{} at row {}", ctx.item, ctx.row_index)
//!     });
//!
//! let items = ["a", "b", "c", "d"];
//! let mut list = EagerList::new();
//! let frame = grid.render(&items, &mut list);
//! assert_eq!(frame.layout.items_per_row, 3);
//! assert_eq!(list.rows().len(), 2);
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod platform;
pub mod render;
pub mod runtime;
pub mod view;
pub mod width;

pub use config::{DEFAULT_ITEM_SIZE, DEFAULT_SPACING, GridConfig, ListOptions};
pub use error::{GridError, Result};
pub use geometry::{Edges, Orientation, Rect, Size};
pub use layout::{
    GridStyles, LayoutResult, SizeAdjustment, Style, StyleInsetAdjustment, adjusted_total_size,
    calculate_dimensions, chunk, generate_styles,
};
pub use logging::{LogEvent, LogLevel, LogSink, Logger, LoggingError, LoggingResult, MemorySink};
pub use metrics::{GridMetrics, MetricSnapshot};
pub use platform::{FixedWindow, NoWindow, TerminalWindow, WindowMetrics};
pub use render::{RendererSettings, TerminalList};
pub use runtime::driver::cli::CliDriver;
pub use runtime::{GridRuntime, RuntimeConfig, RuntimeEvent};
pub use view::{
    EagerList, GridFrame, GridView, GridViewBuilder, ItemContext, LayoutEvent, ListRequest,
    MeasureOutcome, Measurement, RenderedItem, RenderedRow, RowRenderer, SeparatorState,
    VirtualList,
};
pub use width::display_width;
