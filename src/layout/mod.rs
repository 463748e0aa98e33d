//! Layout module orchestrator.
//!
//! The pure layout math lives here: fitting items into rows, grouping the
//! data, and deriving the spacing styles handed to the list widget.

mod chunk;
mod dimensions;
mod styles;

pub use chunk::{RowEntry, chunk, chunk_indexed, invert_rows};
pub use dimensions::{LayoutResult, calculate_dimensions};
pub use styles::{
    FlexDirection, GridStyles, Justify, SizeAdjustment, Style, StyleInputs, StyleInsetAdjustment,
    adjusted_total_size, generate_styles,
};
