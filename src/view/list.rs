//! The seam between the grid and the list widget that hosts it.
//!
//! The grid only produces rows. Deciding which rows are materialised,
//! scrolling them and recycling their views belongs to the [`VirtualList`]
//! implementation.

use std::collections::HashSet;

use crate::config::ListOptions;
use crate::geometry::Orientation;
use crate::layout::{LayoutResult, Style};

/// Highlight state of the separators around a row, owned by the list widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeparatorState {
    pub leading_highlighted: bool,
    pub trailing_highlighted: bool,
}

/// Everything a list widget needs to lay out the grid's synthetic row items.
#[derive(Debug)]
pub struct ListRequest<'a> {
    pub orientation: Orientation,
    pub layout: LayoutResult,
    /// One key per row, in row order.
    pub row_keys: &'a [String],
    /// Style of the list itself, leading grid padding included.
    pub list_style: &'a Style,
    pub content_container_style: Option<&'a Style>,
    /// Caller options forwarded unmodified.
    pub options: &'a ListOptions,
}

impl ListRequest<'_> {
    pub fn row_count(&self) -> usize {
        self.row_keys.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedItem<V> {
    pub key: String,
    /// Position of the item in the input sequence.
    pub index: usize,
    pub output: V,
}

/// Output of the grid's row renderer for a single row.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRow<V> {
    pub key: String,
    pub row_index: usize,
    pub style: Style,
    pub item_style: Style,
    pub items: Vec<RenderedItem<V>>,
}

/// Row renderer the grid passes to the list widget.
pub type RowRenderer<'r, V> = dyn FnMut(usize, SeparatorState) -> RenderedRow<V> + 'r;

/// A list widget able to host the grid.
pub trait VirtualList<V> {
    /// Lay out `request.row_count()` rows, calling `render_row` for each row
    /// the widget decides to materialise.
    fn render(&mut self, request: &ListRequest<'_>, render_row: &mut RowRenderer<'_, V>);
}

/// Materialises every row in order and keeps the output.
#[derive(Debug, Clone)]
pub struct EagerList<V> {
    rows: Vec<RenderedRow<V>>,
    highlighted: HashSet<usize>,
    options: ListOptions,
    list_style: Style,
}

impl<V> Default for EagerList<V> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            highlighted: HashSet::new(),
            options: ListOptions::new(),
            list_style: Style::default(),
        }
    }
}

impl<V> EagerList<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highlight the separators on both sides of `row_index`.
    pub fn highlight_row(&mut self, row_index: usize) {
        self.highlighted.insert(row_index);
    }

    pub fn unhighlight_row(&mut self, row_index: usize) {
        self.highlighted.remove(&row_index);
    }

    pub fn rows(&self) -> &[RenderedRow<V>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<RenderedRow<V>> {
        self.rows
    }

    /// Options received with the last request.
    pub fn options(&self) -> &ListOptions {
        &self.options
    }

    pub fn list_style(&self) -> &Style {
        &self.list_style
    }

    fn separators_for(&self, row_index: usize) -> SeparatorState {
        let previous = row_index
            .checked_sub(1)
            .map(|prev| self.highlighted.contains(&prev))
            .unwrap_or(false);
        let current = self.highlighted.contains(&row_index);
        let next = self.highlighted.contains(&(row_index + 1));
        SeparatorState {
            leading_highlighted: current || previous,
            trailing_highlighted: current || next,
        }
    }
}

impl<V> VirtualList<V> for EagerList<V> {
    fn render(&mut self, request: &ListRequest<'_>, render_row: &mut RowRenderer<'_, V>) {
        self.options = request.options.clone();
        self.list_style = request.list_style.clone();
        let rows = (0..request.row_count())
            .map(|row_index| render_row(row_index, self.separators_for(row_index)))
            .collect();
        self.rows = rows;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlight_marks_neighbouring_separators() {
        let mut list: EagerList<()> = EagerList::new();
        list.highlight_row(2);

        assert_eq!(list.separators_for(0), SeparatorState::default());
        assert_eq!(
            list.separators_for(1),
            SeparatorState {
                leading_highlighted: false,
                trailing_highlighted: true,
            }
        );
        assert_eq!(
            list.separators_for(2),
            SeparatorState {
                leading_highlighted: true,
                trailing_highlighted: true,
            }
        );
        assert!(list.separators_for(3).leading_highlighted);

        list.unhighlight_row(2);
        assert_eq!(list.separators_for(2), SeparatorState::default());
    }
}
