use std::collections::HashMap;
use std::io::Write;
use std::ops::Range;

use blake3::Hash;
use unicode_width::UnicodeWidthChar;

use crate::display_width;
use crate::error::Result;
use crate::geometry::{Orientation, Rect};
use crate::layout::LayoutResult;
use crate::view::{ListRequest, RowRenderer, SeparatorState, VirtualList};

/// Terminal list parameters.
#[derive(Debug, Clone)]
pub struct RendererSettings {
    /// Area of the terminal the list may draw into.
    pub viewport: Rect,
    /// Main-axis cells given to every row.
    pub row_extent: u16,
    pub restore_cursor: Option<(u16, u16)>,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            viewport: Rect::new(0, 0, 80, 24),
            row_extent: 3,
            restore_cursor: None,
        }
    }
}

/// A [`VirtualList`] that draws grid cells into a terminal with ANSI escapes.
///
/// Only rows that fit in the viewport are materialised. Output accumulates in
/// an internal buffer until [`TerminalList::flush`]; cells whose position and
/// content are unchanged since the previous pass are not re-emitted.
pub struct TerminalList {
    settings: RendererSettings,
    first_row: usize,
    visible: Range<usize>,
    buffer: String,
    cells: HashMap<String, (Rect, Hash)>,
    last_layout: Option<LayoutResult>,
}

impl TerminalList {
    pub fn new(settings: RendererSettings) -> Self {
        Self {
            settings,
            first_row: 0,
            visible: 0..0,
            buffer: String::new(),
            cells: HashMap::new(),
            last_layout: None,
        }
    }

    pub fn with_default() -> Self {
        Self::new(RendererSettings::default())
    }

    pub fn settings(&self) -> &RendererSettings {
        &self.settings
    }

    /// Change the drawable area; forces a full repaint on the next pass.
    pub fn set_viewport(&mut self, viewport: Rect) {
        if self.settings.viewport != viewport {
            self.settings.viewport = viewport;
            self.last_layout = None;
        }
    }

    pub fn set_restore_cursor(&mut self, cursor: Option<(u16, u16)>) {
        self.settings.restore_cursor = cursor;
    }

    pub fn scroll_to(&mut self, row: usize) {
        self.first_row = row;
    }

    pub fn scroll_by(&mut self, delta: isize) {
        self.first_row = self.first_row.saturating_add_signed(delta);
    }

    pub fn first_row(&self) -> usize {
        self.first_row
    }

    /// Rows materialised by the last pass.
    pub fn visible_rows(&self) -> Range<usize> {
        self.visible.clone()
    }

    /// Pending escape output not yet flushed.
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    pub fn flush(&mut self, writer: &mut impl Write) -> Result<()> {
        writer.write_all(self.buffer.as_bytes())?;
        self.buffer.clear();
        if let Some((row, col)) = self.settings.restore_cursor {
            write!(writer, "{}", move_to(row + 1, col + 1))?;
        }
        writer.flush()?;
        Ok(())
    }

    fn paint(&mut self, rect: Rect, content: &str) {
        let mut lines = wrap_to_width(content, rect.width);
        lines.resize(rect.height as usize, String::new());

        for (offset, line) in lines.iter_mut().enumerate() {
            pad_line(line, rect.width);
            self.buffer
                .push_str(&move_to(rect.y + offset as u16 + 1, rect.x + 1));
            self.buffer.push_str(line);
        }
    }

    fn blank(&mut self, rect: Rect) {
        self.paint(rect, "");
    }
}

impl<V> VirtualList<V> for TerminalList
where
    V: AsRef<str>,
{
    fn render(&mut self, request: &ListRequest<'_>, render_row: &mut RowRenderer<'_, V>) {
        if self.last_layout != Some(request.layout) {
            self.buffer.push_str("\x1b[2J");
            self.cells.clear();
            self.last_layout = Some(request.layout);
        }

        let row_count = request.row_count();
        let first = self.first_row.min(row_count.saturating_sub(1));
        self.first_row = first;

        let viewport = self.settings.viewport;
        let row_extent = self.settings.row_extent;
        let axes = Axes(request.orientation);
        let main_extent = f32::from(axes.main_of(viewport.height, viewport.width));
        let main_leading = axes.main_leading(&request.list_style.padding);

        let mut main_cursor = main_leading;
        let mut painted: Vec<(String, Rect, String)> = Vec::new();
        let mut end = first;

        for row_index in first..row_count {
            if main_cursor + f32::from(row_extent) > main_extent {
                break;
            }
            let row = render_row(row_index, SeparatorState::default());
            let item_cross = axes
                .item_cross(&row.item_style)
                .unwrap_or(request.layout.item_size);
            let item_gap = axes.cross_trailing(&row.item_style.margin);
            let mut cross_cursor = axes.cross_leading(&row.style.padding);

            for item in &row.items {
                let main = cells(main_cursor);
                let cross = cells(cross_cursor);
                let span = cells(item_cross);
                let rect = match request.orientation {
                    Orientation::Vertical => Rect::new(
                        viewport.x.saturating_add(cross),
                        viewport.y.saturating_add(main),
                        span,
                        row_extent,
                    ),
                    Orientation::Horizontal => Rect::new(
                        viewport.x.saturating_add(main),
                        viewport.y.saturating_add(cross),
                        row_extent,
                        span,
                    ),
                }
                .clipped_to(&viewport);

                if !rect.is_empty() {
                    painted.push((
                        format!("{}/{}", row.key, item.key),
                        rect,
                        item.output.as_ref().to_string(),
                    ));
                }
                cross_cursor += item_cross + item_gap;
            }

            main_cursor += f32::from(row_extent) + axes.main_trailing(&row.style.padding);
            end = row_index + 1;
        }
        self.visible = first..end;

        let mut next = HashMap::with_capacity(painted.len());
        for (key, rect, content) in &painted {
            next.insert(key.clone(), (*rect, content_hash(*rect, content)));
        }

        let stale: Vec<Rect> = self
            .cells
            .iter()
            .filter(|(key, (rect, _))| {
                next.get(*key)
                    .map(|(next_rect, _)| next_rect != rect)
                    .unwrap_or(true)
            })
            .map(|(_, (rect, _))| *rect)
            .collect();
        for rect in stale {
            self.blank(rect);
        }

        for (key, rect, content) in &painted {
            let unchanged = match (self.cells.get(key), next.get(key)) {
                (Some(previous), Some(current)) => previous == current,
                _ => false,
            };
            if !unchanged {
                self.paint(*rect, content);
            }
        }
        self.cells = next;
    }
}

/// Maps the grid's main/cross axes onto terminal x/y.
#[derive(Clone, Copy)]
struct Axes(Orientation);

impl Axes {
    fn main_of(self, height: u16, width: u16) -> u16 {
        match self.0 {
            Orientation::Vertical => height,
            Orientation::Horizontal => width,
        }
    }

    fn main_leading(self, edges: &crate::geometry::Edges) -> f32 {
        match self.0 {
            Orientation::Vertical => edges.top,
            Orientation::Horizontal => edges.left,
        }
        .unwrap_or(0.0)
    }

    fn main_trailing(self, edges: &crate::geometry::Edges) -> f32 {
        match self.0 {
            Orientation::Vertical => edges.bottom,
            Orientation::Horizontal => edges.right,
        }
        .unwrap_or(0.0)
    }

    fn cross_leading(self, edges: &crate::geometry::Edges) -> f32 {
        match self.0 {
            Orientation::Vertical => edges.left,
            Orientation::Horizontal => edges.top,
        }
        .unwrap_or(0.0)
    }

    fn cross_trailing(self, edges: &crate::geometry::Edges) -> f32 {
        match self.0 {
            Orientation::Vertical => edges.right,
            Orientation::Horizontal => edges.bottom,
        }
        .unwrap_or(0.0)
    }

    fn item_cross(self, style: &crate::layout::Style) -> Option<f32> {
        match self.0 {
            Orientation::Vertical => style.width,
            Orientation::Horizontal => style.height,
        }
    }
}

fn cells(value: f32) -> u16 {
    value.round().clamp(0.0, f32::from(u16::MAX)) as u16
}

fn content_hash(rect: Rect, content: &str) -> Hash {
    let mut hasher = blake3::Hasher::new();
    for value in [rect.x, rect.y, rect.width, rect.height] {
        hasher.update(&value.to_le_bytes());
    }
    hasher.update(content.as_bytes());
    hasher.finalize()
}

fn move_to(row: u16, column: u16) -> String {
    format!("\x1b[{row};{column}H")
}

fn wrap_to_width(content: &str, width: u16) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }

    let clean = strip_ansi_escapes::strip(content);
    let clean = String::from_utf8_lossy(&clean);
    let limit = width as usize;
    let mut lines = Vec::new();

    for raw in clean.split('\n') {
        let mut current = String::new();
        let mut used = 0usize;
        for ch in raw.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if ch_width > limit {
                // Wider than the cell; drop it.
                continue;
            }
            if used + ch_width > limit {
                lines.push(std::mem::take(&mut current));
                used = 0;
                if ch == ' ' {
                    continue;
                }
            }
            current.push(ch);
            used += ch_width;
        }
        lines.push(current);
    }

    lines
}

fn pad_line(line: &mut String, width: u16) {
    let target = width as usize;
    while display_width(line) > target {
        line.pop();
    }
    let display = display_width(line);
    line.extend(std::iter::repeat_n(' ', target - display));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ListOptions;
    use crate::geometry::Edges;
    use crate::layout::Style;
    use crate::view::{RenderedItem, RenderedRow};

    #[test]
    fn wrap_basic() {
        let lines = wrap_to_width("hello world", 5);
        assert_eq!(lines, vec!["hello".to_string(), "world".to_string()]);
    }

    #[test]
    fn pad_line_fills_and_truncates() {
        let mut short = "ab".to_string();
        pad_line(&mut short, 4);
        assert_eq!(short, "ab  ");

        let mut long = "abcdef".to_string();
        pad_line(&mut long, 3);
        assert_eq!(long, "abc");
    }

    fn layout() -> LayoutResult {
        LayoutResult {
            items_per_row: 2,
            item_size: 4.0,
            inter_item_spacing: 1.0,
            container_size: 11.0,
        }
    }

    fn row_style() -> Style {
        Style {
            padding: Edges {
                left: Some(1.0),
                bottom: Some(1.0),
                ..Edges::default()
            },
            ..Style::default()
        }
    }

    fn item_style() -> Style {
        Style {
            width: Some(4.0),
            margin: Edges {
                right: Some(1.0),
                ..Edges::default()
            },
            ..Style::default()
        }
    }

    fn render_pass(list: &mut TerminalList, labels: &[&str], rows: usize) -> Vec<usize> {
        let keys: Vec<String> = (0..rows).map(|i| format!("row_{i}")).collect();
        let list_style = Style {
            padding: Edges {
                top: Some(1.0),
                ..Edges::default()
            },
            ..Style::default()
        };
        let options = ListOptions::new();
        let request = ListRequest {
            orientation: Orientation::Vertical,
            layout: layout(),
            row_keys: &keys,
            list_style: &list_style,
            content_container_style: None,
            options: &options,
        };
        let mut requested = Vec::new();
        list.render(&request, &mut |row_index, _| {
            requested.push(row_index);
            RenderedRow {
                key: format!("row_{row_index}"),
                row_index,
                style: row_style(),
                item_style: item_style(),
                items: (0..2)
                    .map(|i| RenderedItem {
                        key: format!("item_{}", row_index * 2 + i),
                        index: row_index * 2 + i,
                        output: labels[(row_index * 2 + i) % labels.len()].to_string(),
                    })
                    .collect(),
            }
        });
        requested
    }

    #[test]
    fn paints_cells_at_styled_offsets() {
        let mut list = TerminalList::new(RendererSettings {
            viewport: Rect::new(0, 0, 11, 20),
            row_extent: 2,
            restore_cursor: None,
        });
        render_pass(&mut list, &["ab", "cd"], 2);

        let output = list.pending().to_string();
        assert!(output.starts_with("\u{1b}[2J"));
        // Row 0 starts below the leading padding, first cell after the left gap.
        assert!(output.contains("\u{1b}[2;2Hab  "));
        assert!(output.contains("\u{1b}[2;7Hcd  "));
        // Row 1 sits one row extent plus one gap further down.
        assert!(output.contains("\u{1b}[5;2Hab  "));
    }

    #[test]
    fn only_rows_that_fit_are_materialised() {
        let mut list = TerminalList::new(RendererSettings {
            viewport: Rect::new(0, 0, 11, 7),
            row_extent: 2,
            restore_cursor: None,
        });
        let requested = render_pass(&mut list, &["x"], 10);
        assert_eq!(requested, vec![0, 1]);
        assert_eq!(list.visible_rows(), 0..2);

        list.scroll_to(8);
        let requested = render_pass(&mut list, &["x"], 10);
        assert_eq!(requested, vec![8, 9]);

        list.scroll_to(50);
        render_pass(&mut list, &["x"], 10);
        assert_eq!(list.first_row(), 9);
    }

    #[test]
    fn unchanged_cells_are_not_repainted() {
        let mut list = TerminalList::new(RendererSettings {
            viewport: Rect::new(0, 0, 11, 20),
            row_extent: 2,
            restore_cursor: None,
        });
        render_pass(&mut list, &["ab"], 1);
        let mut sink = Vec::new();
        list.flush(&mut sink).unwrap();
        assert!(!sink.is_empty());

        render_pass(&mut list, &["ab"], 1);
        assert!(list.pending().is_empty());

        render_pass(&mut list, &["zz"], 1);
        assert!(list.pending().contains("zz"));
        assert!(!list.pending().contains("\u{1b}[2J"));
    }

    #[test]
    fn flush_restores_cursor() {
        let mut list = TerminalList::with_default();
        list.set_restore_cursor(Some((4, 9)));
        let mut sink = Vec::new();
        list.flush(&mut sink).unwrap();
        assert_eq!(String::from_utf8(sink).unwrap(), "\u{1b}[5;10H");
    }
}
