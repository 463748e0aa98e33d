//! The grid component: measurement state plus the per-render pipeline.
//!
//! A [`GridView`] owns nothing but its measured container size. Every render
//! recomputes the layout from that size, groups the caller's items into rows
//! and hands them to a [`VirtualList`], which calls back for each row it
//! materialises.

mod list;

pub use list::{
    EagerList, ListRequest, RenderedItem, RenderedRow, RowRenderer, SeparatorState, VirtualList,
};

use std::sync::{Arc, Mutex};

use serde_json::json;

use crate::config::GridConfig;
use crate::layout::{
    GridStyles, LayoutResult, RowEntry, SizeAdjustment, StyleInputs, adjusted_total_size,
    calculate_dimensions, chunk_indexed, generate_styles, invert_rows,
};
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::GridMetrics;
use crate::platform::WindowMetrics;

const LOG_TARGET: &str = "flat_grid::view";

/// Arguments handed to the caller's item renderer.
#[derive(Debug)]
pub struct ItemContext<'a, T> {
    pub item: &'a T,
    /// Position of the item in the input sequence.
    pub index: usize,
    pub row_index: usize,
    pub separators: SeparatorState,
}

/// Layout notification delivered by the host when the grid's frame changes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutEvent {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl LayoutEvent {
    pub fn sized(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}

/// Measurement lifecycle of the container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measurement {
    /// No layout event yet; `seed` came from the static size or the window.
    Unmeasured { seed: f32 },
    Measured(f32),
}

impl Measurement {
    pub fn size(&self) -> f32 {
        match *self {
            Measurement::Unmeasured { seed } => seed,
            Measurement::Measured(size) => size,
        }
    }

    pub fn is_measured(&self) -> bool {
        matches!(self, Measurement::Measured(_))
    }
}

/// Result of handling a layout notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeasureOutcome {
    /// The size changed; the host should render again with this layout.
    Changed(LayoutResult),
    Unchanged,
    /// The adjusted size was not positive and was discarded.
    Ignored,
}

/// Summary of one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GridFrame {
    pub layout: LayoutResult,
    pub styles: GridStyles,
    pub row_keys: Vec<String>,
    pub item_count: usize,
}

impl GridFrame {
    pub fn row_count(&self) -> usize {
        self.row_keys.len()
    }

    /// Content hash of the layout and row keys. Identical inputs give
    /// identical fingerprints, so hosts can skip redundant work.
    pub fn fingerprint(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(self.layout.items_per_row as u64).to_le_bytes());
        hasher.update(&self.layout.item_size.to_bits().to_le_bytes());
        hasher.update(&self.layout.inter_item_spacing.to_bits().to_le_bytes());
        hasher.update(&self.layout.container_size.to_bits().to_le_bytes());
        hasher.update(&(self.item_count as u64).to_le_bytes());
        for key in &self.row_keys {
            hasher.update(key.as_bytes());
            hasher.update(&[0]);
        }
        hasher.finalize()
    }
}

type RenderItemFn<T, V> = Box<dyn FnMut(ItemContext<'_, T>) -> V>;
type KeyFn<T> = Box<dyn Fn(&T, usize) -> String>;
type LayoutCallback = Box<dyn FnMut(&LayoutEvent)>;

/// Responsive grid wrapping a [`VirtualList`].
pub struct GridView<T, V> {
    config: GridConfig,
    measurement: Measurement,
    render_item: RenderItemFn<T, V>,
    key_fn: Option<KeyFn<T>>,
    on_layout: Option<LayoutCallback>,
    size_adjustment: Option<Box<dyn SizeAdjustment>>,
    logger: Option<Logger>,
    metrics: Option<Arc<Mutex<GridMetrics>>>,
}

impl<T, V> GridView<T, V> {
    pub fn builder<F>(config: GridConfig, render_item: F) -> GridViewBuilder<T, V>
    where
        F: FnMut(ItemContext<'_, T>) -> V + 'static,
    {
        GridViewBuilder {
            config,
            render_item: Box::new(render_item),
            key_fn: None,
            on_layout: None,
            size_adjustment: None,
            logger: None,
            metrics: None,
        }
    }

    /// Mount with default collaborators.
    pub fn mount<F>(config: GridConfig, window: &dyn WindowMetrics, render_item: F) -> Self
    where
        F: FnMut(ItemContext<'_, T>) -> V + 'static,
    {
        Self::builder(config, render_item).mount(window)
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Replace the configuration and return the layout it produces.
    pub fn set_config(&mut self, config: GridConfig) -> LayoutResult {
        self.config = config;
        self.layout()
    }

    pub fn measurement(&self) -> Measurement {
        self.measurement
    }

    /// Extent the layout is computed against; a static size always wins.
    pub fn container_size(&self) -> f32 {
        match self.config.static_size {
            Some(size) if size > 0.0 => size,
            _ => self.measurement.size(),
        }
    }

    pub fn layout(&self) -> LayoutResult {
        calculate_dimensions(
            self.config.item_target_size,
            self.container_size(),
            self.config.spacing,
            self.config.fixed,
            self.config.max_items_per_row,
        )
    }

    /// Handle a layout notification from the host.
    ///
    /// The caller's layout callback always receives the raw event, whatever
    /// the outcome.
    pub fn on_layout(&mut self, event: &LayoutEvent) -> MeasureOutcome {
        let raw = self
            .config
            .orientation
            .cross_extent(event.width, event.height);
        let adjusted = self.adjusted_size(raw);
        let current = self.container_size();

        // A static size keeps winning; the measurement is still tracked so
        // clearing it later falls back to the real extent.
        let outcome = if !(adjusted > 0.0) {
            MeasureOutcome::Ignored
        } else {
            self.measurement = Measurement::Measured(adjusted);
            if self.container_size() != current {
                MeasureOutcome::Changed(self.layout())
            } else {
                MeasureOutcome::Unchanged
            }
        };

        self.record_layout_metric(&outcome);
        match outcome {
            MeasureOutcome::Changed(layout) => self.log(
                LogLevel::Debug,
                "layout_changed",
                [
                    json_kv("previous", json!(current)),
                    json_kv("size", json!(adjusted)),
                    json_kv("items_per_row", json!(layout.items_per_row)),
                ],
            ),
            MeasureOutcome::Ignored => self.log(
                LogLevel::Trace,
                "layout_ignored",
                [json_kv("size", json!(adjusted))],
            ),
            MeasureOutcome::Unchanged => {}
        }

        if let Some(callback) = self.on_layout.as_mut() {
            callback(event);
        }
        outcome
    }

    /// Run one render pass over `items` through `list`.
    pub fn render(&mut self, items: &[T], list: &mut dyn VirtualList<V>) -> GridFrame {
        let layout = self.layout();
        let mut rows = chunk_indexed(items, layout.items_per_row);
        if self.config.inverted_row {
            invert_rows(&mut rows);
        }

        let generated = generate_styles(&StyleInputs {
            orientation: self.config.orientation,
            item_target_size: self.config.item_target_size,
            item_size: layout.item_size,
            spacing: self.config.spacing,
            inter_item_spacing: layout.inter_item_spacing,
            fixed: self.config.fixed,
        });
        let styles = self.resolve_styles(generated);
        let row_keys: Vec<String> = rows
            .iter()
            .enumerate()
            .map(|(row_index, row)| row_key(self.key_fn.as_deref(), row_index, row))
            .collect();

        let request = ListRequest {
            orientation: self.config.orientation,
            layout,
            row_keys: &row_keys,
            list_style: &styles.list_content,
            content_container_style: self.config.content_container_style.as_ref(),
            options: &self.config.list_options,
        };

        let last_row = rows.len().saturating_sub(1);
        let last_row_style = styles.row.merged(&styles.last_row);
        let key_fn = self.key_fn.as_deref();
        let render_item = &mut self.render_item;
        let mut rows_rendered = 0usize;
        let mut items_rendered = 0usize;

        list.render(&request, &mut |row_index, separators| {
            let row = rows.get(row_index).map(Vec::as_slice).unwrap_or(&[]);
            let rendered_items: Vec<RenderedItem<V>> = row
                .iter()
                .enumerate()
                .map(|(position, entry)| RenderedItem {
                    key: item_key(key_fn, entry, position),
                    index: entry.index,
                    output: render_item(ItemContext {
                        item: entry.item,
                        index: entry.index,
                        row_index,
                        separators,
                    }),
                })
                .collect();
            rows_rendered += 1;
            items_rendered += rendered_items.len();

            RenderedRow {
                key: row_keys.get(row_index).cloned().unwrap_or_default(),
                row_index,
                style: if row_index == last_row {
                    last_row_style.clone()
                } else {
                    styles.row.clone()
                },
                item_style: styles.item_container.clone(),
                items: rendered_items,
            }
        });

        if let Some(metrics) = self.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                guard.record_render(rows_rendered, items_rendered);
            }
        }
        self.log(
            LogLevel::Trace,
            "frame_rendered",
            [
                json_kv("rows", json!(row_keys.len())),
                json_kv("rows_rendered", json!(rows_rendered)),
                json_kv("items_rendered", json!(items_rendered)),
            ],
        );

        GridFrame {
            layout,
            styles,
            row_keys,
            item_count: items.len(),
        }
    }

    /// Layer the configured overrides over the generated styles.
    ///
    /// A `row_style` override also wins over the trailing margin of the last
    /// row, so a caller-set `margin.bottom` survives on every row.
    fn resolve_styles(&self, generated: GridStyles) -> GridStyles {
        let GridStyles {
            row,
            item_container,
            list_content,
            last_row,
        } = generated;
        let (row, last_row) = match self.config.row_style.as_ref() {
            Some(style) => (row.merged(style), last_row.merged(style)),
            None => (row, last_row),
        };
        GridStyles {
            row,
            item_container: match self.config.item_container_style.as_ref() {
                Some(style) => item_container.merged(style),
                None => item_container,
            },
            list_content: match self.config.list_style.as_ref() {
                Some(style) => list_content.merged(style),
                None => list_content,
            },
            last_row,
        }
    }

    fn adjusted_size(&self, raw: f32) -> f32 {
        let orientation = self.config.orientation;
        let max_size = self.config.max_size;
        if !self.config.adjust_to_styles {
            return adjusted_total_size(raw, max_size, orientation, None);
        }
        match self.size_adjustment.as_deref() {
            Some(custom) => adjusted_total_size(raw, max_size, orientation, Some(custom)),
            None => {
                let from_styles = self.config.style_adjustment();
                adjusted_total_size(raw, max_size, orientation, Some(&from_styles))
            }
        }
    }

    fn record_layout_metric(&self, outcome: &MeasureOutcome) {
        if let Some(metrics) = self.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                guard.record_layout_event(
                    matches!(outcome, MeasureOutcome::Changed(_)),
                    matches!(outcome, MeasureOutcome::Ignored),
                );
            }
        }
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.logger.as_ref() {
            let event = event_with_fields(level, LOG_TARGET, message, fields);
            let _ = logger.log_event(event);
        }
    }
}

fn row_key<T>(
    key_fn: Option<&dyn Fn(&T, usize) -> String>,
    row_index: usize,
    row: &[RowEntry<'_, T>],
) -> String {
    match key_fn {
        Some(key_fn) => row
            .iter()
            .enumerate()
            .map(|(position, entry)| key_fn(entry.item, position))
            .collect::<Vec<_>>()
            .join("_"),
        None => format!("row_{row_index}"),
    }
}

fn item_key<T>(
    key_fn: Option<&dyn Fn(&T, usize) -> String>,
    entry: &RowEntry<'_, T>,
    position: usize,
) -> String {
    match key_fn {
        Some(key_fn) => key_fn(entry.item, position),
        None => format!("item_{}", entry.index),
    }
}

/// Optional collaborators for a [`GridView`], resolved at mount.
pub struct GridViewBuilder<T, V> {
    config: GridConfig,
    render_item: RenderItemFn<T, V>,
    key_fn: Option<KeyFn<T>>,
    on_layout: Option<LayoutCallback>,
    size_adjustment: Option<Box<dyn SizeAdjustment>>,
    logger: Option<Logger>,
    metrics: Option<Arc<Mutex<GridMetrics>>>,
}

impl<T, V> GridViewBuilder<T, V> {
    /// Derive item keys; row keys join the keys of their items with `_`.
    pub fn key_fn<F>(mut self, key_fn: F) -> Self
    where
        F: Fn(&T, usize) -> String + 'static,
    {
        self.key_fn = Some(Box::new(key_fn));
        self
    }

    pub fn on_layout<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&LayoutEvent) + 'static,
    {
        self.on_layout = Some(Box::new(callback));
        self
    }

    /// Replace the style-derived adjustment used when `adjust_to_styles` is set.
    pub fn size_adjustment<A>(mut self, adjustment: A) -> Self
    where
        A: SizeAdjustment + 'static,
    {
        self.size_adjustment = Some(Box::new(adjustment));
        self
    }

    pub fn logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn metrics(mut self, metrics: Arc<Mutex<GridMetrics>>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Seed the container size and produce the component.
    pub fn mount(self, window: &dyn WindowMetrics) -> GridView<T, V> {
        let mut view = GridView {
            config: self.config,
            measurement: Measurement::Unmeasured { seed: 0.0 },
            render_item: self.render_item,
            key_fn: self.key_fn,
            on_layout: self.on_layout,
            size_adjustment: self.size_adjustment,
            logger: self.logger,
            metrics: self.metrics,
        };

        let seed = match view.config.static_size {
            Some(size) if size > 0.0 => size,
            _ => {
                let raw = window
                    .window_size()
                    .map(|size| {
                        view.config
                            .orientation
                            .cross_extent(f32::from(size.width), f32::from(size.height))
                    })
                    .unwrap_or(0.0);
                view.adjusted_size(raw).max(0.0)
            }
        };
        view.measurement = Measurement::Unmeasured { seed };

        let layout = view.layout();
        view.log(
            LogLevel::Info,
            "grid_mounted",
            [
                json_kv("seed", json!(seed)),
                json_kv("items_per_row", json!(layout.items_per_row)),
                json_kv("static", json!(view.config.static_size.is_some())),
            ],
        );
        view
    }
}
