use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::geometry::Orientation;
use crate::layout::{Style, StyleInsetAdjustment};

/// Options forwarded untouched to the wrapped list widget.
pub type ListOptions = Map<String, Value>;

pub const DEFAULT_ITEM_SIZE: f32 = 120.0;
pub const DEFAULT_SPACING: f32 = 10.0;

/// Declarative grid configuration. Immutable for the duration of a render pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Preferred cross-axis size of each item.
    pub item_target_size: f32,
    /// Gap between items, between rows and at the grid's edges.
    pub spacing: f32,
    /// Keep items at `item_target_size` instead of stretching them.
    pub fixed: bool,
    pub max_items_per_row: Option<usize>,
    pub orientation: Orientation,
    /// Reverse item order inside every row.
    pub inverted_row: bool,
    /// Subtract list padding, margin and border from the measured size.
    pub adjust_to_styles: bool,
    /// Use this extent instead of measuring.
    pub static_size: Option<f32>,
    /// Upper bound for the measured extent.
    pub max_size: Option<f32>,
    pub row_style: Option<Style>,
    pub item_container_style: Option<Style>,
    /// Style of the list itself.
    pub list_style: Option<Style>,
    pub content_container_style: Option<Style>,
    pub list_options: ListOptions,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            item_target_size: DEFAULT_ITEM_SIZE,
            spacing: DEFAULT_SPACING,
            fixed: false,
            max_items_per_row: None,
            orientation: Orientation::Vertical,
            inverted_row: false,
            adjust_to_styles: false,
            static_size: None,
            max_size: None,
            row_style: None,
            item_container_style: None,
            list_style: None,
            content_container_style: None,
            list_options: ListOptions::new(),
        }
    }
}

impl GridConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON, filling omitted keys with defaults.
    pub fn from_json(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn with_item_size(mut self, size: f32) -> Self {
        self.item_target_size = size;
        self
    }

    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn fixed(mut self, fixed: bool) -> Self {
        self.fixed = fixed;
        self
    }

    pub fn with_max_items_per_row(mut self, max: usize) -> Self {
        self.max_items_per_row = Some(max);
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn horizontal(self) -> Self {
        self.with_orientation(Orientation::Horizontal)
    }

    pub fn inverted_row(mut self, inverted: bool) -> Self {
        self.inverted_row = inverted;
        self
    }

    pub fn adjust_to_styles(mut self, adjust: bool) -> Self {
        self.adjust_to_styles = adjust;
        self
    }

    pub fn with_static_size(mut self, size: f32) -> Self {
        self.static_size = Some(size);
        self
    }

    pub fn with_max_size(mut self, size: f32) -> Self {
        self.max_size = Some(size);
        self
    }

    pub fn with_row_style(mut self, style: Style) -> Self {
        self.row_style = Some(style);
        self
    }

    pub fn with_item_container_style(mut self, style: Style) -> Self {
        self.item_container_style = Some(style);
        self
    }

    pub fn with_list_style(mut self, style: Style) -> Self {
        self.list_style = Some(style);
        self
    }

    pub fn with_content_container_style(mut self, style: Style) -> Self {
        self.content_container_style = Some(style);
        self
    }

    pub fn with_list_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.list_options.insert(key.into(), value.into());
        self
    }

    /// Adjustment derived from the configured list and content styles.
    pub fn style_adjustment(&self) -> StyleInsetAdjustment {
        StyleInsetAdjustment::new(
            self.list_style
                .iter()
                .chain(self.content_container_style.iter())
                .cloned(),
        )
    }
}
