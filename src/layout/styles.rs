//! Spacing styles for grid rows and item containers.
//!
//! The grid never draws anything itself; it hands these styles to whatever
//! list widget hosts it. Every rule is expressed for a vertical grid and
//! mirrored onto the other axis for horizontal grids.

use serde::{Deserialize, Serialize};

use crate::geometry::{Edges, Orientation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlexDirection {
    Row,
    Column,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Justify {
    Start,
    Center,
    End,
}

/// Box style handed to the list widget. Unset fields inherit from whatever
/// the style is layered on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub direction: Option<FlexDirection>,
    pub justify: Option<Justify>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub padding: Edges,
    pub margin: Edges,
    pub border: Edges,
}

impl Style {
    /// Layer `other` on top of `self`; fields set in `other` win.
    pub fn merged(&self, other: &Style) -> Style {
        Style {
            direction: other.direction.or(self.direction),
            justify: other.justify.or(self.justify),
            width: other.width.or(self.width),
            height: other.height.or(self.height),
            padding: self.padding.merged(&other.padding),
            margin: self.margin.merged(&other.margin),
            border: self.border.merged(&other.border),
        }
    }

    /// Padding, margin and border consumed along the grid's cross axis.
    pub fn cross_insets(&self, orientation: Orientation) -> f32 {
        let pick = |edges: &Edges| match orientation {
            Orientation::Vertical => edges.horizontal(),
            Orientation::Horizontal => edges.vertical(),
        };
        pick(&self.padding) + pick(&self.margin) + pick(&self.border)
    }
}

/// Inputs to [`generate_styles`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleInputs {
    pub orientation: Orientation,
    pub item_target_size: f32,
    /// Size computed by the dimension calculator.
    pub item_size: f32,
    /// Configured spacing; used between rows and at the grid's edges.
    pub spacing: f32,
    /// Cross-axis gap from the layout result (margin share in fixed mode).
    pub inter_item_spacing: f32,
    pub fixed: bool,
}

/// Styles for one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GridStyles {
    pub row: Style,
    pub item_container: Style,
    /// Leading gap applied by the list before the first row.
    pub list_content: Style,
    /// Extra trailing margin layered onto the final row.
    pub last_row: Style,
}

pub fn generate_styles(inputs: &StyleInputs) -> GridStyles {
    let item_extent = if inputs.fixed {
        inputs.item_target_size
    } else {
        inputs.item_size
    };
    let gap = inputs.inter_item_spacing;
    let spacing = inputs.spacing;

    match inputs.orientation {
        Orientation::Vertical => GridStyles {
            row: Style {
                direction: Some(FlexDirection::Row),
                padding: Edges {
                    left: Some(gap),
                    bottom: Some(spacing),
                    ..Edges::default()
                },
                ..Style::default()
            },
            item_container: Style {
                direction: Some(FlexDirection::Column),
                justify: Some(Justify::Center),
                width: Some(item_extent),
                margin: Edges {
                    right: Some(gap),
                    ..Edges::default()
                },
                ..Style::default()
            },
            list_content: Style {
                padding: Edges {
                    top: Some(spacing),
                    ..Edges::default()
                },
                ..Style::default()
            },
            last_row: Style {
                margin: Edges {
                    bottom: Some(spacing),
                    ..Edges::default()
                },
                ..Style::default()
            },
        },
        Orientation::Horizontal => GridStyles {
            row: Style {
                direction: Some(FlexDirection::Column),
                padding: Edges {
                    top: Some(gap),
                    right: Some(spacing),
                    ..Edges::default()
                },
                ..Style::default()
            },
            item_container: Style {
                direction: Some(FlexDirection::Row),
                justify: Some(Justify::Center),
                height: Some(item_extent),
                margin: Edges {
                    bottom: Some(gap),
                    ..Edges::default()
                },
                ..Style::default()
            },
            list_content: Style {
                padding: Edges {
                    left: Some(spacing),
                    ..Edges::default()
                },
                ..Style::default()
            },
            last_row: Style {
                margin: Edges {
                    right: Some(spacing),
                    ..Edges::default()
                },
                ..Style::default()
            },
        },
    }
}

/// Shrinks a measured extent to the space the grid can actually use.
pub trait SizeAdjustment {
    fn adjust(&self, orientation: Orientation, total: f32) -> f32;
}

impl<F> SizeAdjustment for F
where
    F: Fn(Orientation, f32) -> f32,
{
    fn adjust(&self, orientation: Orientation, total: f32) -> f32 {
        self(orientation, total)
    }
}

/// Subtracts cross-axis padding, margin and border of the listed styles.
#[derive(Debug, Clone, Default)]
pub struct StyleInsetAdjustment {
    styles: Vec<Style>,
}

impl StyleInsetAdjustment {
    pub fn new(styles: impl IntoIterator<Item = Style>) -> Self {
        Self {
            styles: styles.into_iter().collect(),
        }
    }
}

impl SizeAdjustment for StyleInsetAdjustment {
    fn adjust(&self, orientation: Orientation, total: f32) -> f32 {
        let insets: f32 = self
            .styles
            .iter()
            .map(|style| style.cross_insets(orientation))
            .sum();
        total - insets
    }
}

/// Cap `total` at `max_size`, then run the optional style adjustment.
pub fn adjusted_total_size(
    total: f32,
    max_size: Option<f32>,
    orientation: Orientation,
    adjustment: Option<&dyn SizeAdjustment>,
) -> f32 {
    let capped = match max_size {
        Some(max) if max > 0.0 && total > max => max,
        _ => total,
    };
    match adjustment {
        Some(adjustment) => adjustment.adjust(orientation, capped),
        None => capped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(orientation: Orientation, fixed: bool) -> StyleInputs {
        StyleInputs {
            orientation,
            item_target_size: 100.0,
            item_size: 96.0,
            spacing: 10.0,
            inter_item_spacing: if fixed { 7.5 } else { 10.0 },
            fixed,
        }
    }

    #[test]
    fn vertical_styles_pad_left_and_below() {
        let styles = generate_styles(&inputs(Orientation::Vertical, false));
        assert_eq!(styles.row.direction, Some(FlexDirection::Row));
        assert_eq!(styles.row.padding.left, Some(10.0));
        assert_eq!(styles.row.padding.bottom, Some(10.0));
        assert_eq!(styles.item_container.width, Some(96.0));
        assert_eq!(styles.item_container.margin.right, Some(10.0));
        assert_eq!(styles.list_content.padding.top, Some(10.0));
        assert_eq!(styles.last_row.margin.bottom, Some(10.0));
    }

    #[test]
    fn fixed_mode_uses_target_size_and_margin_share() {
        let styles = generate_styles(&inputs(Orientation::Vertical, true));
        assert_eq!(styles.item_container.width, Some(100.0));
        assert_eq!(styles.item_container.margin.right, Some(7.5));
        assert_eq!(styles.row.padding.left, Some(7.5));
        assert_eq!(styles.row.padding.bottom, Some(10.0));
    }

    #[test]
    fn horizontal_styles_flip_axes() {
        let styles = generate_styles(&inputs(Orientation::Horizontal, false));
        assert_eq!(styles.row.direction, Some(FlexDirection::Column));
        assert_eq!(styles.row.padding.top, Some(10.0));
        assert_eq!(styles.row.padding.right, Some(10.0));
        assert_eq!(styles.item_container.height, Some(96.0));
        assert_eq!(styles.item_container.width, None);
        assert_eq!(styles.list_content.padding.left, Some(10.0));
        assert_eq!(styles.last_row.margin.right, Some(10.0));
    }

    #[test]
    fn merged_style_overrides_only_set_fields() {
        let styles = generate_styles(&inputs(Orientation::Vertical, false));
        let patch = Style {
            justify: Some(Justify::Start),
            margin: Edges {
                top: Some(2.0),
                ..Edges::default()
            },
            ..Style::default()
        };
        let merged = styles.item_container.merged(&patch);
        assert_eq!(merged.justify, Some(Justify::Start));
        assert_eq!(merged.width, Some(96.0));
        assert_eq!(merged.margin.right, Some(10.0));
        assert_eq!(merged.margin.top, Some(2.0));
    }

    #[test]
    fn adjusted_size_caps_then_subtracts_insets() {
        let adjustment = StyleInsetAdjustment::new([
            Style {
                padding: Edges::symmetric(50.0, 8.0),
                ..Style::default()
            },
            Style {
                margin: Edges {
                    left: Some(4.0),
                    ..Edges::default()
                },
                border: Edges::all(1.0),
                ..Style::default()
            },
        ]);
        let size = adjusted_total_size(
            1200.0,
            Some(800.0),
            Orientation::Vertical,
            Some(&adjustment),
        );
        assert_eq!(size, 800.0 - 16.0 - 4.0 - 2.0);

        let horizontal =
            adjusted_total_size(600.0, None, Orientation::Horizontal, Some(&adjustment));
        assert_eq!(horizontal, 600.0 - 100.0 - 2.0);
    }

    #[test]
    fn closures_act_as_adjustments() {
        let halve = |_: Orientation, total: f32| total / 2.0;
        assert_eq!(
            adjusted_total_size(400.0, None, Orientation::Vertical, Some(&halve)),
            200.0
        );
        assert_eq!(
            adjusted_total_size(400.0, Some(500.0), Orientation::Vertical, None),
            400.0
        );
    }
}
