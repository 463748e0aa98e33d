use serde::{Deserialize, Serialize};

/// Integer size measured in terminal character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Rectangle anchored within the terminal grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Portion of `self` inside `bounds`; empty when they do not overlap.
    pub fn clipped_to(&self, bounds: &Rect) -> Rect {
        let x = self.x.max(bounds.x);
        let y = self.y.max(bounds.y);
        let right = self.right().min(bounds.right());
        let bottom = self.bottom().min(bounds.bottom());
        Rect::new(x, y, right.saturating_sub(x), bottom.saturating_sub(y))
    }
}

/// Direction the grid scrolls in.
///
/// A vertical grid stacks rows top to bottom and wraps items across its width;
/// a horizontal grid stacks columns left to right and wraps across its height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

impl Orientation {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Orientation::Horizontal)
    }

    /// Extent along the axis items wrap across (width for vertical grids).
    pub fn cross_extent(self, width: f32, height: f32) -> f32 {
        match self {
            Orientation::Vertical => width,
            Orientation::Horizontal => height,
        }
    }
}

/// Per-side lengths. Unset sides are `None` so overrides can be layered.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Edges {
    pub top: Option<f32>,
    pub right: Option<f32>,
    pub bottom: Option<f32>,
    pub left: Option<f32>,
}

impl Edges {
    pub const fn all(value: f32) -> Self {
        Self {
            top: Some(value),
            right: Some(value),
            bottom: Some(value),
            left: Some(value),
        }
    }

    pub const fn symmetric(vertical: f32, horizontal: f32) -> Self {
        Self {
            top: Some(vertical),
            right: Some(horizontal),
            bottom: Some(vertical),
            left: Some(horizontal),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.right.is_none() && self.bottom.is_none() && self.left.is_none()
    }

    /// Layer `other` on top of `self`; sides set in `other` win.
    pub fn merged(&self, other: &Edges) -> Edges {
        Edges {
            top: other.top.or(self.top),
            right: other.right.or(self.right),
            bottom: other.bottom.or(self.bottom),
            left: other.left.or(self.left),
        }
    }

    /// Sum of both sides along the horizontal axis.
    pub fn horizontal(&self) -> f32 {
        self.left.unwrap_or(0.0) + self.right.unwrap_or(0.0)
    }

    /// Sum of both sides along the vertical axis.
    pub fn vertical(&self) -> f32 {
        self.top.unwrap_or(0.0) + self.bottom.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merged_prefers_override_sides() {
        let base = Edges::all(4.0);
        let patch = Edges {
            left: Some(1.0),
            ..Edges::default()
        };
        let merged = base.merged(&patch);
        assert_eq!(merged.left, Some(1.0));
        assert_eq!(merged.right, Some(4.0));
        assert_eq!(merged.horizontal(), 5.0);
    }

    #[test]
    fn clipping_trims_to_bounds() {
        let bounds = Rect::new(0, 0, 10, 5);
        assert_eq!(Rect::new(8, 3, 6, 6).clipped_to(&bounds), Rect::new(8, 3, 2, 2));
        assert!(Rect::new(12, 0, 3, 3).clipped_to(&bounds).is_empty());
    }

    #[test]
    fn cross_extent_follows_orientation() {
        assert_eq!(Orientation::Vertical.cross_extent(300.0, 800.0), 300.0);
        assert_eq!(Orientation::Horizontal.cross_extent(300.0, 800.0), 800.0);
    }
}
