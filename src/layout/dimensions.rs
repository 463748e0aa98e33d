use serde::Serialize;

/// Outcome of fitting items into the measured cross-axis extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutResult {
    /// Items placed across the cross axis before wrapping. Always at least 1.
    pub items_per_row: usize,
    /// Cross-axis size of every item.
    pub item_size: f32,
    /// Gap before, between and after items along the cross axis.
    pub inter_item_spacing: f32,
    /// Container extent the result was computed for.
    pub container_size: f32,
}

impl LayoutResult {
    /// Cross-axis extent actually occupied by a full row, leading gap included.
    pub fn occupied(&self) -> f32 {
        let count = self.items_per_row as f32;
        count * self.item_size + (count + 1.0) * self.inter_item_spacing
    }
}

/// Work out how many items fit per row and how large each one is.
///
/// In fixed mode the item keeps `item_target_size` and leftover space becomes
/// margin; otherwise items stretch so the row exactly fills `container_size`.
/// A non-positive container degrades to a single column at the target size.
pub fn calculate_dimensions(
    item_target_size: f32,
    container_size: f32,
    spacing: f32,
    fixed: bool,
    max_items_per_row: Option<usize>,
) -> LayoutResult {
    if !(container_size > 0.0) || !container_size.is_finite() {
        return LayoutResult {
            items_per_row: 1,
            item_size: item_target_size,
            inter_item_spacing: spacing,
            container_size: container_size.max(0.0),
        };
    }

    let items_per_row = items_per_row(item_target_size, container_size, spacing, max_items_per_row);
    let count = items_per_row as f32;

    if fixed {
        let leftover = container_size - item_target_size * count;
        LayoutResult {
            items_per_row,
            item_size: item_target_size,
            inter_item_spacing: (leftover / (count + 1.0)).max(0.0),
            container_size,
        }
    } else {
        let stretched = (container_size - spacing * (count + 1.0)) / count;
        LayoutResult {
            items_per_row,
            item_size: stretched.max(0.0),
            inter_item_spacing: spacing,
            container_size,
        }
    }
}

fn items_per_row(
    item_target_size: f32,
    container_size: f32,
    spacing: f32,
    max_items_per_row: Option<usize>,
) -> usize {
    let pitch = item_target_size + spacing;
    let fitted = if pitch > 0.0 {
        let raw = (container_size / pitch).floor();
        if raw >= usize::MAX as f32 {
            usize::MAX
        } else {
            raw as usize
        }
    } else {
        1
    };

    let fitted = fitted.max(1);
    match max_items_per_row {
        Some(cap) => fitted.min(cap.max(1)),
        None => fitted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn fixed_mode_keeps_target_size() {
        let result = calculate_dimensions(100.0, 330.0, 10.0, true, None);
        assert_eq!(result.items_per_row, 3);
        assert_eq!(result.item_size, 100.0);
        assert!(approx(result.inter_item_spacing, 7.5));
        assert!(result.occupied() <= 330.0 + 0.01);
    }

    #[test]
    fn stretched_mode_fills_container() {
        let result = calculate_dimensions(100.0, 330.0, 10.0, false, None);
        assert_eq!(result.items_per_row, 3);
        assert!(approx(result.item_size, 96.67));
        assert_eq!(result.inter_item_spacing, 10.0);
        assert!(approx(result.occupied(), 330.0));
    }

    #[test]
    fn zero_container_falls_back_to_single_column() {
        let result = calculate_dimensions(120.0, 0.0, 10.0, false, None);
        assert_eq!(result.items_per_row, 1);
        assert_eq!(result.item_size, 120.0);

        let negative = calculate_dimensions(120.0, -50.0, 10.0, true, None);
        assert_eq!(negative.items_per_row, 1);
        assert_eq!(negative.item_size, 120.0);

        let nan = calculate_dimensions(120.0, f32::NAN, 10.0, true, None);
        assert_eq!(nan.items_per_row, 1);
    }

    #[test]
    fn narrow_container_still_places_one_item() {
        let result = calculate_dimensions(120.0, 50.0, 10.0, false, None);
        assert_eq!(result.items_per_row, 1);
        assert!(approx(result.item_size, 30.0));

        let fixed = calculate_dimensions(120.0, 50.0, 10.0, true, None);
        assert_eq!(fixed.items_per_row, 1);
        assert_eq!(fixed.inter_item_spacing, 0.0);
    }

    #[test]
    fn max_items_per_row_caps_the_count() {
        let result = calculate_dimensions(100.0, 1000.0, 10.0, false, Some(4));
        assert_eq!(result.items_per_row, 4);
        assert!(approx(result.item_size, (1000.0 - 50.0) / 4.0));

        let zero_cap = calculate_dimensions(100.0, 1000.0, 10.0, false, Some(0));
        assert_eq!(zero_cap.items_per_row, 1);
    }

    #[test]
    fn non_positive_pitch_does_not_divide_by_zero() {
        let result = calculate_dimensions(0.0, 300.0, 0.0, true, None);
        assert_eq!(result.items_per_row, 1);
    }

    #[test]
    fn items_per_row_is_positive_across_a_sweep() {
        for container in (1..2000).step_by(37) {
            for target in [1.0, 24.0, 120.0, 640.0] {
                for spacing in [0.0, 4.0, 10.0] {
                    for fixed in [true, false] {
                        let result =
                            calculate_dimensions(target, container as f32, spacing, fixed, None);
                        assert!(result.items_per_row >= 1);
                    }
                }
            }
        }
    }
}
