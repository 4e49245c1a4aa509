//! Pure slot-to-coordinate formulas.

use glam::Vec2;

use crate::model::Indicator;
use crate::options::LayoutOptions;

/// Top-left corner of the node box occupying `slot`.
///
/// `x = margin_left + slot * (element_width + spacing)`, `y = row_y`.
/// Contiguous slots therefore never overlap and are strictly increasing
/// in x within one row.
#[must_use]
pub fn slot_position(slot: usize, layout: &LayoutOptions) -> Vec2 {
    let pitch = layout.element_width + layout.spacing;
    Vec2::new(layout.margin_left + slot as f32 * pitch, layout.row_y)
}

/// Anchor point of an indicator marker attached to `slot`.
///
/// Indicators sit centered under their node box, `indicator_gap` below
/// the row.
#[must_use]
pub fn indicator_position(
    which: Indicator,
    slot: usize,
    layout: &LayoutOptions,
) -> Vec2 {
    // Head and tail share the same anchor rule; the marker glyph itself is
    // the host's concern.
    let _ = which;
    let node = slot_position(slot, layout);
    Vec2::new(
        node.x + layout.element_width / 2.0,
        node.y + layout.element_height + layout.indicator_gap,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_law() {
        let layout = LayoutOptions {
            margin_left: 50.0,
            element_width: 80.0,
            spacing: 0.0,
            ..LayoutOptions::default()
        };

        let xs: Vec<f32> =
            (0..4).map(|i| slot_position(i, &layout).x).collect();
        assert_eq!(xs, vec![50.0, 130.0, 210.0, 290.0]);

        // Strictly increasing, constant y.
        for w in xs.windows(2) {
            assert!(w[0] < w[1]);
        }
        for i in 0..4 {
            assert_eq!(slot_position(i, &layout).y, layout.row_y);
        }
    }

    #[test]
    fn test_slot_law_with_spacing() {
        let layout = LayoutOptions::default();
        let pitch = layout.element_width + layout.spacing;
        for i in 0..5 {
            let p = slot_position(i, &layout);
            assert_eq!(p.x, layout.margin_left + i as f32 * pitch);
        }
    }

    #[test]
    fn test_indicator_sits_below_row() {
        let layout = LayoutOptions::default();
        let node = slot_position(2, &layout);
        let marker = indicator_position(Indicator::Head, 2, &layout);
        assert!(marker.y > node.y + layout.element_height);
        assert_eq!(marker.x, node.x + layout.element_width / 2.0);
    }
}
