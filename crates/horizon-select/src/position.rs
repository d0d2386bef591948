//! Panel placement relative to the anchor.
//!
//! The panel is placed directly below the anchor. Its vertical position is in
//! page coordinates (`anchor.bottom + scroll.y`); its horizontal position
//! depends on [`HorizontalAlign`]:
//!
//! | align  | left                           | translate |
//! |--------|--------------------------------|-----------|
//! | Left   | `anchor.left`                  | 0         |
//! | Center | `anchor.left + anchor.width/2` | -50%      |
//! | Right  | `anchor.right - panel.width`   | 0         |

use horizon_select_core::{Point, Rect, Size};

use crate::config::HorizontalAlign;

/// The anchor's bounding rectangle and the scroll offset it was measured at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorRect {
    pub rect: Rect,
    pub scroll: Point,
}

impl AnchorRect {
    pub fn new(rect: Rect, scroll: Point) -> Self {
        Self { rect, scroll }
    }

    pub fn left(&self) -> f32 {
        self.rect.left()
    }

    pub fn bottom(&self) -> f32 {
        self.rect.bottom()
    }

    pub fn right(&self) -> f32 {
        self.rect.right()
    }

    pub fn width(&self) -> f32 {
        self.rect.width()
    }
}

/// Computed panel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelPosition {
    pub top: f32,
    pub left: f32,
    /// Horizontal translate as a fraction of the panel's own width.
    pub translate_x_fraction: f32,
}

impl PanelPosition {
    /// Left edge after applying the translate for a panel of `panel_width`.
    pub fn resolved_left(&self, panel_width: f32) -> f32 {
        self.left + self.translate_x_fraction * panel_width
    }
}

/// Outcome of a positioning pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Placement {
    /// No anchor rectangle was available.
    #[default]
    Unanchored,
    /// The placement needs the panel's width, which is not measured yet.
    Pending,
    Positioned(PanelPosition),
}

impl Placement {
    pub fn position(&self) -> Option<PanelPosition> {
        match self {
            Self::Positioned(position) => Some(*position),
            _ => None,
        }
    }

    pub fn is_positioned(&self) -> bool {
        matches!(self, Self::Positioned(_))
    }
}

/// Place a panel of `panel` size below `anchor`.
pub fn compute_position(
    anchor: Option<&AnchorRect>,
    panel: Option<Size>,
    align: HorizontalAlign,
) -> Placement {
    let Some(anchor) = anchor else {
        return Placement::Unanchored;
    };
    let top = anchor.bottom() + anchor.scroll.y;

    let (left, translate_x_fraction) = match align {
        HorizontalAlign::Left => (anchor.left(), 0.0),
        HorizontalAlign::Center => (anchor.left() + anchor.width() / 2.0, -0.5),
        HorizontalAlign::Right => match panel.filter(|size| size.width > 0.0) {
            Some(size) => (anchor.right() - size.width, 0.0),
            None => return Placement::Pending,
        },
    };

    Placement::Positioned(PanelPosition {
        top,
        left,
        translate_x_fraction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor(scroll_y: f32) -> AnchorRect {
        AnchorRect::new(
            Rect::from_edges(100.0, 50.0, 260.0, 80.0),
            Point::new(0.0, scroll_y),
        )
    }

    #[test]
    fn test_left_alignment() {
        let placement = compute_position(Some(&anchor(0.0)), None, HorizontalAlign::Left);
        let position = placement.position().unwrap();
        assert_eq!(position.top, 80.0);
        assert_eq!(position.left, 100.0);
        assert_eq!(position.translate_x_fraction, 0.0);
    }

    #[test]
    fn test_top_includes_scroll() {
        let placement = compute_position(Some(&anchor(250.0)), None, HorizontalAlign::Left);
        assert_eq!(placement.position().unwrap().top, 330.0);
    }

    #[test]
    fn test_right_alignment() {
        let placement = compute_position(
            Some(&anchor(0.0)),
            Some(Size::new(120.0, 90.0)),
            HorizontalAlign::Right,
        );
        assert_eq!(placement.position().unwrap().left, 140.0);
    }

    #[test]
    fn test_right_alignment_without_panel_width_is_pending() {
        let a = anchor(0.0);
        assert_eq!(compute_position(Some(&a), None, HorizontalAlign::Right), Placement::Pending);
        assert_eq!(
            compute_position(Some(&a), Some(Size::ZERO), HorizontalAlign::Right),
            Placement::Pending
        );
    }

    #[test]
    fn test_center_alignment_translates_half_width() {
        let placement = compute_position(Some(&anchor(0.0)), None, HorizontalAlign::Center);
        let position = placement.position().unwrap();
        assert_eq!(position.left, 180.0);
        assert_eq!(position.translate_x_fraction, -0.5);
        assert_eq!(position.resolved_left(120.0), 120.0);
    }

    #[test]
    fn test_no_anchor() {
        let placement = compute_position(None, Some(Size::new(10.0, 10.0)), HorizontalAlign::Left);
        assert_eq!(placement, Placement::Unanchored);
        assert!(!placement.is_positioned());
    }
}
