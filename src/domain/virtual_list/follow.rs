//! Follow-the-bottom behaviour for growing lists

use super::VirtualListLayout;

/// Default distance from the end within which the viewport counts as "at the bottom"
pub const DEFAULT_FOLLOW_THRESHOLD_PX: f64 = 100.0;

/// Decides when a list that gained items should jump to its end
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowBottom {
    threshold_px: f64,
}

impl Default for FollowBottom {
    fn default() -> Self {
        Self::new(DEFAULT_FOLLOW_THRESHOLD_PX)
    }
}

impl FollowBottom {
    pub fn new(threshold_px: f64) -> Self {
        Self {
            threshold_px: threshold_px.max(0.0),
        }
    }

    pub fn threshold_px(&self) -> f64 {
        self.threshold_px
    }

    /// Whether a viewport over a list of `total_height` is at or near its end
    pub fn is_near_bottom(&self, scroll_top: f64, viewport_height: f64, total_height: f64) -> bool {
        total_height - (scroll_top + viewport_height) <= self.threshold_px
    }

    /// Scroll target after the list changed from `previous_count` items to `layout`
    ///
    /// Returns the end-of-list offset when items were added and the viewport
    /// was near the bottom of the previous content, `None` otherwise.
    pub fn on_items_changed(
        &self,
        previous_count: usize,
        layout: &VirtualListLayout,
        scroll_top: f64,
        viewport_height: f64,
    ) -> Option<f64> {
        if layout.len() <= previous_count {
            return None;
        }

        let previous_height = layout.offset_of(previous_count);

        self.is_near_bottom(scroll_top, viewport_height, previous_height)
            .then(|| layout.scroll_to_end(viewport_height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_near_bottom() {
        let follow = FollowBottom::new(50.0);

        assert!(follow.is_near_bottom(800.0, 200.0, 1_000.0));
        assert!(follow.is_near_bottom(760.0, 200.0, 1_000.0));
        assert!(!follow.is_near_bottom(700.0, 200.0, 1_000.0));
        // Content shorter than the viewport is always at the bottom
        assert!(follow.is_near_bottom(0.0, 500.0, 100.0));
    }

    #[test]
    fn test_follows_when_at_bottom_and_list_grows() {
        let follow = FollowBottom::default();
        let layout = VirtualListLayout::fixed(12, 50.0);

        // 10 items (500px) viewed through a 200px viewport scrolled to the end
        let target = follow.on_items_changed(10, &layout, 300.0, 200.0);

        assert_eq!(target, Some(400.0));
    }

    #[test]
    fn test_does_not_follow_when_scrolled_up() {
        let follow = FollowBottom::default();
        let layout = VirtualListLayout::fixed(12, 50.0);

        assert_eq!(follow.on_items_changed(10, &layout, 0.0, 200.0), None);
    }

    #[test]
    fn test_does_not_follow_when_list_shrinks_or_is_unchanged() {
        let follow = FollowBottom::default();
        let layout = VirtualListLayout::fixed(10, 50.0);

        assert_eq!(follow.on_items_changed(10, &layout, 300.0, 200.0), None);
        assert_eq!(follow.on_items_changed(15, &layout, 300.0, 200.0), None);
    }

    #[test]
    fn test_negative_threshold_is_zero() {
        assert_eq!(FollowBottom::new(-10.0).threshold_px(), 0.0);
    }
}
