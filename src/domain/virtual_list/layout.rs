//! Prefix-sum layout for virtualized lists

use serde::Serialize;

/// Index window of items to render
///
/// `start..end` includes the overscan margin; `first_visible..last_visible`
/// is the part actually intersecting the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleRange {
    pub start: usize,
    pub end: usize,
    pub first_visible: usize,
    pub last_visible: usize,
}

impl VisibleRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }
}

/// An item to render, absolutely positioned at `offset`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VirtualItem {
    pub index: usize,
    pub offset: f64,
    pub height: f64,
}

/// Item offsets of a list with known heights
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualListLayout {
    /// `offsets[i]` is the top of item `i`; the last element is the total height
    offsets: Vec<f64>,
}

impl VirtualListLayout {
    /// Layout for `count` items of the same height
    pub fn fixed(count: usize, item_height: f64) -> Self {
        Self::from_fn(count, |_| item_height)
    }

    /// Layout for `count` items whose heights depend on their index
    ///
    /// Negative or non-finite heights are treated as zero.
    pub fn from_fn<F>(count: usize, height: F) -> Self
    where
        F: Fn(usize) -> f64,
    {
        let mut offsets = Vec::with_capacity(count.saturating_add(1));
        let mut top = 0.0;
        offsets.push(top);

        for index in 0..count {
            let h = height(index);
            top += if h.is_finite() && h > 0.0 { h } else { 0.0 };
            offsets.push(top);
        }

        Self { offsets }
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Height of the whole list
    pub fn total_height(&self) -> f64 {
        self.offsets[self.len()]
    }

    /// Top offset of an item; indices past the end map to the total height
    pub fn offset_of(&self, index: usize) -> f64 {
        self.offsets[index.min(self.len())]
    }

    /// Height of an item, zero past the end
    pub fn height_of(&self, index: usize) -> f64 {
        if index >= self.len() {
            return 0.0;
        }

        self.offsets[index + 1] - self.offsets[index]
    }

    /// Scroll position that puts the end of the list at the bottom of the viewport
    pub fn scroll_to_end(&self, viewport_height: f64) -> f64 {
        (self.total_height() - viewport_height).max(0.0)
    }

    /// Window of items intersecting `[scroll_top, scroll_top + viewport_height)`,
    /// widened by `overscan` items on both ends
    pub fn visible_range(
        &self,
        scroll_top: f64,
        viewport_height: f64,
        overscan: usize,
    ) -> VisibleRange {
        let count = self.len();

        if count == 0 {
            return VisibleRange::default();
        }

        let top = scroll_top.max(0.0);
        let bottom = top + viewport_height.max(0.0);

        // First item whose bottom edge lies below the viewport top
        let first_visible = self.offsets[1..]
            .partition_point(|end| *end <= top)
            .min(count - 1);

        // First item starting at or below the viewport bottom
        let last_visible = self.offsets[..count]
            .partition_point(|start| *start < bottom)
            .max(first_visible + 1)
            .min(count);

        VisibleRange {
            start: first_visible.saturating_sub(overscan),
            end: last_visible.saturating_add(overscan).min(count),
            first_visible,
            last_visible,
        }
    }

    /// Items to render for the given scroll window
    pub fn virtual_items(
        &self,
        scroll_top: f64,
        viewport_height: f64,
        overscan: usize,
    ) -> Vec<VirtualItem> {
        let range = self.visible_range(scroll_top, viewport_height, overscan);

        (range.start..range.end)
            .map(|index| VirtualItem {
                index,
                offset: self.offsets[index],
                height: self.height_of(index),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_huge_overscan_clamps_to_list() {
        let layout = VirtualListLayout::fixed(10, 50.0);

        let range = layout.visible_range(0.0, 100.0, usize::MAX);

        assert_eq!(range.start, 0);
        assert_eq!(range.end, 10);
        assert_eq!(range.first_visible, 0);
        assert_eq!(range.last_visible, 2);
        assert_eq!(layout.virtual_items(250.0, 100.0, usize::MAX).len(), 10);
    }

    #[test]
    fn test_fixed_layout_offsets() {
        let layout = VirtualListLayout::fixed(5, 20.0);

        assert_eq!(layout.len(), 5);
        assert_eq!(layout.total_height(), 100.0);
        assert_eq!(layout.offset_of(0), 0.0);
        assert_eq!(layout.offset_of(3), 60.0);
        assert_eq!(layout.offset_of(99), 100.0);
        assert_eq!(layout.height_of(4), 20.0);
        assert_eq!(layout.height_of(5), 0.0);
    }

    #[test]
    fn test_variable_layout_offsets() {
        let layout = VirtualListLayout::from_fn(4, |i| (i as f64 + 1.0) * 10.0);

        assert_eq!(layout.offset_of(1), 10.0);
        assert_eq!(layout.offset_of(2), 30.0);
        assert_eq!(layout.offset_of(3), 60.0);
        assert_eq!(layout.total_height(), 100.0);
    }

    #[test]
    fn test_invalid_heights_are_zero() {
        let layout = VirtualListLayout::from_fn(3, |i| match i {
            0 => -5.0,
            1 => f64::NAN,
            _ => 10.0,
        });

        assert_eq!(layout.total_height(), 10.0);
    }

    #[test]
    fn test_visible_range_without_overscan() {
        let layout = VirtualListLayout::fixed(100, 50.0);

        let range = layout.visible_range(120.0, 200.0, 0);

        // viewport covers 120..320 => items 2..=6
        assert_eq!(range.first_visible, 2);
        assert_eq!(range.last_visible, 7);
        assert_eq!(range.start, 2);
        assert_eq!(range.end, 7);
        assert_eq!(range.len(), 5);
    }

    #[test]
    fn test_visible_range_with_overscan_is_clamped() {
        let layout = VirtualListLayout::fixed(10, 50.0);

        let top = layout.visible_range(0.0, 100.0, 3);
        assert_eq!((top.start, top.end), (0, 5));

        let bottom = layout.visible_range(400.0, 100.0, 3);
        assert_eq!((bottom.first_visible, bottom.last_visible), (8, 10));
        assert_eq!((bottom.start, bottom.end), (5, 10));
    }

    #[test]
    fn test_visible_range_item_boundary() {
        let layout = VirtualListLayout::fixed(10, 50.0);

        // Scrolled exactly to the top of item 2
        let range = layout.visible_range(100.0, 50.0, 0);

        assert_eq!((range.start, range.end), (2, 3));
    }

    #[test]
    fn test_visible_range_variable_heights() {
        let heights = [10.0, 200.0, 10.0, 10.0, 300.0, 10.0];
        let layout = VirtualListLayout::from_fn(heights.len(), |i| heights[i]);

        // offsets: 0, 10, 210, 220, 230, 530, 540
        let range = layout.visible_range(215.0, 20.0, 0);

        assert_eq!((range.start, range.end), (2, 5));
    }

    #[test]
    fn test_visible_range_past_end() {
        let layout = VirtualListLayout::fixed(10, 50.0);

        let range = layout.visible_range(10_000.0, 100.0, 1);

        assert_eq!((range.first_visible, range.last_visible), (9, 10));
        assert_eq!((range.start, range.end), (8, 10));
    }

    #[test]
    fn test_visible_range_empty_list() {
        let layout = VirtualListLayout::fixed(0, 50.0);

        assert!(layout.visible_range(0.0, 100.0, 5).is_empty());
        assert!(layout.virtual_items(0.0, 100.0, 5).is_empty());
    }

    #[test]
    fn test_virtual_items_positions() {
        let layout = VirtualListLayout::fixed(1_000_000, 24.0);

        let items = layout.virtual_items(24_000.0, 240.0, 2);

        assert_eq!(items.len(), 14);
        assert_eq!(items[0].index, 998);
        assert_eq!(items[0].offset, 998.0 * 24.0);
        assert_eq!(items[13].index, 1011);
        assert!(items.iter().all(|item| item.height == 24.0));
    }

    #[test]
    fn test_scroll_to_end() {
        let layout = VirtualListLayout::fixed(10, 50.0);

        assert_eq!(layout.scroll_to_end(200.0), 300.0);
        assert_eq!(layout.scroll_to_end(1_000.0), 0.0);
    }

    #[test]
    fn test_range_contains() {
        let range = VisibleRange {
            start: 2,
            end: 5,
            first_visible: 3,
            last_visible: 4,
        };

        assert!(range.contains(2));
        assert!(range.contains(4));
        assert!(!range.contains(5));
    }
}
