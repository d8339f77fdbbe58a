// Copyright 2025 the Tally Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests comparing the cached layouts against direct summation.

use proptest::prelude::*;
use tally_window::{
    MeasuredRows, ResizableRowExtents, RowExtents, RowHeight, RowLayout, UniformRows,
    compute_visible_rows,
};

fn heights() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0_u32..64, 0..200)
}

proptest! {
    #[test]
    fn measured_offsets_match_summation(
        heights in heights(),
        edits in prop::collection::vec((0_usize..200, 0_u32..64), 0..20),
    ) {
        let mut expected: Vec<f64> = heights.iter().map(|h| f64::from(*h)).collect();
        let mut rows = MeasuredRows::from_heights(expected.iter().copied());
        for (row, height) in edits {
            if row < expected.len() {
                expected[row] = f64::from(height);
                rows.set_height(row, f64::from(height));
            }
        }
        let mut top = 0.0;
        for (row, height) in expected.iter().enumerate() {
            prop_assert_eq!(rows.offset_of(row), top);
            top += height;
        }
        prop_assert_eq!(rows.total_height(), top);
    }

    #[test]
    fn row_at_offset_covers_the_offset(
        heights in prop::collection::vec(1_u32..64, 1..200),
        offset in 0_u32..20_000,
    ) {
        let mut rows = MeasuredRows::from_heights(heights.iter().map(|h| f64::from(*h)));
        let offset = f64::from(offset);
        let row = rows.row_at_offset(offset);
        let top = rows.offset_of(row);
        prop_assert!(top <= offset);
        if offset < rows.total_height() {
            prop_assert!(offset < top + rows.height_of(row));
        } else {
            prop_assert_eq!(row, heights.len() - 1);
        }
    }

    #[test]
    fn visible_rows_cover_the_viewport(
        count in 1_usize..500,
        height in 1_u32..80,
        scroll in 0_u32..40_000,
        viewport in 1_u32..2_000,
    ) {
        let height = f64::from(height);
        let mut rows = UniformRows::new(count, height);
        let (scroll, viewport) = (f64::from(scroll), f64::from(viewport));
        let visible = compute_visible_rows(&mut rows, scroll, viewport, 0.0, 0.0);
        let content = rows.total_height();
        prop_assert_eq!(visible.content_extent, content);
        if scroll < content {
            prop_assert!(!visible.is_empty());
            prop_assert!(rows.offset_of(visible.start) <= scroll);
            let bottom = (scroll + viewport).min(content);
            prop_assert!(rows.offset_of(visible.end) >= bottom);
            prop_assert_eq!(
                visible.before_extent
                    + f64::from(u32::try_from(visible.len()).unwrap()) * height
                    + visible.after_extent,
                content
            );
        } else {
            prop_assert!(visible.is_empty());
        }
    }

    #[test]
    fn sized_layout_matches_measured_layout(count in 0_usize..300, grow in 0_usize..300) {
        let size = |row: usize| f64::from(u32::try_from(row % 7).unwrap() * 4 + 20);
        let mut layout = RowLayout::new(&RowHeight::per_row(size), count);
        layout.set_row_count(count + grow);
        let mut reference = MeasuredRows::from_heights((0..count + grow).map(size));
        prop_assert_eq!(layout.total_height(), reference.total_height());
        for row in [0, count / 2, count, count + grow / 2] {
            prop_assert_eq!(layout.offset_of(row), reference.offset_of(row));
        }
    }
}
