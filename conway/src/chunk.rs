// chunk.rs - Row-aligned partition of the flattened cell index space

use std::ops::Range;

/// Half-open range `[start, end)` of flattened cell indices. Both bounds are
/// multiples of the grid width, so a chunk never splits a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub start: usize,
    pub end: usize,
}

impl RowRange {
    /// Whole-grid range.
    pub fn full(width: usize, height: usize) -> Self {
        Self {
            start: 0,
            end: width * height,
        }
    }

    /// Range covering the given row indices.
    pub fn from_rows(width: usize, rows: Range<usize>) -> Self {
        Self {
            start: rows.start * width,
            end: rows.end * width,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Row indices spanned by this range.
    pub fn rows(&self, width: usize) -> Range<usize> {
        self.start / width..self.end / width
    }

    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Splits a `width x height` grid into at most `workers` row-aligned chunks.
///
/// Rows are dealt as evenly as possible: every chunk gets `height / n` rows
/// and the first `height % n` get one more. When there are more workers than
/// rows, only `height` single-row chunks are produced. The result always
/// covers `[0, width * height)` exactly.
pub fn partition(width: usize, height: usize, workers: usize) -> Vec<RowRange> {
    let chunks = workers.clamp(1, height.max(1));
    let base = height / chunks;
    let extra = height % chunks;

    let mut ranges = Vec::with_capacity(chunks);
    let mut row = 0;
    for i in 0..chunks {
        let rows = base + usize::from(i < extra);
        ranges.push(RowRange::from_rows(width, row..row + rows));
        row += rows;
    }

    assert_exact_cover(&ranges, width * height);
    ranges
}

/// Panics unless `ranges`, taken in order, tile `[0, total)` with no gap,
/// no overlap and no empty chunk.
pub fn assert_exact_cover(ranges: &[RowRange], total: usize) {
    let mut expected = 0;
    for (i, range) in ranges.iter().enumerate() {
        assert!(
            range.start == expected,
            "chunk partition error: chunk {i} starts at {} but {expected} was expected ({})",
            range.start,
            if range.start < expected { "overlap" } else { "gap" },
        );
        assert!(
            range.end > range.start,
            "chunk partition error: chunk {i} [{}, {}) is empty",
            range.start,
            range.end
        );
        expected = range.end;
    }
    assert!(
        expected == total,
        "chunk partition error: chunks end at {expected}, grid has {total} cells"
    );
}
