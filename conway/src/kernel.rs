// kernel.rs - Toroidal step kernel shared by the sequential and parallel steppers
//
// The kernel reads a full source buffer and writes a row-aligned chunk of the
// destination. It never reads the destination, so any set of disjoint chunks
// can be evaluated independently and in any order.

use serde::{Deserialize, Serialize};

use crate::chunk::RowRange;
use crate::rules::{CellEncoding, Rule};

/// Which neighbor count drives the rule. Both produce identical grids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tally {
    #[default]
    Live,
    Dead,
}

/// Everything needed to evaluate one generation: rule, cell encoding and
/// neighbor tally. Cheap to copy into every worker job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kernel {
    #[serde(default)]
    pub rule: Rule,
    #[serde(default)]
    pub encoding: CellEncoding,
    #[serde(default)]
    pub tally: Tally,
}

/// Flattened offsets of the rows around row `y`, wrapping top to bottom.
#[inline]
fn row_offsets(width: usize, height: usize, y: usize) -> (usize, usize, usize) {
    let area = width * height;
    let here = y * width;
    let up = if y == 0 { area - width } else { here - width };
    let down = (here + width) % area;
    (up, here, down)
}

/// Column indices left and right of `x`, wrapping at the edges.
#[inline]
fn col_offsets(width: usize, x: usize) -> (usize, usize) {
    let left = if x == 0 { width - 1 } else { x - 1 };
    let right = (x + 1) % width;
    (left, right)
}

/// Counts the eight wrapped neighbors of `x` satisfying `pick`.
#[inline]
fn tally_at(
    src: &[u8],
    (up, here, down): (usize, usize, usize),
    (left, x, right): (usize, usize, usize),
    pick: impl Fn(u8) -> bool,
) -> u8 {
    u8::from(pick(src[up + left]))
        + u8::from(pick(src[up + x]))
        + u8::from(pick(src[up + right]))
        + u8::from(pick(src[here + left]))
        + u8::from(pick(src[here + right]))
        + u8::from(pick(src[down + left]))
        + u8::from(pick(src[down + x]))
        + u8::from(pick(src[down + right]))
}

/// Live neighbors of `(x, y)` on a torus. Age-encoded values count as one.
pub fn live_neighbors(src: &[u8], width: usize, height: usize, x: usize, y: usize) -> u8 {
    let (left, right) = col_offsets(width, x);
    tally_at(
        src,
        row_offsets(width, height, y),
        (left, x, right),
        CellEncoding::is_alive,
    )
}

/// Dead neighbors of `(x, y)` on a torus.
pub fn dead_neighbors(src: &[u8], width: usize, height: usize, x: usize, y: usize) -> u8 {
    let (left, right) = col_offsets(width, x);
    tally_at(
        src,
        row_offsets(width, height, y),
        (left, x, right),
        |v| !CellEncoding::is_alive(v),
    )
}

impl Kernel {
    pub fn new(rule: Rule, encoding: CellEncoding, tally: Tally) -> Self {
        Self {
            rule,
            encoding,
            tally,
        }
    }

    /// Evaluates row `y` of `src` into `out`, which holds exactly that row.
    pub fn evolve_row(&self, src: &[u8], out: &mut [u8], width: usize, height: usize, y: usize) {
        debug_assert_eq!(out.len(), width);
        let rows = row_offsets(width, height, y);
        let here = rows.1;
        for (x, cell) in out.iter_mut().enumerate() {
            let (left, right) = col_offsets(width, x);
            let current = src[here + x];
            *cell = match self.tally {
                Tally::Live => {
                    let live = tally_at(src, rows, (left, x, right), CellEncoding::is_alive);
                    self.rule.next_value(current, live, self.encoding)
                }
                Tally::Dead => {
                    let dead = tally_at(src, rows, (left, x, right), |v| {
                        !CellEncoding::is_alive(v)
                    });
                    self.rule.next_value_from_dead(current, dead, self.encoding)
                }
            };
        }
    }

    /// Evaluates the rows of `range` from `src` into `dst`, the destination
    /// slice for exactly that range.
    pub fn evolve(&self, src: &[u8], dst: &mut [u8], width: usize, height: usize, range: RowRange) {
        debug_assert_eq!(src.len(), width * height);
        debug_assert_eq!(dst.len(), range.len());
        for (y, out) in range.rows(width).zip(dst.chunks_exact_mut(width)) {
            self.evolve_row(src, out, width, height, y);
        }
    }
}
