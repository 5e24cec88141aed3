// patterns.rs - Named starting patterns, placed with toroidal wraparound

use crate::error::{Error, Result};
use crate::grid::Grid;

/// A named pattern as `(x, y)` offsets from its top-left corner.
pub struct Pattern {
    pub name: &'static str,
    pub cells: &'static [(usize, usize)],
}

pub const PATTERNS: &[Pattern] = &[
    Pattern {
        name: "Glider",
        cells: &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)],
    },
    Pattern {
        name: "Blinker",
        cells: &[(0, 0), (1, 0), (2, 0)],
    },
    Pattern {
        name: "Toad",
        cells: &[(1, 0), (2, 0), (3, 0), (0, 1), (1, 1), (2, 1)],
    },
    Pattern {
        name: "Beacon",
        cells: &[(0, 0), (1, 0), (0, 1), (1, 1), (2, 2), (3, 2), (2, 3), (3, 3)],
    },
    Pattern {
        name: "Block",
        cells: &[(0, 0), (1, 0), (0, 1), (1, 1)],
    },
    Pattern {
        name: "Pulsar",
        cells: &[
            // Top half
            (2, 0), (3, 0), (4, 0), (8, 0), (9, 0), (10, 0),
            (0, 2), (5, 2), (7, 2), (12, 2),
            (0, 3), (5, 3), (7, 3), (12, 3),
            (0, 4), (5, 4), (7, 4), (12, 4),
            (2, 5), (3, 5), (4, 5), (8, 5), (9, 5), (10, 5),
            // Bottom half (mirrored)
            (2, 7), (3, 7), (4, 7), (8, 7), (9, 7), (10, 7),
            (0, 8), (5, 8), (7, 8), (12, 8),
            (0, 9), (5, 9), (7, 9), (12, 9),
            (0, 10), (5, 10), (7, 10), (12, 10),
            (2, 12), (3, 12), (4, 12), (8, 12), (9, 12), (10, 12),
        ],
    },
    Pattern {
        name: "R-pentomino",
        cells: &[(1, 0), (2, 0), (0, 1), (1, 1), (1, 2)],
    },
    Pattern {
        name: "Gosper Glider Gun",
        cells: &[
            (24, 0), (22, 1), (24, 1), (12, 2), (13, 2), (20, 2), (21, 2), (34, 2),
            (35, 2), (11, 3), (15, 3), (20, 3), (21, 3), (34, 3), (35, 3), (0, 4),
            (1, 4), (10, 4), (16, 4), (20, 4), (21, 4), (0, 5), (1, 5), (10, 5),
            (14, 5), (16, 5), (17, 5), (22, 5), (24, 5), (10, 6), (16, 6), (24, 6),
            (11, 7), (15, 7), (12, 8), (13, 8),
        ],
    },
];

impl Pattern {
    /// Looks a pattern up by name, ignoring case.
    pub fn find(name: &str) -> Result<&'static Pattern> {
        PATTERNS
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownPattern(name.to_string()))
    }

    /// Bounding box as `(width, height)`.
    pub fn extent(&self) -> (usize, usize) {
        self.cells.iter().fold((0, 0), |(w, h), &(x, y)| {
            (w.max(x + 1), h.max(y + 1))
        })
    }

    /// Sets the pattern's cells alive with its corner at `(x, y)`; cells
    /// past an edge wrap to the opposite side.
    pub fn place(&self, grid: &mut Grid, x: usize, y: usize) {
        let (width, height) = (grid.width(), grid.height());
        let cells = grid.cells_mut();
        for &(dx, dy) in self.cells {
            let cx = (x + dx) % width;
            let cy = (y + dy) % height;
            cells[cx + cy * width] = 1;
        }
    }

    /// Clears the grid and places the pattern in its centre.
    pub fn apply(&self, grid: &mut Grid) {
        grid.clear();
        let (w, h) = self.extent();
        let x = grid.width().saturating_sub(w) / 2;
        let y = grid.height().saturating_sub(h) / 2;
        self.place(grid, x, y);
        log::debug!("applied pattern {} at ({x}, {y})", self.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(Pattern::find("glider").unwrap().name, "Glider");
        assert_eq!(
            Pattern::find("spaceship").err(),
            Some(Error::UnknownPattern("spaceship".into()))
        );
    }

    #[test]
    fn cell_lists_have_no_duplicates() {
        for pattern in PATTERNS {
            let mut cells = pattern.cells.to_vec();
            cells.sort_unstable();
            cells.dedup();
            assert_eq!(cells.len(), pattern.cells.len(), "{}", pattern.name);
        }
    }

    #[test]
    fn known_sizes() {
        assert_eq!(Pattern::find("pulsar").unwrap().cells.len(), 48);
        assert_eq!(Pattern::find("gosper glider gun").unwrap().extent(), (36, 9));
    }

    #[test]
    fn placement_wraps_around_edges() {
        let mut grid = Grid::new(5, 5).unwrap();
        Pattern::find("Block").unwrap().place(&mut grid, 4, 4);
        assert!(grid.is_alive(4, 4));
        assert!(grid.is_alive(0, 4));
        assert!(grid.is_alive(4, 0));
        assert!(grid.is_alive(0, 0));
        assert_eq!(grid.population(), 4);
    }

    #[test]
    fn apply_centres_and_clears() {
        let mut grid = Grid::new(10, 10).unwrap();
        grid.cells_mut().fill(1);
        Pattern::find("Blinker").unwrap().apply(&mut grid);
        assert_eq!(grid.population(), 3);
        assert!(grid.is_alive(3, 4) && grid.is_alive(4, 4) && grid.is_alive(5, 4));
    }
}
