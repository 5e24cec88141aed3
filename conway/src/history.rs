// history.rs - Detects repeating boards from a short ring of hashes

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Number of recent boards remembered.
pub const HISTORY_LEN: usize = 10;

/// Remembers the hashes of the last [`HISTORY_LEN`] boards and reports when
/// a board repeats one of them (still lifes and oscillators up to that
/// period).
#[derive(Debug, Clone, Default)]
pub struct CycleDetector {
    history: [u64; HISTORY_LEN],
    count: usize,
}

/// Hash of the alive/dead flags only, so age-encoded boards that differ
/// only in ages hash the same.
pub fn hash_cells(cells: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    for &cell in cells {
        (cell != 0).hash(&mut hasher);
    }
    hasher.finish()
}

impl CycleDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `cells` and returns true if the same board was seen within
    /// the remembered window.
    pub fn observe(&mut self, cells: &[u8]) -> bool {
        let hash = hash_cells(cells);
        let seen = self.history[..self.count.min(HISTORY_LEN)].contains(&hash);
        if !seen {
            self.history[self.count % HISTORY_LEN] = hash;
            self.count += 1;
        }
        seen
    }

    pub fn reset(&mut self) {
        self.history = [0; HISTORY_LEN];
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_boards_are_not_cycles() {
        let mut detector = CycleDetector::new();
        for i in 0..30u8 {
            let board: Vec<u8> = (0..5).map(|bit| i >> bit & 1).collect();
            assert!(!detector.observe(&board));
        }
    }

    #[test]
    fn repeated_board_is_detected() {
        let mut detector = CycleDetector::new();
        assert!(!detector.observe(&[1, 0, 0]));
        assert!(!detector.observe(&[0, 1, 0]));
        assert!(detector.observe(&[1, 0, 0]));
    }

    #[test]
    fn ages_do_not_affect_the_hash() {
        assert_eq!(hash_cells(&[1, 0, 3]), hash_cells(&[7, 0, 1]));
        assert_ne!(hash_cells(&[1, 0, 3]), hash_cells(&[1, 1, 3]));
    }

    #[test]
    fn old_boards_fall_out_of_the_window() {
        let mut detector = CycleDetector::new();
        let boards: Vec<Vec<u8>> = (0..=HISTORY_LEN)
            .map(|i| (0..8).map(|bit| u8::from(i >> bit & 1 == 1)).collect())
            .collect();
        for board in &boards {
            assert!(!detector.observe(board));
        }
        // The first board was overwritten by the eleventh.
        assert!(!detector.observe(&boards[0]));
    }
}
