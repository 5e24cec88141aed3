// rules.rs - Birth/survival rule and cell encodings

use serde::{Deserialize, Serialize};

/// How a cell's byte is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellEncoding {
    /// 0 dead, 1 alive.
    #[default]
    Binary,
    /// 0 dead, `n > 0` alive for `n` consecutive generations (saturating).
    /// Lets a renderer skip cells whose alive/dead flag did not change.
    Age,
}

impl CellEncoding {
    #[inline]
    pub fn is_alive(value: u8) -> bool {
        value != 0
    }

    /// Value of a cell that is alive next generation through birth.
    #[inline]
    fn born(self, current: u8) -> u8 {
        match self {
            CellEncoding::Binary => 1,
            CellEncoding::Age => current.saturating_add(1),
        }
    }
}

/// Birth/survival thresholds of a totalistic rule.
///
/// A cell with exactly `birth` live neighbors is alive next generation; one
/// with exactly `survival` keeps its current value; everything else dies.
/// The classic rule (B3/S23) is `birth = 3, survival = 2`: survival on three
/// neighbors is already covered by the birth branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub birth: u8,
    pub survival: u8,
}

impl Default for Rule {
    fn default() -> Self {
        Self::CONWAY
    }
}

impl Rule {
    pub const CONWAY: Rule = Rule {
        birth: 3,
        survival: 2,
    };

    pub fn new(birth: u8, survival: u8) -> Self {
        Self { birth, survival }
    }

    /// Next value of a cell given its value and its live neighbor count.
    #[inline]
    pub fn next_value(&self, current: u8, live: u8, encoding: CellEncoding) -> u8 {
        if live == self.birth {
            encoding.born(current)
        } else if live == self.survival {
            current
        } else {
            0
        }
    }

    /// Same evaluation, driven by the count of dead neighbors instead.
    #[inline]
    pub fn next_value_from_dead(&self, current: u8, dead: u8, encoding: CellEncoding) -> u8 {
        self.next_value(current, 8u8.saturating_sub(dead), encoding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENCODINGS: [CellEncoding; 2] = [CellEncoding::Binary, CellEncoding::Age];

    #[test]
    fn lonely_and_crowded_cells_die() {
        for encoding in ENCODINGS {
            for live in [0, 1, 4, 5, 6, 7, 8] {
                for current in [0, 1, 2, 9, 255] {
                    assert_eq!(Rule::CONWAY.next_value(current, live, encoding), 0);
                }
            }
        }
    }

    #[test]
    fn two_neighbors_keep_the_current_value() {
        for current in [0, 1] {
            assert_eq!(Rule::CONWAY.next_value(current, 2, CellEncoding::Binary), current);
        }
        // Age is kept as is, not reset and not incremented.
        for current in [0, 1, 4, 255] {
            assert_eq!(Rule::CONWAY.next_value(current, 2, CellEncoding::Age), current);
        }
    }

    #[test]
    fn three_neighbors_give_life() {
        assert_eq!(Rule::CONWAY.next_value(0, 3, CellEncoding::Binary), 1);
        assert_eq!(Rule::CONWAY.next_value(1, 3, CellEncoding::Binary), 1);
        assert_eq!(Rule::CONWAY.next_value(0, 3, CellEncoding::Age), 1);
        assert_eq!(Rule::CONWAY.next_value(4, 3, CellEncoding::Age), 5);
        assert_eq!(Rule::CONWAY.next_value(255, 3, CellEncoding::Age), 255);
    }

    #[test]
    fn dead_count_matches_live_count() {
        for encoding in ENCODINGS {
            for live in 0..=8u8 {
                for current in [0, 1, 3] {
                    assert_eq!(
                        Rule::CONWAY.next_value(current, live, encoding),
                        Rule::CONWAY.next_value_from_dead(current, 8 - live, encoding)
                    );
                }
            }
        }
    }

    #[test]
    fn custom_thresholds() {
        let rule = Rule::new(2, 4);
        assert_eq!(rule.next_value(0, 2, CellEncoding::Binary), 1);
        assert_eq!(rule.next_value(1, 4, CellEncoding::Binary), 1);
        assert_eq!(rule.next_value(0, 4, CellEncoding::Binary), 0);
        assert_eq!(rule.next_value(1, 3, CellEncoding::Binary), 0);
    }
}
