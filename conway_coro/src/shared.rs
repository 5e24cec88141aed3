// shared.rs - Cell buffer shared between the coordinator and its workers
//
// Workers read the whole source buffer and write disjoint row ranges of the
// destination buffer concurrently, so neither can be handed out as a plain
// `&[u8]`/`&mut [u8]` pair across tasks. The coordinator upholds the access
// protocol; this type only provides the raw views.

use std::cell::UnsafeCell;
use std::ops::Range;

pub struct SharedCells {
    cells: Box<[UnsafeCell<u8>]>,
}

// SAFETY: all shared access goes through `as_slice`/`range_mut`, whose
// callers guarantee that no byte is written while anyone else reads or
// writes it.
unsafe impl Sync for SharedCells {}

impl SharedCells {
    pub fn zeroed(len: usize) -> Self {
        Self::from_slice(&vec![0; len])
    }

    pub fn from_slice(cells: &[u8]) -> Self {
        Self {
            cells: cells.iter().map(|&v| UnsafeCell::new(v)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Exclusive view; the borrow checker rules out any other access.
    pub fn get_mut(&mut self) -> &mut [u8] {
        // SAFETY: `UnsafeCell<u8>` has the layout of `u8`, and `&mut self`
        // guarantees exclusivity.
        unsafe { std::slice::from_raw_parts_mut(UnsafeCell::raw_get(self.cells.as_ptr()), self.len()) }
    }

    /// Read-only view of the whole buffer.
    ///
    /// # Safety
    ///
    /// No part of the buffer may be written for as long as the returned
    /// slice is alive.
    pub unsafe fn as_slice(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(UnsafeCell::raw_get(self.cells.as_ptr()), self.len()) }
    }

    /// Mutable view of `range`.
    ///
    /// # Safety
    ///
    /// While the returned slice is alive, nothing else may read or write any
    /// byte of `range`. Panics if `range` is out of bounds.
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn range_mut(&self, range: Range<usize>) -> &mut [u8] {
        assert!(
            range.start <= range.end && range.end <= self.len(),
            "range {range:?} out of bounds for {} cells",
            self.len()
        );
        unsafe {
            let base = UnsafeCell::raw_get(self.cells.as_ptr().add(range.start));
            std::slice::from_raw_parts_mut(base, range.len())
        }
    }
}

impl std::fmt::Debug for SharedCells {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedCells").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exclusive_and_shared_views_agree() {
        let mut cells = SharedCells::from_slice(&[1, 2, 3, 4]);
        cells.get_mut()[2] = 9;
        assert_eq!(unsafe { cells.as_slice() }, &[1, 2, 9, 4]);
    }

    #[test]
    fn disjoint_ranges_write_independently() {
        let cells = SharedCells::zeroed(6);
        let (a, b) = unsafe { (cells.range_mut(0..3), cells.range_mut(3..6)) };
        a.fill(1);
        b.fill(2);
        assert_eq!(unsafe { cells.as_slice() }, &[1, 1, 1, 2, 2, 2]);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn range_past_the_end_panics() {
        let cells = SharedCells::zeroed(4);
        let _ = unsafe { cells.range_mut(2..5) };
    }
}
