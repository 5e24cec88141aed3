// stepper.rs - Single-threaded double-buffered stepper

use crate::buffer::DoubleBuffer;
use crate::chunk::RowRange;
use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::kernel::Kernel;

/// Computes the next generation of `grid` into a fresh grid.
pub fn step(grid: &Grid, kernel: &Kernel) -> Grid {
    let mut next = grid.clone();
    let (width, height) = (grid.width(), grid.height());
    kernel.evolve(
        grid.cells(),
        next.cells_mut(),
        width,
        height,
        RowRange::full(width, height),
    );
    next.set_generation(grid.generation() + 1);
    next
}

/// Owns a front/back pair of grids and advances them in place.
#[derive(Debug, Clone)]
pub struct Stepper {
    buffers: DoubleBuffer<Grid>,
    kernel: Kernel,
}

impl Stepper {
    pub fn new(seed: Grid, kernel: Kernel) -> Self {
        let back = seed.clone();
        Self {
            buffers: DoubleBuffer::new(seed, back),
            kernel,
        }
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// The current generation.
    pub fn grid(&self) -> &Grid {
        self.buffers.front()
    }

    /// Mutable access to the current generation, e.g. to seed it.
    pub fn grid_mut(&mut self) -> &mut Grid {
        self.buffers.front_mut()
    }

    pub fn generation(&self) -> u64 {
        self.grid().generation()
    }

    /// Slot (0 or 1) holding the current generation.
    pub fn front_index(&self) -> usize {
        self.buffers.front_index()
    }

    /// Replaces the current generation with a grid of the same shape.
    pub fn load(&mut self, grid: &Grid) -> Result<()> {
        let front = self.buffers.front_mut();
        if (front.width(), front.height()) != (grid.width(), grid.height()) {
            return Err(Error::DimensionMismatch {
                expected: (front.width(), front.height()),
                actual: (grid.width(), grid.height()),
            });
        }
        front.clone_from(grid);
        Ok(())
    }

    /// Advances one generation and returns the new generation number.
    pub fn step(&mut self) -> u64 {
        let kernel = self.kernel;
        let (current, next) = self.buffers.split();
        let (width, height) = (current.width(), current.height());
        kernel.evolve(
            current.cells(),
            next.cells_mut(),
            width,
            height,
            RowRange::full(width, height),
        );
        next.set_generation(current.generation() + 1);
        self.buffers.swap();

        let generation = self.generation();
        log::trace!("sequential step -> generation {generation}");
        generation
    }

    /// Advances `generations` steps.
    pub fn run(&mut self, generations: u64) -> u64 {
        for _ in 0..generations {
            self.step();
        }
        self.generation()
    }
}
