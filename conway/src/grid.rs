// grid.rs - Grid type for the toroidal Game of Life
//
// Cells are stored row-major in a flat buffer: cell (x, y) lives at
// `x + y * width`. The grid itself never wraps coordinates; wraparound is
// computed per neighbor by the kernel.

use rand::Rng;

use crate::error::{Error, Result};

/// Noise coordinates are divided by this before sampling.
pub const DEFAULT_NOISE_SCALE: f64 = 200.0;

/// A 2D scalar field returning values in `[-1, 1]`, used to seed clustered
/// initial states. Any `Fn(f64, f64) -> f64` qualifies.
pub trait NoiseField {
    fn sample(&self, x: f64, y: f64) -> f64;
}

impl<F> NoiseField for F
where
    F: Fn(f64, f64) -> f64,
{
    fn sample(&self, x: f64, y: f64) -> f64 {
        self(x, y)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<u8>,
    generation: u64,
}

impl Grid {
    /// Allocates a zero-filled (all dead) grid.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let area = area(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![0; area],
            generation: 0,
        })
    }

    /// Adopts an existing row-major buffer.
    pub fn from_cells(width: usize, height: usize, cells: Vec<u8>) -> Result<Self> {
        let expected = area(width, height)?;
        if cells.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
            generation: 0,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn area(&self) -> usize {
        self.cells.len()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Stamps the grid with a generation number, e.g. when restoring a
    /// snapshot.
    pub fn set_generation(&mut self, generation: u64) {
        self.generation = generation;
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Raw mutable access; the buffer length is fixed.
    pub fn cells_mut(&mut self) -> &mut [u8] {
        &mut self.cells
    }

    pub fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| x + y * self.width)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        self.index(x, y).map(|i| self.cells[i])
    }

    pub fn is_alive(&self, x: usize, y: usize) -> bool {
        self.get(x, y).is_some_and(|v| v != 0)
    }

    pub fn set(&mut self, x: usize, y: usize, value: u8) -> Result<()> {
        let i = self.index(x, y).ok_or(Error::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })?;
        self.cells[i] = value;
        Ok(())
    }

    /// Kills every cell and resets the generation counter.
    pub fn clear(&mut self) {
        self.cells.fill(0);
        self.generation = 0;
    }

    /// Number of live cells (any non-zero value counts).
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&v| v != 0).count()
    }

    /// Sets each cell alive with independent probability `density`.
    ///
    /// `density` is clamped to `[0, 1]`; NaN seeds an empty grid.
    pub fn randomize<R: Rng + ?Sized>(&mut self, density: f64, rng: &mut R) {
        let density = density.clamp(0.0, 1.0);
        for cell in &mut self.cells {
            *cell = u8::from(rng.random::<f64>() < density);
        }
        self.generation = 0;
        log::debug!(
            "randomized {}x{} grid at density {:.2}: {} alive",
            self.width,
            self.height,
            density,
            self.population()
        );
    }

    /// Seeds a spatially clustered pattern: a cell is alive when a fresh
    /// uniform draw exceeds `|noise(x / scale, y / scale)|`.
    pub fn randomize_with_noise<N, R>(&mut self, noise: &N, scale: f64, rng: &mut R)
    where
        N: NoiseField + ?Sized,
        R: Rng + ?Sized,
    {
        for y in 0..self.height {
            for x in 0..self.width {
                let threshold = noise.sample(x as f64 / scale, y as f64 / scale).abs();
                self.cells[x + y * self.width] = u8::from(rng.random::<f64>() > threshold);
            }
        }
        self.generation = 0;
        log::debug!(
            "noise-seeded {}x{} grid (scale {}): {} alive",
            self.width,
            self.height,
            scale,
            self.population()
        );
    }
}

fn area(width: usize, height: usize) -> Result<usize> {
    match width.checked_mul(height) {
        Some(area) if area > 0 => Ok(area),
        _ => Err(Error::InvalidDimensions { width, height }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn new_grid_is_dead_and_sized() {
        let grid = Grid::new(7, 5).unwrap();
        assert_eq!(grid.area(), 35);
        assert_eq!(grid.population(), 0);
        assert_eq!(grid.generation(), 0);
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert_eq!(
            Grid::new(0, 4),
            Err(Error::InvalidDimensions { width: 0, height: 4 })
        );
        assert!(Grid::new(4, 0).is_err());
        assert!(Grid::new(usize::MAX, 2).is_err());
    }

    #[test]
    fn from_cells_checks_length() {
        assert!(Grid::from_cells(3, 3, vec![0; 9]).is_ok());
        assert_eq!(
            Grid::from_cells(3, 3, vec![0; 8]),
            Err(Error::BufferSizeMismatch {
                expected: 9,
                actual: 8
            })
        );
    }

    #[test]
    fn access_does_not_wrap() {
        let mut grid = Grid::new(4, 3).unwrap();
        grid.set(3, 2, 1).unwrap();
        assert_eq!(grid.get(3, 2), Some(1));
        assert_eq!(grid.cells()[3 + 2 * 4], 1);
        assert_eq!(grid.get(4, 0), None);
        assert!(matches!(grid.set(0, 3, 1), Err(Error::OutOfBounds { .. })));
    }

    #[test]
    fn randomize_respects_extreme_densities() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut grid = Grid::new(20, 20).unwrap();

        grid.randomize(1.0, &mut rng);
        assert_eq!(grid.population(), 400);
        grid.randomize(0.0, &mut rng);
        assert_eq!(grid.population(), 0);
        grid.randomize(3.5, &mut rng);
        assert_eq!(grid.population(), 400);
        grid.randomize(-1.0, &mut rng);
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn randomize_resets_generation_and_is_deterministic() {
        let mut a = Grid::new(32, 32).unwrap();
        let mut b = Grid::new(32, 32).unwrap();
        a.set_generation(12);
        a.randomize(0.3, &mut ChaCha8Rng::seed_from_u64(99));
        b.randomize(0.3, &mut ChaCha8Rng::seed_from_u64(99));
        assert_eq!(a.generation(), 0);
        assert_eq!(a, b);
        assert!(a.cells().iter().all(|&v| v <= 1));
    }

    #[test]
    fn noise_modulates_alive_probability() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut grid = Grid::new(16, 16).unwrap();

        // |noise| == 1 everywhere: no draw can exceed it.
        grid.randomize_with_noise(&|_: f64, _: f64| -1.0, DEFAULT_NOISE_SCALE, &mut rng);
        assert_eq!(grid.population(), 0);

        // Left half saturated, right half silent.
        let half = |x: f64, _: f64| if x < 8.0 { 1.0 } else { 0.0 };
        grid.randomize_with_noise(&half, 1.0, &mut rng);
        for y in 0..16 {
            for x in 0..8 {
                assert!(!grid.is_alive(x, y));
            }
        }
        assert!(grid.population() > 0);
    }
}
