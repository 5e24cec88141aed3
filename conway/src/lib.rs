// lib.rs - Toroidal Conway's Game of Life: grid, rule and step kernel
//
// The parallel coordinator lives in `conway_coro`; everything here is
// single-threaded and shared by both backends.

pub mod buffer;
pub mod chunk;
pub mod error;
pub mod grid;
pub mod history;
pub mod kernel;
pub mod patterns;
pub mod rules;
pub mod stepper;

pub use buffer::DoubleBuffer;
pub use chunk::{assert_exact_cover, partition, RowRange};
pub use error::{Error, Result};
pub use grid::{Grid, NoiseField, DEFAULT_NOISE_SCALE};
pub use history::CycleDetector;
pub use kernel::{Kernel, Tally};
pub use patterns::{Pattern, PATTERNS};
pub use rules::{CellEncoding, Rule};
pub use stepper::{step, Stepper};
