// engine.rs - Backend selection and initial board construction

use conway::{Grid, Kernel, Pattern, Stepper};
use conway_coro::Coordinator;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::{Backend, EngineConfig, WorldConfig};

/// Builds the generation-0 board described by `world`: a centred pattern if
/// one is named, otherwise uniform random cells. Returns the grid and the
/// random seed used, so unseeded runs can be reproduced.
pub fn seed_grid(world: &WorldConfig) -> conway::Result<(Grid, Option<u64>)> {
    let mut grid = Grid::new(world.width, world.height)?;
    if let Some(name) = &world.pattern {
        Pattern::find(name)?.apply(&mut grid);
        return Ok((grid, None));
    }

    let seed = world.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    grid.randomize(world.density, &mut rng);
    Ok((grid, Some(seed)))
}

/// Either stepping backend behind one interface.
#[derive(Debug)]
pub enum Engine {
    Sequential(Stepper),
    Parallel(Coordinator),
}

impl Engine {
    /// Must be called inside a tokio runtime for the parallel backend.
    pub fn new(seed: Grid, kernel: Kernel, config: &EngineConfig) -> conway_coro::Result<Self> {
        Ok(match config.backend {
            Backend::Sequential => Engine::Sequential(Stepper::new(seed, kernel)),
            Backend::Parallel => {
                let coordinator = match config.workers {
                    Some(workers) => Coordinator::new(&seed, kernel, workers)?,
                    None => Coordinator::with_default_workers(&seed, kernel)?,
                };
                Engine::Parallel(coordinator)
            }
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Engine::Sequential(_) => "sequential",
            Engine::Parallel(_) => "parallel",
        }
    }

    pub async fn step(&mut self) -> conway_coro::Result<u64> {
        match self {
            Engine::Sequential(stepper) => Ok(stepper.step()),
            Engine::Parallel(coordinator) => coordinator.step().await,
        }
    }

    pub fn cells(&self) -> &[u8] {
        match self {
            Engine::Sequential(stepper) => stepper.grid().cells(),
            Engine::Parallel(coordinator) => coordinator.cells(),
        }
    }

    pub fn generation(&self) -> u64 {
        match self {
            Engine::Sequential(stepper) => stepper.generation(),
            Engine::Parallel(coordinator) => coordinator.generation(),
        }
    }

    pub fn population(&self) -> usize {
        self.cells().iter().filter(|&&v| v != 0).count()
    }

    pub async fn shutdown(self) -> conway_coro::Result<()> {
        match self {
            Engine::Sequential(_) => Ok(()),
            Engine::Parallel(coordinator) => coordinator.shutdown().await,
        }
    }
}
