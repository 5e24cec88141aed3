// coordinator.rs - Scatter/gather stepping over a pool of worker tasks
//
// Each step moves through Idle -> Dispatching -> AwaitingAll -> Joined -> Idle.
// The front buffer is only read while a step is in flight and the back buffer
// is only written, by disjoint row ranges. Nothing is published until every
// dispatched job has acknowledged.
//
// There is no timeout: a worker that never finishes stalls the generation.

use std::sync::Arc;

use conway::{partition, DoubleBuffer, Grid, Kernel};
use tokio::sync::oneshot;

use crate::error::{Error, Result};
use crate::shared::SharedCells;
use crate::worker::{StepJob, Worker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No step in flight.
    Idle,
    /// Partitioning rows and sending one job per worker.
    Dispatching,
    /// Waiting for every dispatched job to acknowledge.
    AwaitingAll,
    /// All jobs done; buffers are being swapped.
    Joined,
}

/// Worker count leaving one core to the coordinating thread:
/// `max(available_parallelism - 1, 1)`.
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1).max(1))
        .unwrap_or(1)
}

#[derive(Debug)]
struct Pending {
    worker: usize,
    ack: oneshot::Receiver<()>,
}

#[derive(Debug)]
pub struct Coordinator {
    width: usize,
    height: usize,
    generation: u64,
    kernel: Kernel,
    buffers: DoubleBuffer<Arc<SharedCells>>,
    workers: Vec<Worker>,
    pending: Vec<Pending>,
    failure: Option<Error>,
    phase: Phase,
}

impl Coordinator {
    /// Copies `seed` into the front buffer and spawns `workers` worker tasks
    /// on the current tokio runtime.
    pub fn new(seed: &Grid, kernel: Kernel, workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(Error::NoWorkers);
        }
        tokio::runtime::Handle::try_current().map_err(|_| Error::NoRuntime)?;

        let front = Arc::new(SharedCells::from_slice(seed.cells()));
        let back = Arc::new(SharedCells::zeroed(seed.area()));
        let workers: Vec<Worker> = (0..workers).map(Worker::spawn).collect();
        log::info!(
            "coordinator ready: {}x{} grid, {} workers",
            seed.width(),
            seed.height(),
            workers.len()
        );

        Ok(Self {
            width: seed.width(),
            height: seed.height(),
            generation: seed.generation(),
            kernel,
            buffers: DoubleBuffer::new(front, back),
            workers,
            pending: Vec::new(),
            failure: None,
            phase: Phase::Idle,
        })
    }

    /// Same as [`Coordinator::new`] with [`default_worker_count`] workers.
    pub fn with_default_workers(seed: &Grid, kernel: Kernel) -> Result<Self> {
        Self::new(seed, kernel, default_worker_count())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Slot (0 or 1) holding the current generation.
    pub fn front_index(&self) -> usize {
        self.buffers.front_index()
    }

    /// The current generation's cells, row-major.
    pub fn cells(&self) -> &[u8] {
        // SAFETY: workers only ever write the back buffer, and the front is
        // written only through `Arc::get_mut` under `&mut self`.
        unsafe { self.buffers.front().as_slice() }
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        (x < self.width && y < self.height).then(|| self.cells()[x + y * self.width])
    }

    pub fn population(&self) -> usize {
        self.cells().iter().filter(|&&v| v != 0).count()
    }

    /// Copy of the current generation.
    pub fn snapshot(&self) -> Result<Grid> {
        let mut grid = Grid::from_cells(self.width, self.height, self.cells().to_vec())?;
        grid.set_generation(self.generation);
        Ok(grid)
    }

    /// Mutable access to the current generation. Fails while a step is in
    /// flight, since workers are still reading it.
    pub fn cells_mut(&mut self) -> Result<&mut [u8]> {
        if self.phase != Phase::Idle {
            return Err(Error::StepInFlight);
        }
        Arc::get_mut(self.buffers.front_mut())
            .map(SharedCells::get_mut)
            .ok_or(Error::StepInFlight)
    }

    /// Replaces the current generation, including its generation counter.
    pub fn load(&mut self, grid: &Grid) -> Result<()> {
        if (grid.width(), grid.height()) != (self.width, self.height) {
            return Err(conway::Error::DimensionMismatch {
                expected: (self.width, self.height),
                actual: (grid.width(), grid.height()),
            }
            .into());
        }
        self.cells_mut()?.copy_from_slice(grid.cells());
        self.generation = grid.generation();
        Ok(())
    }

    /// Advances one generation and returns the new generation number.
    ///
    /// If a previous `step` was dropped after dispatching, that step is
    /// completed and published first.
    pub async fn step(&mut self) -> Result<u64> {
        self.settle().await?;
        self.dispatch();
        self.join().await
    }

    /// Advances `generations` steps.
    pub async fn run(&mut self, generations: u64) -> Result<u64> {
        for _ in 0..generations {
            self.step().await?;
        }
        Ok(self.generation)
    }

    /// Completes a step left in flight by a dropped `step` future. Does
    /// nothing when idle.
    pub async fn settle(&mut self) -> Result<()> {
        if self.phase == Phase::Idle {
            return Ok(());
        }
        log::debug!("completing in-flight step {}", self.generation + 1);
        self.join().await.map(|_| ())
    }

    /// Finishes any in-flight step and stops every worker.
    pub async fn shutdown(mut self) -> Result<()> {
        let settled = self.settle().await;
        for worker in self.workers.drain(..) {
            worker.stop().await;
        }
        log::info!("coordinator stopped at generation {}", self.generation);
        settled
    }

    fn dispatch(&mut self) {
        self.phase = Phase::Dispatching;
        let ranges = partition(self.width, self.height, self.workers.len());
        let source = self.buffers.front();
        let dest = self.buffers.back();

        for (worker, range) in self.workers.iter().zip(ranges) {
            let (done, ack) = oneshot::channel();
            let job = StepJob {
                source: Arc::clone(source),
                dest: Arc::clone(dest),
                width: self.width,
                height: self.height,
                range,
                kernel: self.kernel,
                done,
            };
            match worker.dispatch(job) {
                Ok(()) => self.pending.push(Pending {
                    worker: worker.id(),
                    ack,
                }),
                Err(e) => {
                    log::warn!("{e}");
                    self.failure.get_or_insert(e);
                }
            }
        }
        self.phase = Phase::AwaitingAll;
    }

    /// Barrier over every pending acknowledgement. An entry is removed only
    /// once its acknowledgement has resolved, so dropping this future midway
    /// loses nothing.
    async fn join(&mut self) -> Result<u64> {
        while let Some(pending) = self.pending.last_mut() {
            let outcome = (&mut pending.ack).await;
            let worker = pending.worker;
            self.pending.pop();
            if outcome.is_err() {
                log::warn!("worker {worker} dropped its job for generation {}", self.generation + 1);
                self.failure.get_or_insert(Error::WorkerLost { worker });
            }
        }

        if let Some(e) = self.failure.take() {
            self.phase = Phase::Idle;
            return Err(e);
        }

        self.phase = Phase::Joined;
        self.buffers.swap();
        self.generation += 1;
        self.phase = Phase::Idle;
        log::debug!("parallel step -> generation {}", self.generation);
        Ok(self.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blinker() -> Grid {
        let mut grid = Grid::new(10, 10).unwrap();
        for x in 3..6 {
            grid.set(x, 4, 1).unwrap();
        }
        grid
    }

    #[test]
    fn needs_a_runtime() {
        assert!(matches!(
            Coordinator::new(&blinker(), Kernel::default(), 2),
            Err(Error::NoRuntime)
        ));
    }

    #[tokio::test]
    async fn needs_at_least_one_worker() {
        assert!(matches!(
            Coordinator::new(&blinker(), Kernel::default(), 0),
            Err(Error::NoWorkers)
        ));
    }

    #[test]
    fn default_worker_count_is_positive() {
        assert!(default_worker_count() >= 1);
    }

    #[tokio::test]
    async fn step_returns_to_idle_and_swaps() {
        let mut coordinator = Coordinator::new(&blinker(), Kernel::default(), 3).unwrap();
        assert_eq!(coordinator.phase(), Phase::Idle);

        assert_eq!(coordinator.step().await.unwrap(), 1);
        assert_eq!(coordinator.phase(), Phase::Idle);
        assert_eq!(coordinator.front_index(), 1);
        for y in 3..6 {
            assert_eq!(coordinator.get(4, y), Some(1));
        }
        assert_eq!(coordinator.population(), 3);

        coordinator.step().await.unwrap();
        assert_eq!(coordinator.front_index(), 0);
        assert_eq!(coordinator.snapshot().unwrap().cells(), blinker().cells());
        coordinator.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn dropped_step_is_completed_before_the_next() {
        let mut coordinator = Coordinator::new(&blinker(), Kernel::default(), 3).unwrap();

        // On a current-thread runtime the workers cannot run until this task
        // yields, so the first poll leaves every job in flight.
        tokio::select! {
            biased;
            _ = coordinator.step() => panic!("step finished before its workers ran"),
            _ = std::future::ready(()) => {}
        }
        assert_eq!(coordinator.phase(), Phase::AwaitingAll);
        assert_eq!(coordinator.generation(), 0);
        assert!(matches!(coordinator.load(&blinker()), Err(Error::StepInFlight)));
        assert!(matches!(coordinator.cells_mut(), Err(Error::StepInFlight)));

        // The current generation stays readable meanwhile.
        assert_eq!(coordinator.cells(), blinker().cells());

        assert_eq!(coordinator.step().await.unwrap(), 2);
        assert_eq!(coordinator.cells(), blinker().cells());
        coordinator.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn lost_worker_fails_the_step_without_publishing() {
        let mut coordinator = Coordinator::new(&blinker(), Kernel::default(), 3).unwrap();

        tokio::select! {
            biased;
            _ = coordinator.step() => panic!("step finished before its workers ran"),
            _ = std::future::ready(()) => {}
        }
        // Worker 1 dies with its job still queued, so its ack is dropped.
        coordinator.workers[1].abort();

        assert!(matches!(
            coordinator.settle().await,
            Err(Error::WorkerLost { worker: 1 })
        ));
        assert!(coordinator.pending.is_empty());
        assert_eq!(coordinator.phase(), Phase::Idle);
        assert_eq!(coordinator.generation(), 0);
        assert_eq!(coordinator.front_index(), 0);
        assert_eq!(coordinator.cells(), blinker().cells());

        // Its channel is closed now; the surviving workers are still joined.
        assert!(matches!(
            coordinator.step().await,
            Err(Error::WorkerUnavailable { worker: 1 })
        ));
        assert!(coordinator.pending.is_empty());
        assert_eq!(coordinator.phase(), Phase::Idle);
        assert_eq!(coordinator.generation(), 0);
        assert_eq!(coordinator.cells(), blinker().cells());
        coordinator.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn load_checks_dimensions_and_resets_generation() {
        let mut coordinator = Coordinator::new(&blinker(), Kernel::default(), 2).unwrap();
        coordinator.run(5).await.unwrap();

        let other = Grid::new(4, 10).unwrap();
        assert!(matches!(
            coordinator.load(&other),
            Err(Error::Grid(conway::Error::DimensionMismatch { .. }))
        ));

        coordinator.load(&Grid::new(10, 10).unwrap()).unwrap();
        assert_eq!(coordinator.generation(), 0);
        assert_eq!(coordinator.population(), 0);
    }

    #[tokio::test]
    async fn edits_land_in_the_current_generation() {
        let mut coordinator = Coordinator::new(&Grid::new(6, 6).unwrap(), Kernel::default(), 2).unwrap();
        let cells = coordinator.cells_mut().unwrap();
        // Block still life.
        for i in [7, 8, 13, 14] {
            cells[i] = 1;
        }
        coordinator.run(4).await.unwrap();
        assert_eq!(coordinator.population(), 4);
        assert_eq!(coordinator.get(1, 1), Some(1));
    }
}
