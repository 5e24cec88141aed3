// runner.rs - Run loop pacing steps, reporting population and deciding when to stop

use std::time::Duration;

use conway::CycleDetector;
use tokio::sync::watch;

use crate::config::RunConfig;
use crate::engine::Engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Reached `run.generations`.
    GenerationLimit,
    /// The board repeated one of its recent states.
    Cycle,
    /// A stop was requested through the watch channel.
    Requested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub generation: u64,
    pub population: usize,
    pub reason: StopReason,
}

pub struct Runner {
    engine: Engine,
    config: RunConfig,
    cycles: CycleDetector,
}

impl Runner {
    pub fn new(engine: Engine, config: RunConfig) -> Self {
        Self {
            engine,
            config,
            cycles: CycleDetector::new(),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn into_engine(self) -> Engine {
        self.engine
    }

    /// Steps until a limit, a cycle, or `stop` turning true.
    ///
    /// `stop` is only checked between steps, so a step that has started
    /// always completes and is published.
    pub async fn run(&mut self, mut stop: watch::Receiver<bool>) -> conway_coro::Result<RunSummary> {
        let mut ticker = (self.config.interval_ms > 0).then(|| {
            let mut ticker = tokio::time::interval(Duration::from_millis(self.config.interval_ms));
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            ticker
        });
        if self.config.stop_on_cycle {
            self.cycles.observe(self.engine.cells());
        }
        log::info!(
            "running {} engine from generation {} (population {})",
            self.engine.name(),
            self.engine.generation(),
            self.engine.population()
        );

        let reason = loop {
            if *stop.borrow() {
                break StopReason::Requested;
            }
            if self
                .config
                .generations
                .is_some_and(|limit| self.engine.generation() >= limit)
            {
                break StopReason::GenerationLimit;
            }

            match ticker.as_mut() {
                Some(ticker) => {
                    tokio::select! {
                        _ = ticker.tick() => {}
                        Ok(()) = stop.changed() => continue,
                    }
                }
                // Let the stop signal's task run between back-to-back steps.
                None => tokio::task::yield_now().await,
            }

            let generation = self.engine.step().await?;
            if generation % self.config.report_every.max(1) == 0 {
                log::info!(
                    "generation {generation}: population {}",
                    self.engine.population()
                );
            }

            if self.config.stop_on_cycle && self.cycles.observe(self.engine.cells()) {
                log::info!("board repeats a recent state at generation {generation}");
                break StopReason::Cycle;
            }
        };

        let summary = RunSummary {
            generation: self.engine.generation(),
            population: self.engine.population(),
            reason,
        };
        log::info!(
            "stopped at generation {} ({:?}), population {}",
            summary.generation,
            summary.reason,
            summary.population
        );
        Ok(summary)
    }
}
