// error.rs - Errors raised by the parallel coordinator

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Grid(#[from] conway::Error),

    /// Workers are tokio tasks and need a runtime to be spawned on.
    #[error("the coordinator must be created inside a tokio runtime")]
    NoRuntime,

    #[error("at least one worker is required")]
    NoWorkers,

    /// The grid cannot be replaced or edited while workers still read it.
    #[error("a step is in flight")]
    StepInFlight,

    #[error("worker {worker} is no longer accepting jobs")]
    WorkerUnavailable { worker: usize },

    /// A worker dropped its job without acknowledging it. The generation it
    /// belonged to was not published.
    #[error("worker {worker} exited without finishing its chunk")]
    WorkerLost { worker: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
