// worker.rs - Long-lived worker task evaluating one row range per job

use std::sync::Arc;

use conway::{Kernel, RowRange};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::error::{Error, Result};
use crate::shared::SharedCells;

/// One worker's share of a generation. Fully describes the job: the worker
/// keeps nothing between jobs.
pub struct StepJob {
    pub source: Arc<SharedCells>,
    pub dest: Arc<SharedCells>,
    pub width: usize,
    pub height: usize,
    pub range: RowRange,
    pub kernel: Kernel,
    /// Bare acknowledgement; the output is the mutated `dest` range.
    pub done: oneshot::Sender<()>,
}

impl StepJob {
    /// Evaluates the job's rows, yielding to the scheduler between rows.
    async fn execute(self) {
        let StepJob {
            source,
            dest,
            width,
            height,
            range,
            kernel,
            done,
        } = self;

        for y in range.rows(width) {
            {
                // SAFETY: the coordinator never writes `source` while jobs are
                // in flight, and hands out non-overlapping ranges of `dest`
                // that no one reads until every job has acknowledged.
                let src = unsafe { source.as_slice() };
                let row = unsafe { dest.range_mut(y * width..(y + 1) * width) };
                kernel.evolve_row(src, row, width, height, y);
            }
            tokio::task::yield_now().await;
        }

        // Release the buffers before acknowledging so the coordinator holds
        // the only handles once it has joined.
        drop(source);
        drop(dest);
        let _ = done.send(());
    }
}

/// Handle to a worker task. Dropping it closes the job channel, which ends
/// the task once its current job is finished.
#[derive(Debug)]
pub struct Worker {
    id: usize,
    jobs: mpsc::UnboundedSender<StepJob>,
    handle: JoinHandle<()>,
}

impl Worker {
    /// Spawns the worker task on the current tokio runtime.
    pub fn spawn(id: usize) -> Self {
        let (jobs, mut rx) = mpsc::unbounded_channel::<StepJob>();
        let handle = tokio::spawn(async move {
            log::trace!("worker {id} started");
            while let Some(job) = rx.recv().await {
                log::trace!("worker {id} evaluating [{}, {})", job.range.start, job.range.end);
                job.execute().await;
            }
            log::trace!("worker {id} stopped");
        });
        Self { id, jobs, handle }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Queues a job. Fails if the worker task is gone.
    pub fn dispatch(&self, job: StepJob) -> Result<()> {
        self.jobs
            .send(job)
            .map_err(|_| Error::WorkerUnavailable { worker: self.id })
    }

    /// Kills the task without draining its queue.
    #[cfg(test)]
    pub(crate) fn abort(&self) {
        self.handle.abort();
    }

    /// Closes the job channel and waits for the task to exit.
    pub async fn stop(self) {
        let Worker { id, jobs, handle } = self;
        drop(jobs);
        if let Err(e) = handle.await {
            log::warn!("worker {id} ended abnormally: {e}");
        }
    }
}
