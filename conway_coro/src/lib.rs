// lib.rs - Parallel stepping for the toroidal Game of Life
//
// A fixed pool of worker tasks evaluates disjoint row ranges of each
// generation; the coordinator joins every worker before publishing.

pub mod coordinator;
pub mod error;
pub mod shared;
pub mod worker;

pub use coordinator::{default_worker_count, Coordinator, Phase};
pub use error::{Error, Result};
pub use shared::SharedCells;
pub use worker::{StepJob, Worker};
