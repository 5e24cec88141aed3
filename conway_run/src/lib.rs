// lib.rs - Headless runner for the toroidal Game of Life
//
// Wires a YAML config to either the sequential stepper or the parallel
// coordinator and drives it until a generation limit, a repeated board or a
// stop request.

pub mod config;
pub mod engine;
pub mod runner;

pub use config::{Backend, Config};
pub use engine::{seed_grid, Engine};
pub use runner::{RunSummary, Runner, StopReason};
