pub mod core;
pub mod types;

pub use crate::core::{BenchReport, Harness, Phase, PhaseReport};
