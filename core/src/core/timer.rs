use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Insert,
    Read,
    FileWrite,
    FileRead,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Insert => write!(f, "insert"),
            Phase::Read => write!(f, "read"),
            Phase::FileWrite => write!(f, "file write"),
            Phase::FileRead => write!(f, "file read"),
        }
    }
}

/// Wall-clock timer for one phase.
pub(crate) struct PhaseTimer {
    phase: Phase,
    started: Instant,
}

impl PhaseTimer {
    pub(crate) fn start(phase: Phase) -> Self {
        debug!(%phase, "phase started");
        Self {
            phase,
            started: Instant::now(),
        }
    }

    pub(crate) fn finish(self, budget: Duration) -> PhaseReport {
        let elapsed = self.started.elapsed();
        info!(
            phase = %self.phase,
            elapsed_ms = elapsed.as_millis() as u64,
            budget_ms = budget.as_millis() as u64,
            "phase done"
        );
        PhaseReport {
            phase: self.phase,
            elapsed,
            budget,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseReport {
    pub phase: Phase,
    pub elapsed: Duration,
    pub budget: Duration,
}

impl PhaseReport {
    pub fn within_budget(&self) -> bool {
        self.elapsed <= self.budget
    }
}

#[cfg(test)]
mod tests;
