//! Benchmark harness: store and file round trips over a synthetic element tree.

use crate::core::db::Database;
use crate::core::db::error::DatabaseError;
use crate::core::file_storage::error::FileStorageError;
use crate::core::file_storage::{FileStorage, remove_dir_if_empty};
use crate::types::{BenchConfig, BudgetMode, ElemId, HasId, TreeElem, flatten, generate_tree};
use error::BenchError;
use rayon::ThreadPool;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub(crate) mod db;
pub(crate) mod file_storage;
pub(crate) mod parallel;
mod timer;

pub use timer::{Phase, PhaseReport};
use timer::PhaseTimer;

pub mod error {
    use super::*;
    use crate::types::ElemIdError;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum BenchError {
        #[error("Database error: {0}")]
        Database(#[from] DatabaseError),

        #[error("File storage error: {0}")]
        FileStorage(#[from] FileStorageError),

        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),

        #[error("Thread pool error: {0}")]
        ThreadPool(#[from] rayon::ThreadPoolBuildError),

        #[error("Invalid config: {}", .0.join("; "))]
        InvalidConfig(Vec<String>),

        #[error("Invalid element id {id:?}: {source}")]
        InvalidId { id: String, source: ElemIdError },

        #[error("Element {id} not found")]
        Missing { id: String },

        #[error("Element {id} has name {found:?}, expected {expected:?}")]
        NameMismatch {
            id: String,
            expected: String,
            found: String,
        },

        #[error("{phase} phase took {elapsed:?}, budget is {budget:?}")]
        BudgetExceeded {
            phase: Phase,
            elapsed: Duration,
            budget: Duration,
        },

        #[error("Store file still exists after teardown: {}", .0.display())]
        StoreNotRemoved(PathBuf),
    }
}

/// Prefix of the store file name; a random UUID follows.
pub const STORE_FILE_PREFIX: &str = "PerformanceTestDB_";

pub struct Harness {
    config: BenchConfig,
    pool: ThreadPool,
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct BenchReport {
    pub node_count: usize,
    pub store_path: PathBuf,
    pub phases: Vec<PhaseReport>,
}

impl BenchReport {
    pub fn phase(&self, phase: Phase) -> Option<&PhaseReport> {
        self.phases.iter().find(|p| p.phase == phase)
    }

    pub fn within_budget(&self) -> bool {
        self.phases.iter().all(PhaseReport::within_budget)
    }
}

fn checked_id(elem: &TreeElem) -> Result<ElemId, BenchError> {
    elem.elem_id().map_err(|source| BenchError::InvalidId {
        id: elem.id.clone(),
        source,
    })
}

fn verify_name(expected: &TreeElem, found: &TreeElem) -> Result<(), BenchError> {
    if expected.name != found.name {
        return Err(BenchError::NameMismatch {
            id: expected.id.clone(),
            expected: expected.name.clone(),
            found: found.name.clone(),
        });
    }
    Ok(())
}

impl Harness {
    pub fn new(config: BenchConfig) -> Result<Self, BenchError> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(BenchError::InvalidConfig(errors));
        }

        let pool = parallel::build_pool(config.workers)?;
        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Generates the tree, runs the four phases in order and removes every artifact.
    ///
    /// A failed phase still triggers a best-effort teardown before its error is returned.
    pub fn run(&self) -> Result<BenchReport, BenchError> {
        let tree = generate_tree(&self.config.layers);
        let nodes = flatten(&tree);

        let test_folder = self.config.test_folder();
        std::fs::create_dir_all(&test_folder)?;
        debug!(path = %test_folder.display(), nodes = nodes.len(), "test folder ready");

        let store_path = test_folder.join(format!("{}{}", STORE_FILE_PREFIX, Uuid::new_v4()));
        let files = FileStorage { root: test_folder };

        let phases = match self.run_phases(&nodes, &store_path, &files) {
            Ok(phases) => phases,
            Err(err) => {
                if let Err(cleanup) = self.teardown(&nodes, &store_path, &files) {
                    warn!(error = %cleanup, "cleanup after failed run did not complete");
                }
                return Err(err);
            }
        };

        self.teardown(&nodes, &store_path, &files)?;

        info!(nodes = nodes.len(), "benchmark finished");
        Ok(BenchReport {
            node_count: nodes.len(),
            store_path,
            phases,
        })
    }

    fn run_phases(
        &self,
        nodes: &[&TreeElem],
        store_path: &Path,
        files: &FileStorage,
    ) -> Result<Vec<PhaseReport>, BenchError> {
        let mut phases = Vec::with_capacity(4);

        {
            let db = Database::create(store_path)?;
            phases.push(self.insert_into_db(&db, nodes)?);
            phases.push(self.read_from_db(&db, nodes)?);
        }

        phases.push(self.write_files(files, nodes)?);
        phases.push(self.read_files(files, nodes)?);
        Ok(phases)
    }

    fn check_budget(&self, report: PhaseReport) -> Result<PhaseReport, BenchError> {
        if report.within_budget() {
            return Ok(report);
        }

        match self.config.budget_mode {
            BudgetMode::Enforce => Err(BenchError::BudgetExceeded {
                phase: report.phase,
                elapsed: report.elapsed,
                budget: report.budget,
            }),
            BudgetMode::Report => {
                warn!(
                    phase = %report.phase,
                    elapsed_ms = report.elapsed.as_millis() as u64,
                    budget_ms = report.budget.as_millis() as u64,
                    "phase exceeded its budget"
                );
                Ok(report)
            }
        }
    }
}

/// Phases.
impl Harness {
    pub(crate) fn insert_into_db(
        &self,
        db: &Database,
        nodes: &[&TreeElem],
    ) -> Result<PhaseReport, BenchError> {
        let timer = PhaseTimer::start(Phase::Insert);
        parallel::par_exec(&self.pool, nodes, |elem| -> Result<(), BenchError> {
            let id = checked_id(elem)?;
            db.insert(&id, elem)?;
            Ok(())
        })?;
        db.flush()?;
        self.check_budget(timer.finish(self.config.budgets.insert()))
    }

    pub(crate) fn read_from_db(
        &self,
        db: &Database,
        nodes: &[&TreeElem],
    ) -> Result<PhaseReport, BenchError> {
        let timer = PhaseTimer::start(Phase::Read);
        parallel::par_exec(&self.pool, nodes, |elem| -> Result<(), BenchError> {
            let id = checked_id(elem)?;
            let found = db.get(&id)?.ok_or_else(|| BenchError::Missing {
                id: elem.id.clone(),
            })?;
            verify_name(elem, &found)
        })?;
        self.check_budget(timer.finish(self.config.budgets.read()))
    }

    pub(crate) fn write_files(
        &self,
        files: &FileStorage,
        nodes: &[&TreeElem],
    ) -> Result<PhaseReport, BenchError> {
        let timer = PhaseTimer::start(Phase::FileWrite);
        parallel::par_exec(&self.pool, nodes, |elem| -> Result<(), BenchError> {
            let id = checked_id(elem)?;
            files.write_elem(&id, elem)?;
            Ok(())
        })?;
        self.check_budget(timer.finish(self.config.budgets.file_write()))
    }

    pub(crate) fn read_files(
        &self,
        files: &FileStorage,
        nodes: &[&TreeElem],
    ) -> Result<PhaseReport, BenchError> {
        let timer = PhaseTimer::start(Phase::FileRead);
        parallel::par_exec(&self.pool, nodes, |elem| -> Result<(), BenchError> {
            let id = checked_id(elem)?;
            let found = files.read_elem(&id)?;
            verify_name(elem, &found)
        })?;
        self.check_budget(timer.finish(self.config.budgets.file_read()))
    }
}

/// Teardown.
impl Harness {
    /// Deletes every element file, the store file and, if nothing else is left, the test folder.
    ///
    /// Safe to call repeatedly. Elements with invalid ids are skipped, since no
    /// artifact can exist for them.
    pub(crate) fn teardown(
        &self,
        nodes: &[&TreeElem],
        store_path: &Path,
        files: &FileStorage,
    ) -> Result<(), BenchError> {
        parallel::par_exec(&self.pool, nodes, |elem| -> Result<(), BenchError> {
            let Ok(id) = elem.elem_id() else {
                return Ok(());
            };
            files.remove_elem(&id)?;
            Ok(())
        })?;

        let removed = Database::remove_file(store_path)?;
        if store_path.exists() {
            return Err(BenchError::StoreNotRemoved(store_path.to_path_buf()));
        }
        debug!(path = %store_path.display(), removed, "store file deleted");

        if remove_dir_if_empty(&files.root)? {
            debug!(path = %files.root.display(), "test folder removed");
        }
        Ok(())
    }
}
