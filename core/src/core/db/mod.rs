//! Database layer: one redb file holding the `elements` table (id → StoredElem).

use crate::core::db::error::DatabaseError;
use crate::types::stored::StoredElem;
use crate::types::{ElemId, TreeElem};
use redb::{Durability, ReadableDatabase, ReadableTable, TableDefinition};
use std::io::ErrorKind;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

pub mod error {
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum DatabaseError {
        #[error("Database error: {0}")]
        Redb(#[from] redb::DatabaseError),

        #[error("Table error: {0}")]
        TableError(#[from] redb::TableError),

        #[error("Storage error: {0}")]
        StorageError(#[from] redb::StorageError),

        #[error("Transaction error: {0}")]
        TransactionError(#[from] redb::TransactionError),

        #[error("Commit error: {0}")]
        CommitError(#[from] redb::CommitError),

        #[error("Durability error: {0}")]
        SetDurability(#[from] redb::SetDurabilityError),

        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),

        #[error("Element already exists: {0}")]
        AlreadyExists(String),
    }
}

const ELEMENTS_TABLE: TableDefinition<&str, StoredElem> = TableDefinition::new("elements");

/// Inserts are grouped into write transactions of this many rows.
pub const COMMIT_BATCH: usize = 256;

/// Element collection backed by a single redb file.
///
/// All methods take `&self`; the handle is shared by every worker of a phase.
/// Inserts from concurrent workers are buffered and committed in batches of
/// [`COMMIT_BATCH`] without fsync; [`Database::flush`] commits the remainder
/// durably. Rows are visible to [`Database::get`] once their batch commits.
pub struct Database {
    db: redb::Database,
    pending: Mutex<Vec<(ElemId, StoredElem)>>,
}

impl Database {
    /// Creates or opens the store file at `path`.
    pub fn create(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = redb::Database::create(path)?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ELEMENTS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self {
            db,
            pending: Mutex::new(Vec::with_capacity(COMMIT_BATCH)),
        })
    }

    /// Deletes a store file. The handle must already be dropped.
    ///
    /// Returns `Ok(false)` if the file was already gone.
    pub fn remove_file(path: &Path) -> Result<bool, DatabaseError> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Write operations.
impl Database {
    /// Queues one element. The caller that fills a batch commits it.
    ///
    /// Returns `Err(AlreadyExists)` from the commit that meets a duplicate id;
    /// that whole batch is discarded.
    pub fn insert(&self, id: &ElemId, elem: &TreeElem) -> Result<(), DatabaseError> {
        let batch = {
            let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            pending.push((id.clone(), StoredElem::from(elem)));
            if pending.len() < COMMIT_BATCH {
                return Ok(());
            }
            std::mem::replace(&mut *pending, Vec::with_capacity(COMMIT_BATCH))
        };

        self.commit(batch, Durability::None)
    }

    /// Commits everything still queued and makes all earlier batches durable.
    pub fn flush(&self) -> Result<(), DatabaseError> {
        let batch = {
            let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *pending)
        };
        self.commit(batch, Durability::Immediate)
    }

    fn commit(
        &self,
        batch: Vec<(ElemId, StoredElem)>,
        durability: Durability,
    ) -> Result<(), DatabaseError> {
        let mut write_txn = self.db.begin_write()?;
        write_txn.set_durability(durability)?;

        {
            let mut table = write_txn.open_table(ELEMENTS_TABLE)?;

            for (id, row) in &batch {
                if table.insert(id.as_str(), row)?.is_some() {
                    return Err(DatabaseError::AlreadyExists(id.to_string()));
                }
            }
        }

        write_txn.commit()?;
        Ok(())
    }
}

/// Read operations.
impl Database {
    /// Point lookup by id.
    pub fn get(&self, id: &ElemId) -> Result<Option<TreeElem>, DatabaseError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ELEMENTS_TABLE)?;

        match table.get(id.as_str())? {
            None => Ok(None),
            Some(guard) => Ok(Some(guard.value().into_elem(id))),
        }
    }

    /// Number of committed rows.
    #[cfg(test)]
    pub fn len(&self) -> Result<u64, DatabaseError> {
        use redb::ReadableTableMetadata;

        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ELEMENTS_TABLE)?;
        Ok(table.len()?)
    }
}
