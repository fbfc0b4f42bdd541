use crate::types::{ElemId, TreeElem};
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

pub mod error {
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum FileStorageError {
        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),

        #[error("JSON error: {0}")]
        Json(#[from] serde_json::Error),
    }
}

use error::FileStorageError;

/// One JSON file per element, named `<id>.elem`, inside a single directory.
pub struct FileStorage {
    pub root: PathBuf,
}

/// Removes `path` if it holds no entries. Returns `Ok(false)` when it is
/// missing or not empty, including when another run changes it between the
/// check and the removal.
pub(crate) fn remove_dir_if_empty(path: &Path) -> Result<bool, FileStorageError> {
    let mut entries = match std::fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e.into()),
    };
    if entries.next().is_some() {
        return Ok(false);
    }

    match std::fs::remove_dir(path) {
        Ok(()) => Ok(true),
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::DirectoryNotEmpty) => {
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

impl FileStorage {
    pub const EXTENSION: &'static str = "elem";

    pub fn elem_path(&self, id: &ElemId) -> PathBuf {
        self.root.join(format!("{}.{}", id, Self::EXTENSION))
    }

    pub fn write_elem(&self, id: &ElemId, elem: &TreeElem) -> Result<(), FileStorageError> {
        let mut writer = BufWriter::new(File::create(self.elem_path(id))?);
        serde_json::to_writer(&mut writer, elem)?;
        writer.flush()?;
        Ok(())
    }

    pub fn read_elem(&self, id: &ElemId) -> Result<TreeElem, FileStorageError> {
        let reader = BufReader::new(File::open(self.elem_path(id))?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Returns `Ok(false)` if the file did not exist.
    pub fn remove_elem(&self, id: &ElemId) -> Result<bool, FileStorageError> {
        match std::fs::remove_file(self.elem_path(id)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
