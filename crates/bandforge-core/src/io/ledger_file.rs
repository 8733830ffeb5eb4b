use std::fs::{File, OpenOptions, TryLockError};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{BandforgeError, Result};
use crate::ledger::{LedgerFormat, LedgerSink, LedgerWriter, MetadataRecord};

/// Append-mode ledger file owned by a single writer.
///
/// Opening takes an exclusive advisory lock on the ledger file itself and fails
/// with `LedgerLocked` while another handle holds it. The operating system
/// drops the lock when the handle is closed, including when the process is
/// killed, so an interrupted run never blocks the next one. Existing contents
/// are never truncated, so repeated runs grow the file.
///
/// An append that fails part way (disk full) is rolled back to the previous
/// file length. If that truncation fails as well, the partial block stays and a
/// warning is logged.
pub struct LedgerFile {
    path: PathBuf,
    writer: LedgerWriter<File>,
}

impl LedgerFile {
    pub fn open(path: impl Into<PathBuf>, format: LedgerFormat) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        match file.try_lock() {
            Ok(()) => {}
            Err(TryLockError::WouldBlock) => return Err(BandforgeError::LedgerLocked(path)),
            Err(TryLockError::Error(e)) => return Err(e.into()),
        }
        info!(path = %path.display(), %format, "Opened ledger for append");

        Ok(Self {
            path,
            writer: LedgerWriter::new(file, format),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records appended since this handle was opened.
    pub fn appended(&self) -> usize {
        self.writer.appended()
    }
}

impl LedgerSink for LedgerFile {
    fn append(&mut self, record: MetadataRecord) -> Result<()> {
        let committed = self.writer.get_ref().metadata()?.len();
        let result = self.writer.append(record);
        if result.is_err() {
            if let Err(e) = self.writer.get_ref().set_len(committed) {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to roll back partial ledger record"
                );
            }
        }
        result
    }
}
