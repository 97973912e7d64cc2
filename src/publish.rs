//! Snapshot output
//!
//! Writes every published snapshot to a JSON file so other processes can
//! pick up the total prices, and reads it back on startup.

use crate::error::Result;
use crate::logging::{StructuredLogger, get_logger};
use crate::sensor::PriceSnapshot;
use std::path::{Path, PathBuf};

/// Writes snapshots to disk as pretty JSON
pub struct SnapshotWriter {
    file_path: PathBuf,
    logger: StructuredLogger,
}

impl SnapshotWriter {
    pub fn new<P: AsRef<Path>>(file_path: P) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
            logger: get_logger("publish"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Load the last written snapshot, if any
    pub fn load(&self) -> Result<Option<PriceSnapshot>> {
        if !self.file_path.exists() {
            self.logger.info("No snapshot file found");
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.file_path)?;
        let snapshot = serde_json::from_str(&contents)?;
        self.logger.info("Loaded previous snapshot from disk");
        Ok(Some(snapshot))
    }

    /// Write `snapshot`, replacing the previous file atomically
    pub fn write(&self, snapshot: &PriceSnapshot) -> Result<()> {
        let contents = serde_json::to_string_pretty(snapshot)?;
        let tmp = self.file_path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &self.file_path)?;
        self.logger
            .debug(&format!("Wrote snapshot to {}", self.file_path.display()));
        Ok(())
    }
}
