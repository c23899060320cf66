//! Bundle archive for the bulk upload path.
//!
//! One [`ArchiveBuilder`] is created per run and handed explicitly to every
//! formatter call that runs in bundle mode.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::Error;

/// File name of the scratch archive, also used as the multipart file name.
pub const ARCHIVE_FILE_NAME: &str = "multipleAPIfiles.zip";

#[derive(Debug, Default)]
pub struct ArchiveBuilder {
    entries: Vec<(String, Vec<u8>)>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry. A later entry with the same name replaces the earlier one.
    pub fn add(&mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        let name = name.into();
        let bytes = bytes.into();
        if let Some(existing) = self.entries.iter_mut().find(|(entry, _)| *entry == name) {
            warn!(entry = %name, "[BULK] Duplicate entry name, keeping the later document");
            existing.1 = bytes;
            return;
        }
        debug!(entry = %name, size = bytes.len(), "[BULK] Adding entry to archive");
        self.entries.push((name, bytes));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Serializes all entries into one zip byte-stream.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, bytes) in &self.entries {
            writer.start_file(name.as_str(), options)?;
            writer
                .write_all(bytes)
                .map_err(|e| Error::Archive(e.into()))?;
        }
        Ok(writer.finish()?.into_inner())
    }

    /// Writes the archive to `dir/multipleAPIfiles.zip`, replacing any stale copy.
    pub fn write_scratch(&self, dir: &Path) -> Result<ScratchArchive, Error> {
        let bytes = self.to_bytes()?;
        let path = dir.join(ARCHIVE_FILE_NAME);
        std::fs::write(&path, &bytes).map_err(|e| Error::io(&path, e))?;
        info!(
            path = %path.display(),
            entries = self.entries.len(),
            size = bytes.len(),
            "[BULK] Wrote scratch archive"
        );
        Ok(ScratchArchive { path, bytes })
    }
}

/// The finalized archive on disk together with its bytes.
#[derive(Debug)]
pub struct ScratchArchive {
    path: PathBuf,
    bytes: Vec<u8>,
}

impl ScratchArchive {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Deletes the scratch file. Failure is fatal for the run.
    pub fn remove(self) -> Result<(), Error> {
        std::fs::remove_file(&self.path).map_err(|e| Error::io(&self.path, e))?;
        debug!(path = %self.path.display(), "[BULK] Removed scratch archive");
        Ok(())
    }
}
