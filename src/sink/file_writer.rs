//! Size-rotated log file
//!
//! The active file is opened lazily on the first write, appending to whatever
//! a previous run left behind. Before every write the writer checks whether
//! the write would push the file past its size limit. If so, it rotates first,
//! so one write never spans two files.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::config::RotationPolicy;
use crate::error::{LogError, Result};

use super::retention::{prune_backups_with, remove_backup, unused_backup_path};

/// Deletes an expired backup
type RemoveBackup = fn(&Path) -> io::Result<()>;

/// A log file that rotates itself once it grows past a size limit
pub struct RotatingFileWriter {
    path: PathBuf,
    policy: RotationPolicy,
    /// Rotation threshold in bytes
    max_size: u64,
    file: Option<File>,
    /// Bytes in the active file
    size: u64,
    remove: RemoveBackup,
}

impl fmt::Debug for RotatingFileWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RotatingFileWriter")
            .field("path", &self.path)
            .field("policy", &self.policy)
            .field("max_size", &self.max_size)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl RotatingFileWriter {
    /// Create a writer for `path`; nothing is opened until the first write
    pub fn new(path: impl Into<PathBuf>, policy: RotationPolicy) -> Self {
        Self {
            path: path.into(),
            max_size: policy.max_size_bytes(),
            policy,
            file: None,
            size: 0,
            remove: remove_backup,
        }
    }

    /// Override the size threshold with an exact byte count
    pub fn with_max_size_bytes(mut self, max_size: u64) -> Self {
        self.max_size = max_size.max(1);
        self
    }

    #[cfg(test)]
    fn with_remover(mut self, remove: RemoveBackup) -> Self {
        self.remove = remove;
        self
    }

    /// Full path to the active log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes written to the active file so far
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Move the active file aside and start a fresh one
    pub fn rotate(&mut self) -> Result<()> {
        self.file = None;
        self.open_new()?;
        self.prune();
        Ok(())
    }

    /// Open the file left by a previous run, rotating it if `incoming` more
    /// bytes would not fit.
    fn open_existing_or_new(&mut self, incoming: u64) -> Result<()> {
        self.prune();

        let existing = match fs::metadata(&self.path) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return self.open_new(),
            Err(source) => {
                return Err(LogError::RotationFailed {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if existing > 0 && existing + incoming > self.max_size {
            return self.rotate();
        }

        match OpenOptions::new().append(true).open(&self.path) {
            Ok(file) => {
                self.file = Some(file);
                self.size = existing;
                Ok(())
            }
            // Unreadable leftovers are rotated out of the way
            Err(_) => self.rotate(),
        }
    }

    fn open_new(&mut self) -> Result<()> {
        if self.path.exists() {
            let backup = unused_backup_path(&self.path, Utc::now());
            fs::rename(&self.path, &backup).map_err(|source| LogError::RotationFailed {
                path: self.path.clone(),
                source,
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|source| LogError::RotationFailed {
                path: self.path.clone(),
                source,
            })?;

        self.file = Some(file);
        self.size = 0;
        Ok(())
    }

    /// Apply retention; failures never block logging
    fn prune(&self) {
        match prune_backups_with(&self.path, &self.policy, Utc::now(), self.remove) {
            Ok(report) => {
                for (path, e) in report.failed {
                    eprintln!("failed to remove old log file {}: {}", path.display(), e);
                }
            }
            Err(e) => eprintln!(
                "failed to scan old log files for {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}

impl Write for RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let incoming = buf.len() as u64;

        if self.file.is_none() {
            self.open_existing_or_new(incoming)
                .map_err(LogError::into_io)?;
        }

        // An oversized write on an empty file is written whole
        if self.size > 0 && self.size + incoming > self.max_size {
            self.rotate().map_err(LogError::into_io)?;
        }

        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "log file not open"))?;
        file.write_all(buf)?;
        self.size += incoming;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}
