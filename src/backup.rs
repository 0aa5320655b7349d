//! On-disk backup of the custom resource definition.
//!
//! The backup is written before the resources are deleted and applied again
//! once the volume group has been inspected. Its content is opaque YAML; only
//! its presence matters to the check.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use thiserror::Error;

/// Errors raised while accessing the backup file.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum BackupError {
    /// Raised when file system operations fail.
    #[error("failed to access {path}: {message}")]
    Io {
        /// Path that could not be accessed.
        path: Utf8PathBuf,
        /// Human-readable error message.
        message: String,
    },
    /// Raised when the configured path does not name a file.
    #[error("backup path {path} is missing a file name")]
    InvalidPath {
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// Raised when the backup is needed but was never written.
    #[error("backup file {path} does not exist")]
    Missing {
        /// Expected backup location.
        path: Utf8PathBuf,
    },
}

/// Location of the backup file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BackupStore {
    path: Utf8PathBuf,
}

impl BackupStore {
    /// Resolves `backup_path` against `work_dir`; absolute backup paths are
    /// kept as they are.
    #[must_use]
    pub fn new(work_dir: &Utf8Path, backup_path: &Utf8Path) -> Self {
        Self {
            path: work_dir.join(backup_path),
        }
    }

    /// Resolved backup file path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Writes `contents`, replacing any earlier backup. Missing parent
    /// directories are created.
    ///
    /// # Errors
    ///
    /// Returns [`BackupError`] when the directory or file cannot be written.
    pub fn write(&self, contents: &str) -> Result<(), BackupError> {
        let parent = self.parent();
        Dir::create_ambient_dir_all(parent, ambient_authority()).map_err(|err| {
            BackupError::Io {
                path: parent.to_path_buf(),
                message: err.to_string(),
            }
        })?;

        let dir = self.open_parent()?;
        dir.write(self.file_name()?, contents)
            .map_err(|err| self.io_error(&err))
    }

    /// Returns whether the backup file is present.
    ///
    /// # Errors
    ///
    /// Returns [`BackupError::Io`] when the parent directory exists but
    /// cannot be inspected.
    pub fn exists(&self) -> Result<bool, BackupError> {
        let file_name = self.file_name()?;
        match Dir::open_ambient_dir(self.parent(), ambient_authority()) {
            Ok(dir) => dir.try_exists(file_name).map_err(|err| self.io_error(&err)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(BackupError::Io {
                path: self.parent().to_path_buf(),
                message: err.to_string(),
            }),
        }
    }

    /// Fails unless the backup file is present.
    ///
    /// # Errors
    ///
    /// Returns [`BackupError::Missing`] when no backup was written, or any
    /// error from [`BackupStore::exists`].
    pub fn ensure_exists(&self) -> Result<(), BackupError> {
        if self.exists()? {
            Ok(())
        } else {
            Err(BackupError::Missing {
                path: self.path.clone(),
            })
        }
    }

    /// Reads the backup contents.
    ///
    /// # Errors
    ///
    /// Returns [`BackupError`] when the file cannot be read.
    pub fn read(&self) -> Result<String, BackupError> {
        let dir = self.open_parent()?;
        dir.read_to_string(self.file_name()?)
            .map_err(|err| self.io_error(&err))
    }

    fn parent(&self) -> &Utf8Path {
        match self.path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        }
    }

    fn file_name(&self) -> Result<&str, BackupError> {
        self.path
            .file_name()
            .ok_or_else(|| BackupError::InvalidPath {
                path: self.path.clone(),
            })
    }

    fn open_parent(&self) -> Result<Dir, BackupError> {
        let parent = self.parent();
        Dir::open_ambient_dir(parent, ambient_authority()).map_err(|err| BackupError::Io {
            path: parent.to_path_buf(),
            message: err.to_string(),
        })
    }

    fn io_error(&self, err: &io::Error) -> BackupError {
        BackupError::Io {
            path: self.path.clone(),
            message: err.to_string(),
        }
    }
}
