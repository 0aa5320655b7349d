//! Cleanup verification for the LVM operator's force-wipe option.
//!
//! The check backs up the storage-cluster custom resources, deletes them,
//! inspects the host for the volume group the operator should have wiped and
//! finally re-applies the backup. The verdict is settled before the restore,
//! and the restore runs whatever the verdict is so the cluster ends up where
//! it started.

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::backup::{BackupError, BackupStore};
use crate::cluster::{ClusterClient, ClusterError};
use crate::config::{ConfigError, InspectionPolicy, WipeCheckConfig};
use crate::lvm::{VolumeGroupPresence, VolumeGroupProbe};
use crate::runner::CommandRunner;

/// Outcome of the cleanup verification.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Verdict {
    /// The volume group is gone.
    Passed,
    /// The volume group survived the deletion.
    Failed,
    /// `vgs` could not tell, and the strict policy is active.
    Inconclusive,
}

impl Verdict {
    /// Returns `true` for [`Verdict::Passed`].
    #[must_use]
    pub const fn is_pass(self) -> bool {
        matches!(self, Self::Passed)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Inconclusive => "inconclusive",
        };
        f.write_str(text)
    }
}

/// Maps an inspection result to a verdict under `policy`.
#[must_use]
pub const fn verdict_for(presence: &VolumeGroupPresence, policy: InspectionPolicy) -> Verdict {
    match presence {
        VolumeGroupPresence::Present => Verdict::Failed,
        VolumeGroupPresence::Absent => Verdict::Passed,
        VolumeGroupPresence::InspectionFailed { .. } => match policy {
            InspectionPolicy::Lenient => Verdict::Passed,
            InspectionPolicy::Strict => Verdict::Inconclusive,
        },
    }
}

/// Summary of a completed check, including the restore.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WipeReport {
    /// Volume group that was inspected.
    pub volume_group: String,
    /// What `vgs` reported after the deletion.
    pub presence: VolumeGroupPresence,
    /// Verdict settled before the restore.
    pub verdict: Verdict,
    /// Backup file that was re-applied.
    pub backup_path: Utf8PathBuf,
}

/// Errors that abort the check.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Raised before any command runs when the configuration is incomplete.
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
    /// Raised when the resources cannot be exported.
    #[error("failed to back up {kind}: {source}")]
    Export {
        /// Resource kind being exported.
        kind: String,
        /// Underlying cluster client error.
        source: ClusterError,
    },
    /// Raised when the exported definition cannot be written to disk.
    #[error("failed to write backup: {0}")]
    BackupFile(#[source] BackupError),
    /// Raised when deleting the resources fails.
    #[error("failed to delete {kind}: {source}")]
    Delete {
        /// Resource kind being deleted.
        kind: String,
        /// Underlying cluster client error.
        source: ClusterError,
    },
    /// Raised when the backup is gone by the time it should be restored.
    #[error("cannot restore {kind} (verdict before restore: {verdict}): {source}")]
    MissingBackup {
        /// Resource kind being restored.
        kind: String,
        /// Verdict settled before the restore was attempted.
        verdict: Verdict,
        /// Underlying backup error.
        source: BackupError,
    },
    /// Raised when re-applying the backup fails.
    #[error("failed to restore {kind} (verdict before restore: {verdict}): {source}")]
    Restore {
        /// Resource kind being restored.
        kind: String,
        /// Verdict settled before the restore was attempted.
        verdict: Verdict,
        /// Underlying cluster client error.
        source: ClusterError,
    },
}

/// Runs the backup, delete, inspect and restore sequence.
#[derive(Clone, Debug)]
pub struct WipeCheck<R: CommandRunner> {
    cluster: ClusterClient<R>,
    probe: VolumeGroupProbe<R>,
    backup: BackupStore,
    volume_group: String,
    policy: InspectionPolicy,
}

impl<R: CommandRunner + Clone> WipeCheck<R> {
    /// Builds a check from validated configuration, sharing `runner` between
    /// the cluster client and the volume-group probe.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::InvalidConfig`] when validation fails.
    pub fn new(config: &WipeCheckConfig, runner: R) -> Result<Self, CheckError> {
        config.validate()?;
        Ok(Self {
            cluster: ClusterClient::new(
                config.oc_bin.trim(),
                config.resource_kind.trim(),
                config.namespace.trim(),
                runner.clone(),
            ),
            probe: VolumeGroupProbe::new(config.vgs_bin.trim(), runner),
            backup: BackupStore::new(
                &config.work_dir_path(),
                Utf8Path::new(config.backup_path.trim()),
            ),
            volume_group: config.volume_group.trim().to_owned(),
            policy: config.inspection_policy(),
        })
    }
}

impl<R: CommandRunner> WipeCheck<R> {
    /// Location the backup is written to and restored from.
    #[must_use]
    pub fn backup_path(&self) -> &Utf8Path {
        self.backup.path()
    }

    /// Runs the four steps in order.
    ///
    /// A failing backup or delete aborts immediately; when the delete fails
    /// the restore is not attempted and the backup file stays behind. The
    /// inspection never aborts. The restore runs for every verdict.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError`] when the backup, delete or restore step fails.
    /// A failed verdict is not an error; it is reported in [`WipeReport`].
    pub fn execute(&self) -> Result<WipeReport, CheckError> {
        let kind = self.cluster.resource_kind().to_owned();
        let namespace = self.cluster.namespace().to_owned();

        info!(step = 1, %kind, %namespace, backup = %self.backup.path(), "backing up custom resources");
        let exported = self
            .cluster
            .export_yaml()
            .map_err(|source| CheckError::Export {
                kind: kind.clone(),
                source,
            })?;
        self.backup.write(&exported).map_err(CheckError::BackupFile)?;
        info!(step = 1, "custom resources backed up");

        info!(step = 2, %kind, %namespace, "deleting custom resources to trigger cleanup");
        self.cluster
            .delete_all()
            .map_err(|source| CheckError::Delete {
                kind: kind.clone(),
                source,
            })?;
        info!(step = 2, "custom resources deleted");

        info!(step = 3, volume_group = %self.volume_group, "checking whether the volume group was wiped");
        let presence = self.probe.inspect(&self.volume_group);
        let verdict = verdict_for(&presence, self.policy);
        self.log_verdict(&presence, verdict);

        info!(step = 4, %kind, backup = %self.backup.path(), "restoring custom resources");
        self.restore(&kind, verdict)?;
        info!(step = 4, "custom resources restored");

        Ok(WipeReport {
            volume_group: self.volume_group.clone(),
            presence,
            verdict,
            backup_path: self.backup.path().to_path_buf(),
        })
    }

    fn restore(&self, kind: &str, verdict: Verdict) -> Result<(), CheckError> {
        self.backup
            .ensure_exists()
            .map_err(|source| CheckError::MissingBackup {
                kind: kind.to_owned(),
                verdict,
                source,
            })?;
        self.cluster
            .apply_file(self.backup.path())
            .map_err(|source| CheckError::Restore {
                kind: kind.to_owned(),
                verdict,
                source,
            })
    }

    fn log_verdict(&self, presence: &VolumeGroupPresence, verdict: Verdict) {
        let volume_group = self.volume_group.as_str();
        match (presence, verdict) {
            (VolumeGroupPresence::Present, _) => {
                error!(%volume_group, "volume group still exists; cleanup did not wipe it");
            }
            (VolumeGroupPresence::Absent, _) => {
                info!(%volume_group, "volume group no longer exists; cleanup wiped it");
            }
            (VolumeGroupPresence::InspectionFailed { .. }, Verdict::Inconclusive) => {
                error!(%volume_group, %presence, "volume group inspection failed; verdict is inconclusive");
            }
            (VolumeGroupPresence::InspectionFailed { .. }, _) => {
                warn!(%volume_group, %presence, "volume group inspection failed; treating it as wiped");
            }
        }
    }
}
