//! Verification harness for the LVM operator's force-wipe cleanup.
//!
//! Deleting the storage-cluster custom resource should make the operator wipe
//! the volume group it manages. The crate backs the resource up, deletes it,
//! asks `vgs` whether the volume group survived and restores the resource,
//! all through a [`CommandRunner`] seam so the sequence runs against real
//! tools or scripted fakes alike.

pub mod backup;
pub mod check;
pub mod cluster;
pub mod config;
pub mod lvm;
pub mod runner;
pub mod test_support;

pub use backup::{BackupError, BackupStore};
pub use check::{CheckError, Verdict, WipeCheck, WipeReport, verdict_for};
pub use cluster::{ClusterClient, ClusterError};
pub use config::{ConfigError, InspectionPolicy, WipeCheckConfig};
pub use lvm::{VolumeGroupPresence, VolumeGroupProbe};
pub use runner::{CommandOutput, CommandRunner, ProcessCommandRunner, RunnerError};
