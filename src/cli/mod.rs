//! Command-line interface definitions for the `lvm-wipe-check` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page.

use clap::Parser;

/// Top-level CLI for the `lvm-wipe-check` binary.
///
/// Flags override values loaded from `lvm-wipe-check.toml` and `LVM_WIPE_*`
/// environment variables.
#[derive(Debug, Parser)]
#[command(
    name = "lvm-wipe-check",
    version,
    about = "Verify that deleting an LVMCluster wipes its volume group"
)]
pub(crate) struct Cli {
    /// Volume group that must be gone after the custom resources are deleted.
    #[arg(long, value_name = "NAME")]
    pub(crate) volume_group: Option<String>,
    /// Namespace holding the custom resources under test.
    #[arg(long, value_name = "NAMESPACE")]
    pub(crate) namespace: Option<String>,
    /// Where to write the backup before deleting the custom resources.
    #[arg(long, value_name = "PATH")]
    pub(crate) backup_path: Option<String>,
    /// Directory commands run in and relative backup paths resolve against.
    #[arg(long, value_name = "DIR")]
    pub(crate) work_dir: Option<String>,
    /// Report a failing `vgs` as inconclusive instead of as a wiped group.
    #[arg(long)]
    pub(crate) strict_inspection: bool,
}
