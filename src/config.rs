//! Configuration loading via `ortho-config`.

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

/// Namespace the LVM operator runs in on OpenShift clusters.
pub const DEFAULT_NAMESPACE: &str = "openshift-lvm-storage";

/// Custom resource kind deleted to trigger the operator's cleanup.
pub const DEFAULT_RESOURCE_KIND: &str = "lvmcluster";

/// Volume group the operator is expected to wipe.
pub const DEFAULT_VOLUME_GROUP: &str = "vg1";

/// Backup file written before deletion, relative to the work directory.
pub const DEFAULT_BACKUP_PATH: &str = "lvmcluster-backup.yaml";

/// Settings for a wipe check, merged from defaults, configuration files and
/// `LVM_WIPE_*` environment variables.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "LVM_WIPE",
    discovery(
        app_name = "lvm-wipe-check",
        env_var = "LVM_WIPE_CONFIG_PATH",
        config_file_name = "lvm-wipe-check.toml",
        dotfile_name = ".lvm-wipe-check.toml",
        project_file_name = "lvm-wipe-check.toml"
    )
)]
pub struct WipeCheckConfig {
    /// Path to the cluster client (`oc` or a compatible `kubectl`).
    #[ortho_config(default = "oc".to_owned())]
    pub oc_bin: String,
    /// Path to the LVM `vgs` executable.
    #[ortho_config(default = "vgs".to_owned())]
    pub vgs_bin: String,
    /// Namespace holding the custom resources under test.
    #[ortho_config(default = DEFAULT_NAMESPACE.to_owned())]
    pub namespace: String,
    /// Custom resource kind to back up, delete and restore.
    #[ortho_config(default = DEFAULT_RESOURCE_KIND.to_owned())]
    pub resource_kind: String,
    /// Volume group that must be gone once the resource is deleted.
    #[ortho_config(default = DEFAULT_VOLUME_GROUP.to_owned())]
    pub volume_group: String,
    /// Backup file location. Relative paths resolve against `work_dir`.
    #[ortho_config(default = DEFAULT_BACKUP_PATH.to_owned())]
    pub backup_path: String,
    /// Directory external commands run in and the backup is written to.
    #[ortho_config(default = ".".to_owned())]
    pub work_dir: String,
    /// Treat a failing `vgs` invocation as inconclusive instead of as a
    /// wiped volume group.
    #[ortho_config(default = false)]
    pub strict_inspection: bool,
}

/// Metadata for a configuration field, used to generate actionable error messages.
struct FieldMetadata {
    field: &'static str,
    env_var: &'static str,
}

impl FieldMetadata {
    const fn new(field: &'static str, env_var: &'static str) -> Self {
        Self { field, env_var }
    }
}

impl WipeCheckConfig {
    /// Loads configuration without attempting to parse CLI arguments. Values
    /// merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("lvm-wipe-check")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Ensures every string setting is present after trimming whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConfig`] naming the first blank field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            (&self.oc_bin, FieldMetadata::new("oc_bin", "LVM_WIPE_OC_BIN")),
            (&self.vgs_bin, FieldMetadata::new("vgs_bin", "LVM_WIPE_VGS_BIN")),
            (
                &self.namespace,
                FieldMetadata::new("namespace", "LVM_WIPE_NAMESPACE"),
            ),
            (
                &self.resource_kind,
                FieldMetadata::new("resource_kind", "LVM_WIPE_RESOURCE_KIND"),
            ),
            (
                &self.volume_group,
                FieldMetadata::new("volume_group", "LVM_WIPE_VOLUME_GROUP"),
            ),
            (
                &self.backup_path,
                FieldMetadata::new("backup_path", "LVM_WIPE_BACKUP_PATH"),
            ),
            (
                &self.work_dir,
                FieldMetadata::new("work_dir", "LVM_WIPE_WORK_DIR"),
            ),
        ];

        for (value, metadata) in fields {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidConfig {
                    field: metadata.field.to_owned(),
                    env_var: metadata.env_var.to_owned(),
                });
            }
        }
        Ok(())
    }

    /// Policy applied to `vgs` failures other than a reported missing group.
    #[must_use]
    pub const fn inspection_policy(&self) -> InspectionPolicy {
        if self.strict_inspection {
            InspectionPolicy::Strict
        } else {
            InspectionPolicy::Lenient
        }
    }

    /// Work directory as a UTF-8 path, without surrounding whitespace.
    #[must_use]
    pub fn work_dir_path(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.work_dir.trim())
    }
}

/// How an inconclusive volume-group inspection feeds into the verdict.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum InspectionPolicy {
    /// Any inspection failure counts as the group being gone.
    #[default]
    Lenient,
    /// Inspection failures make the verdict inconclusive.
    Strict,
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty.
    #[error("missing {field}: set {env_var} or add {field} to lvm-wipe-check.toml")]
    InvalidConfig {
        /// Name of the blank field.
        field: String,
        /// Environment variable that sets the field.
        env_var: String,
    },
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}
