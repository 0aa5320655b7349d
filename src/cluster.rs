//! Cluster client wrapper around `oc`.
//!
//! Exports, deletes and re-applies the custom resources whose removal is
//! expected to trigger the operator's volume-group wipe.

use std::ffi::OsString;

use camino::Utf8Path;
use thiserror::Error;
use tracing::debug;

use crate::runner::{CommandOutput, CommandRunner, RunnerError, render_command};

/// Errors returned by the cluster client.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ClusterError {
    /// Raised when the cluster client returns a non-zero exit status.
    #[error("`{command}` exited with status {status_text}: {stderr}")]
    CommandFailure {
        /// Rendered command line.
        command: String,
        /// Exit status reported by the OS.
        status: Option<i32>,
        /// Human readable representation of the exit status.
        status_text: String,
        /// Stderr captured from the command.
        stderr: String,
    },
    /// Raised when command execution fails.
    #[error(transparent)]
    Runner(#[from] RunnerError),
}

/// Runs `oc` against one resource kind in one namespace.
#[derive(Clone, Debug)]
pub struct ClusterClient<R: CommandRunner> {
    oc_bin: String,
    resource_kind: String,
    namespace: String,
    runner: R,
}

impl<R: CommandRunner> ClusterClient<R> {
    /// Creates a client for `resource_kind` objects in `namespace`.
    #[must_use]
    pub fn new(
        oc_bin: impl Into<String>,
        resource_kind: impl Into<String>,
        namespace: impl Into<String>,
        runner: R,
    ) -> Self {
        Self {
            oc_bin: oc_bin.into(),
            resource_kind: resource_kind.into(),
            namespace: namespace.into(),
            runner,
        }
    }

    /// Resource kind this client operates on.
    #[must_use]
    pub fn resource_kind(&self) -> &str {
        &self.resource_kind
    }

    /// Namespace this client operates in.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Serialises every resource of the configured kind as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError`] when `oc get` cannot run or fails.
    pub fn export_yaml(&self) -> Result<String, ClusterError> {
        let args = vec![
            OsString::from("get"),
            OsString::from(&self.resource_kind),
            OsString::from("-n"),
            OsString::from(&self.namespace),
            OsString::from("-o"),
            OsString::from("yaml"),
        ];
        self.run_oc(&args).map(|output| output.stdout)
    }

    /// Deletes every resource of the configured kind in the namespace.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError`] when `oc delete` cannot run or fails.
    pub fn delete_all(&self) -> Result<(), ClusterError> {
        let args = vec![
            OsString::from("delete"),
            OsString::from(&self.resource_kind),
            OsString::from("--all"),
            OsString::from("-n"),
            OsString::from(&self.namespace),
        ];
        self.run_oc(&args).map(|_| ())
    }

    /// Applies the resource definitions stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError`] when `oc apply` cannot run or fails.
    pub fn apply_file(&self, path: &Utf8Path) -> Result<(), ClusterError> {
        let args = vec![
            OsString::from("apply"),
            OsString::from("-f"),
            OsString::from(path.as_str()),
        ];
        self.run_oc(&args).map(|_| ())
    }

    fn run_oc(&self, args: &[OsString]) -> Result<CommandOutput, ClusterError> {
        let command = render_command(&self.oc_bin, args);
        debug!(%command, "running cluster command");
        let output = self.runner.run(&self.oc_bin, args)?;
        if output.is_success() {
            return Ok(output);
        }

        Err(ClusterError::CommandFailure {
            command,
            status: output.code,
            status_text: output.status_text(),
            stderr: output.stderr.trim().to_owned(),
        })
    }
}
