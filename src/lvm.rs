//! Volume-group inspection through the LVM `vgs` tool.
//!
//! The probe never fails: whatever `vgs` does is folded into a
//! [`VolumeGroupPresence`] so the caller can decide how much an inconclusive
//! inspection should count.

use std::ffi::OsString;
use std::fmt;

use tracing::debug;

use crate::runner::{CommandRunner, render_command};

/// Outcome of one `vgs` inspection.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum VolumeGroupPresence {
    /// `vgs` listed the volume group.
    Present,
    /// `vgs` succeeded without listing the group, or reported it as not
    /// found.
    Absent,
    /// `vgs` could not be run or failed for another reason.
    InspectionFailed {
        /// Exit status, when the process ran at all.
        status: Option<i32>,
        /// Stderr or spawn error text.
        message: String,
    },
}

impl VolumeGroupPresence {
    /// Returns `true` only when the group was positively listed.
    ///
    /// Inspection failures read as "not present".
    #[must_use]
    pub const fn is_present(&self) -> bool {
        matches!(self, Self::Present)
    }
}

impl fmt::Display for VolumeGroupPresence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present => f.write_str("present"),
            Self::Absent => f.write_str("absent"),
            Self::InspectionFailed { status, message } => {
                let status_text =
                    status.map_or_else(|| String::from("unknown"), |code| code.to_string());
                write!(f, "inspection failed (status {status_text}): {message}")
            }
        }
    }
}

/// Runs `vgs` to find out whether a volume group still exists.
#[derive(Clone, Debug)]
pub struct VolumeGroupProbe<R: CommandRunner> {
    vgs_bin: String,
    runner: R,
}

impl<R: CommandRunner> VolumeGroupProbe<R> {
    /// Creates a probe using the `vgs` executable at `vgs_bin`.
    #[must_use]
    pub fn new(vgs_bin: impl Into<String>, runner: R) -> Self {
        Self {
            vgs_bin: vgs_bin.into(),
            runner,
        }
    }

    /// Inspects `volume_group` with `vgs <name> --noheadings --nosuffix`.
    ///
    /// The group is present when `vgs` exits zero and its output mentions the
    /// group name. A non-zero exit whose stderr carries LVM's own
    /// `Volume group "<name>" not found` message is a confirmed absence; every
    /// other failure is returned as [`VolumeGroupPresence::InspectionFailed`].
    pub fn inspect(&self, volume_group: &str) -> VolumeGroupPresence {
        let args = [
            OsString::from(volume_group),
            OsString::from("--noheadings"),
            OsString::from("--nosuffix"),
        ];
        debug!(command = %render_command(&self.vgs_bin, &args), "inspecting volume group");

        let output = match self.runner.run(&self.vgs_bin, &args) {
            Ok(output) => output,
            Err(err) => {
                return VolumeGroupPresence::InspectionFailed {
                    status: None,
                    message: err.to_string(),
                };
            }
        };

        if output.is_success() {
            if output.stdout.contains(volume_group) {
                return VolumeGroupPresence::Present;
            }
            return VolumeGroupPresence::Absent;
        }

        let not_found = format!("Volume group \"{volume_group}\" not found");
        if output.stderr.contains(&not_found) {
            return VolumeGroupPresence::Absent;
        }

        VolumeGroupPresence::InspectionFailed {
            status: output.code,
            message: output.stderr.trim().to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedRunner, vgs_row};
    use rstest::rstest;

    fn probe(runner: &ScriptedRunner) -> VolumeGroupProbe<ScriptedRunner> {
        VolumeGroupProbe::new("vgs", runner.clone())
    }

    #[test]
    fn listed_group_is_present() {
        let runner = ScriptedRunner::new();
        runner.push_output(Some(0), vgs_row("vg1"), "");

        assert_eq!(probe(&runner).inspect("vg1"), VolumeGroupPresence::Present);
        let invocations = runner.invocations();
        assert_eq!(
            invocations
                .first()
                .map(crate::test_support::CommandInvocation::command_string),
            Some(String::from("vgs vg1 --noheadings --nosuffix"))
        );
    }

    #[test]
    fn tab_separated_output_is_present() {
        let runner = ScriptedRunner::new();
        runner.push_output(Some(0), "vg1\t...\n", "");

        assert!(probe(&runner).inspect("vg1").is_present());
    }

    #[test]
    fn empty_output_is_absent() {
        let runner = ScriptedRunner::new();
        runner.push_output(Some(0), "", "");

        assert_eq!(probe(&runner).inspect("vg1"), VolumeGroupPresence::Absent);
    }

    #[test]
    fn not_found_exit_is_absent() {
        let runner = ScriptedRunner::new();
        runner.push_output(Some(5), "", "  Volume group \"vg1\" not found\n");

        assert_eq!(probe(&runner).inspect("vg1"), VolumeGroupPresence::Absent);
    }

    #[rstest]
    #[case(Some(5), "  WARNING: Running as a non-root user. Functionality may be unavailable.\n")]
    #[case(None, "")]
    #[case(Some(127), "sh: 1: vgs: not found\n")]
    #[case(Some(5), "  Volume group \"vg2\" not found\n")]
    fn other_failures_are_inspection_failures(#[case] code: Option<i32>, #[case] stderr: &str) {
        let runner = ScriptedRunner::new();
        runner.push_output(code, "", stderr);

        let presence = probe(&runner).inspect("vg1");

        assert_eq!(
            presence,
            VolumeGroupPresence::InspectionFailed {
                status: code,
                message: stderr.trim().to_owned(),
            }
        );
        assert!(!presence.is_present());
    }

    #[test]
    fn spawn_failure_is_an_inspection_failure() {
        let runner = ScriptedRunner::new();

        let presence = probe(&runner).inspect("vg1");

        let VolumeGroupPresence::InspectionFailed { status, message } = &presence else {
            panic!("expected inspection failure, got {presence:?}");
        };
        assert_eq!(*status, None);
        assert!(message.contains("failed to spawn vgs"), "message: {message}");
    }
}
