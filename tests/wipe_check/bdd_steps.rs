//! BDD step definitions for the wipe check sequence.

use lvm_wipe_check::WipeCheck;
use lvm_wipe_check::test_support::vgs_row;
use rstest_bdd_macros::{given, then, when};

use super::test_helpers::{CheckOutcome, EXPORTED_YAML, WipeContext};

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("assertion failed: {0}")]
    Assertion(String),
}

#[given("strict inspection is enabled")]
fn strict_inspection(mut wipe_context: WipeContext) -> WipeContext {
    wipe_context.config.strict_inspection = true;
    wipe_context
}

#[given("the LVMCluster resources can be backed up")]
fn export_succeeds(wipe_context: WipeContext) -> WipeContext {
    wipe_context.runner.push_output(Some(0), EXPORTED_YAML, "");
    wipe_context
}

#[given("the backup export fails")]
fn export_fails(wipe_context: WipeContext) -> WipeContext {
    wipe_context.runner.push_output(
        Some(1),
        "",
        "error: You must be logged in to the server (Unauthorized)",
    );
    wipe_context
}

#[given("the resources delete cleanly")]
fn delete_succeeds(wipe_context: WipeContext) -> WipeContext {
    wipe_context.runner.push_success();
    wipe_context
}

#[given("vgs reports the volume group as not found")]
fn vgs_not_found(wipe_context: WipeContext) -> WipeContext {
    let stderr = format!(
        "  Volume group \"{}\" not found\n",
        wipe_context.config.volume_group
    );
    wipe_context.runner.push_output(Some(5), "", stderr);
    wipe_context
}

#[given("vgs lists the volume group \"{name}\"")]
fn vgs_lists(wipe_context: WipeContext, name: String) -> WipeContext {
    wipe_context
        .runner
        .push_output(Some(0), vgs_row(name.trim()), "");
    wipe_context
}

#[given("vgs fails with a permission error")]
fn vgs_permission_error(wipe_context: WipeContext) -> WipeContext {
    wipe_context.runner.push_output(
        Some(5),
        "",
        "  /dev/mapper/control: open failed: Permission denied\n",
    );
    wipe_context
}

#[given("the restore applies cleanly")]
fn restore_succeeds(wipe_context: WipeContext) -> WipeContext {
    wipe_context.runner.push_success();
    wipe_context
}

#[when("I run the wipe check")]
fn run_check(mut wipe_context: WipeContext) -> WipeContext {
    let outcome = WipeCheck::new(&wipe_context.config, wipe_context.runner.clone())
        .and_then(|check| check.execute());
    wipe_context.outcome = Some(match outcome {
        Ok(report) => CheckOutcome::Completed(report),
        Err(err) => CheckOutcome::Aborted(err.to_string()),
    });
    wipe_context
}

#[then("the verdict is \"{verdict}\"")]
fn verdict_is(wipe_context: &WipeContext, verdict: String) -> Result<(), StepError> {
    let Some(outcome) = wipe_context.outcome.as_ref() else {
        return Err(StepError::Assertion(String::from("missing outcome")));
    };
    let CheckOutcome::Completed(report) = outcome else {
        return Err(StepError::Assertion(format!(
            "expected a completed check, got: {outcome:?}"
        )));
    };
    if report.verdict.to_string() == verdict.trim() {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected verdict {verdict}, got {}",
            report.verdict
        )))
    }
}

#[then("the backup is restored")]
fn backup_restored(wipe_context: &WipeContext) -> Result<(), StepError> {
    let invocations = wipe_context.runner.invocations();
    let Some(last) = invocations.last() else {
        return Err(StepError::Assertion(String::from("no commands were run")));
    };
    if !last.is_subcommand("apply") {
        return Err(StepError::Assertion(format!(
            "expected the final command to apply the backup, got: {}",
            last.command_string()
        )));
    }
    let backup = wipe_context.work_tmp.path().join("lvmcluster-backup.yaml");
    let contents = std::fs::read_to_string(&backup)
        .map_err(|err| StepError::Assertion(format!("backup unreadable: {err}")))?;
    if contents == EXPORTED_YAML {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "backup differs from the export: {contents}"
        )))
    }
}

#[then("the check aborts with \"{message}\"")]
fn check_aborts(wipe_context: &WipeContext, message: String) -> Result<(), StepError> {
    let Some(outcome) = wipe_context.outcome.as_ref() else {
        return Err(StepError::Assertion(String::from("missing outcome")));
    };
    let CheckOutcome::Aborted(error) = outcome else {
        return Err(StepError::Assertion(format!(
            "expected the check to abort, got: {outcome:?}"
        )));
    };
    if error.contains(message.trim()) {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected error containing {message}, got: {error}"
        )))
    }
}

#[then("no delete command was issued")]
fn no_delete(wipe_context: &WipeContext) -> Result<(), StepError> {
    let invocations = wipe_context.runner.invocations();
    if invocations.iter().any(|call| call.is_subcommand("delete")) {
        Err(StepError::Assertion(format!(
            "unexpected delete among: {:?}",
            wipe_context.runner.command_strings()
        )))
    } else {
        Ok(())
    }
}
