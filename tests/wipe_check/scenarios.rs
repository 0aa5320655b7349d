//! BDD scenarios for the wipe check sequence.

use rstest_bdd_macros::scenario;

use super::test_helpers::{WipeContext, wipe_context};

#[scenario(
    path = "tests/features/wipe_check.feature",
    name = "Pass when deleting the LVMCluster wipes the volume group"
)]
fn scenario_pass_when_wiped(wipe_context: WipeContext) {
    let _ = wipe_context;
}

#[scenario(
    path = "tests/features/wipe_check.feature",
    name = "Fail when the volume group survives and still restore"
)]
fn scenario_fail_when_volume_group_survives(wipe_context: WipeContext) {
    let _ = wipe_context;
}

#[scenario(
    path = "tests/features/wipe_check.feature",
    name = "Abort before deleting when the backup fails"
)]
fn scenario_abort_when_backup_fails(wipe_context: WipeContext) {
    let _ = wipe_context;
}

#[scenario(
    path = "tests/features/wipe_check.feature",
    name = "Report a failing inspection as inconclusive under the strict policy"
)]
fn scenario_strict_inspection_is_inconclusive(wipe_context: WipeContext) {
    let _ = wipe_context;
}
