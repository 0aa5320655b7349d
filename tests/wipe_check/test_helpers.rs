//! Shared fixtures and helpers for wipe check BDD scenarios.

use std::sync::Arc;

use lvm_wipe_check::test_support::ScriptedRunner;
use lvm_wipe_check::{WipeCheckConfig, WipeReport};
use rstest::fixture;
use tempfile::TempDir;

pub const EXPORTED_YAML: &str = "apiVersion: v1\nitems:\n- kind: LVMCluster\n  metadata:\n    name: my-lvmcluster\nkind: List\n";

#[derive(Clone, Debug)]
pub enum CheckOutcome {
    Completed(WipeReport),
    Aborted(String),
}

#[derive(Clone, Debug)]
pub struct WipeContext {
    pub config: WipeCheckConfig,
    pub runner: ScriptedRunner,
    pub outcome: Option<CheckOutcome>,
    pub(crate) work_tmp: Arc<TempDir>,
}

#[fixture]
pub fn wipe_context() -> WipeContext {
    let work_tmp = TempDir::new().unwrap_or_else(|err| panic!("tempdir: {err}"));
    let work_dir = work_tmp
        .path()
        .to_str()
        .unwrap_or_else(|| panic!("tempdir should be utf8"))
        .to_owned();

    WipeContext {
        config: WipeCheckConfig {
            oc_bin: String::from("oc"),
            vgs_bin: String::from("vgs"),
            namespace: String::from("openshift-lvm-storage"),
            resource_kind: String::from("lvmcluster"),
            volume_group: String::from("vg1"),
            backup_path: String::from("lvmcluster-backup.yaml"),
            work_dir,
            strict_inspection: false,
        },
        runner: ScriptedRunner::new(),
        outcome: None,
        work_tmp: Arc::new(work_tmp),
    }
}
