//! Binary entry point for `lvm-wipe-check`.

use std::io::{self, Write};
use std::process;

use camino::Utf8PathBuf;
use clap::Parser;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use lvm_wipe_check::{
    CheckError, ConfigError, ProcessCommandRunner, WipeCheck, WipeCheckConfig, WipeReport,
};

mod cli;

use cli::Cli;

/// Exit code when the volume group was wiped.
const EXIT_PASSED: i32 = 0;
/// Exit code when the volume group survived or could not be inspected.
const EXIT_FAILED: i32 = 1;
/// Exit code when the check itself could not complete.
const EXIT_ERROR: i32 = 2;

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("work directory {path} is unusable: {message}")]
    WorkDir { path: String, message: String },
    #[error(transparent)]
    Check(#[from] CheckError),
    #[error("failed to write report: {0}")]
    Report(#[from] io::Error),
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let exit_code = match run(&cli) {
        Ok(report) => exit_code_for(&report),
        Err(err) => {
            report_error(&err);
            EXIT_ERROR
        }
    };

    process::exit(exit_code);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<WipeReport, CliError> {
    let mut config = WipeCheckConfig::load_without_cli_args()?;
    apply_overrides(&mut config, cli);
    config.validate()?;

    let work_dir = resolve_work_dir(config.work_dir.trim())?;
    config.work_dir = work_dir.to_string();

    let check = WipeCheck::new(&config, ProcessCommandRunner::in_dir(work_dir))?;
    let report = check.execute()?;
    write_report(io::stdout(), &report)?;
    Ok(report)
}

fn apply_overrides(config: &mut WipeCheckConfig, cli: &Cli) {
    if let Some(volume_group) = &cli.volume_group {
        config.volume_group.clone_from(volume_group);
    }
    if let Some(namespace) = &cli.namespace {
        config.namespace.clone_from(namespace);
    }
    if let Some(backup_path) = &cli.backup_path {
        config.backup_path.clone_from(backup_path);
    }
    if let Some(work_dir) = &cli.work_dir {
        config.work_dir.clone_from(work_dir);
    }
    if cli.strict_inspection {
        config.strict_inspection = true;
    }
}

/// Makes the work directory absolute so commands started inside it and the
/// backup path agree on where the backup lives.
fn resolve_work_dir(work_dir: &str) -> Result<Utf8PathBuf, CliError> {
    Utf8PathBuf::from(work_dir)
        .canonicalize_utf8()
        .map_err(|err| CliError::WorkDir {
            path: work_dir.to_owned(),
            message: err.to_string(),
        })
}

const fn exit_code_for(report: &WipeReport) -> i32 {
    if report.verdict.is_pass() {
        EXIT_PASSED
    } else {
        EXIT_FAILED
    }
}

fn write_report(mut target: impl Write, report: &WipeReport) -> io::Result<()> {
    writeln!(
        target,
        "volume group {}: {}",
        report.volume_group, report.presence
    )?;
    writeln!(target, "restored from {}", report.backup_path)?;
    writeln!(target, "verdict: {}", report.verdict)
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}
