//! Build script rendering the `lvm-wipe-check(1)` man page into `OUT_DIR`.

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::CommandFactory;
use clap_mangen::Man;

#[path = "src/cli/mod.rs"]
mod cli;

use cli::Cli;

const MANUAL: &str = "LVM Operator Checks";
const SOURCE: &str = concat!("lvm-wipe-check ", env!("CARGO_PKG_VERSION"));

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut cargo = io::stdout().lock();
    writeln!(cargo, "cargo:rerun-if-changed=build.rs")?;
    writeln!(cargo, "cargo:rerun-if-changed=src/cli/mod.rs")?;

    let out_dir = env::var_os("OUT_DIR")
        .map(PathBuf::from)
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "OUT_DIR was not set"))?;

    let command = Cli::command();
    let page = out_dir.join(format!("{}.1", command.get_name()));
    let man = Man::new(command).section("1").manual(MANUAL).source(SOURCE);

    let mut rendered = Vec::new();
    man.render(&mut rendered)?;
    fs::write(page, rendered)?;

    Ok(())
}
