use anyhow::{Context, Result};
use std::path::PathBuf;

use komodo::newrun::bootstrap;
use komodo::KomodoConfig;

pub fn exec(direc: PathBuf, exec_only: bool, cfg: &KomodoConfig) -> Result<()> {
    let cwd = std::env::current_dir().context("current directory")?;
    let written = bootstrap(&direc, exec_only, &cwd, cfg)?;
    println!("Copied {} file(s) into {}", written.len(), direc.display());
    Ok(())
}
