//! Run directory bootstrap: copy the Meraxes executable (and optionally the
//! input files) into a new run directory.
//!
//! Source resolution:
//! - every run file present relative to `cwd` => copy from there; the
//!   environment is not consulted;
//! - otherwise copy from `$MERAXES_DIR/src`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::config::KomodoConfig;
use crate::consts::{ENV_MERAXES_DIR, MERAXES_SRC_SUBDIR, RUN_FILES};
use crate::error::KomodoError;

/// Relative paths of the files to copy.
pub fn run_files(exec_only: bool) -> &'static [&'static str] {
    if exec_only {
        &RUN_FILES[..1]
    } else {
        &RUN_FILES[..]
    }
}

/// Directory that the relative run-file paths are resolved against.
pub fn resolve_source_root(cwd: &Path, files: &[&str], cfg: &KomodoConfig) -> Result<PathBuf> {
    if files.iter().all(|f| cwd.join(f).exists()) {
        debug!("newrun: run files found relative to {}", cwd.display());
        return Ok(cwd.to_path_buf());
    }
    let dir = cfg
        .meraxes_dir
        .as_ref()
        .ok_or(KomodoError::EnvironmentNotConfigured {
            var: ENV_MERAXES_DIR,
        })?;
    let root = dir.join(MERAXES_SRC_SUBDIR);
    debug!("newrun: using {} from {ENV_MERAXES_DIR}", root.display());
    Ok(root)
}

/// Copy the run files into `direc` (created if missing). Returns the written paths.
pub fn bootstrap(direc: &Path, exec_only: bool, cwd: &Path, cfg: &KomodoConfig) -> Result<Vec<PathBuf>> {
    let files = run_files(exec_only);
    let root = resolve_source_root(cwd, files, cfg)?;

    // Check everything before touching the target.
    let mut plan = Vec::with_capacity(files.len());
    for f in files {
        let src = root.join(f);
        let name = Path::new(f)
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(f));
        if !src.is_file() {
            let mut tried = vec![cwd.join(f)];
            if src != tried[0] {
                tried.push(src);
            }
            return Err(KomodoError::MissingSourceFile {
                name: name.display().to_string(),
                tried,
            }
            .into());
        }
        plan.push((src, direc.join(name)));
    }

    if !direc.exists() {
        fs::create_dir_all(direc)
            .with_context(|| format!("create run directory {}", direc.display()))?;
        info!("created {}", direc.display());
    }

    let mut written = Vec::with_capacity(plan.len());
    for (src, dst) in plan {
        fs::copy(&src, &dst)
            .with_context(|| format!("copy {} -> {}", src.display(), dst.display()))?;
        info!("copied {} -> {}", src.display(), dst.display());
        written.push(dst);
    }
    Ok(written)
}
