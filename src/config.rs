//! Centralized configuration for komodo.
//!
//! - `KomodoConfig::from_env()` collects every env lookup in one place.
//! - CLI flags override individual fields through the `with_*` setters.
//! - Reporting calls receive an explicit `ReportConfig` instead of relying on a
//!   process-wide verbosity switch.

use std::path::PathBuf;

use crate::consts::{ENV_ALIST, ENV_LITTLE_H, ENV_MERAXES_DIR, ENV_QUIET};

/// Top-level configuration for all commands.
#[derive(Clone, Debug)]
pub struct KomodoConfig {
    /// Meraxes installation root used by `newrun` when run files are not found
    /// relative to the current directory.
    /// Env: MERAXES_DIR
    pub meraxes_dir: Option<PathBuf>,

    /// Expansion factor list for `select_snaps` when --alist is not given.
    /// If None, the bundled default table is used.
    /// Env: KOMODO_ALIST
    pub alist: Option<PathBuf>,

    /// Hubble parameter override. If None, read from the simulation file.
    /// Env: KOMODO_LITTLE_H
    pub little_h: Option<f64>,

    /// Suppress per-snapshot warnings while reading (default true).
    /// Env: KOMODO_QUIET = 0|1|true|false
    pub quiet: bool,
}

impl Default for KomodoConfig {
    fn default() -> Self {
        Self {
            meraxes_dir: None,
            alist: None,
            little_h: None,
            quiet: true,
        }
    }
}

/// Options threaded through the reporting functions.
#[derive(Clone, Copy, Debug)]
pub struct ReportConfig {
    pub quiet: bool,
    pub little_h: Option<f64>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            quiet: true,
            little_h: None,
        }
    }
}

impl KomodoConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var(ENV_MERAXES_DIR) {
            let s = v.trim();
            if !s.is_empty() {
                cfg.meraxes_dir = Some(PathBuf::from(s));
            }
        }

        if let Ok(v) = std::env::var(ENV_ALIST) {
            let s = v.trim();
            if !s.is_empty() {
                cfg.alist = Some(PathBuf::from(s));
            }
        }

        if let Ok(v) = std::env::var(ENV_LITTLE_H) {
            if let Ok(h) = v.trim().parse::<f64>() {
                cfg.little_h = Some(h);
            }
        }

        if let Ok(v) = std::env::var(ENV_QUIET) {
            cfg.quiet = parse_bool(&v);
        }

        cfg
    }

    pub fn with_meraxes_dir<P: Into<PathBuf>>(mut self, dir: Option<P>) -> Self {
        self.meraxes_dir = dir.map(Into::into);
        self
    }

    pub fn with_alist<P: Into<PathBuf>>(mut self, alist: Option<P>) -> Self {
        self.alist = alist.map(Into::into);
        self
    }

    pub fn with_little_h(mut self, h: Option<f64>) -> Self {
        self.little_h = h;
        self
    }

    pub fn with_quiet(mut self, on: bool) -> Self {
        self.quiet = on;
        self
    }

    /// Options for the reporting commands.
    pub fn report(&self) -> ReportConfig {
        ReportConfig {
            quiet: self.quiet,
            little_h: self.little_h,
        }
    }
}

fn parse_bool(v: &str) -> bool {
    let s = v.trim().to_ascii_lowercase();
    s == "1" || s == "true" || s == "yes" || s == "on"
}
