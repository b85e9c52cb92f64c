//! Expansion factor list ("alist"): entry `i` is the scale factor of snapshot `i`.
//!
//! Text format: one float per line, blank lines and `#` comments ignored.

use std::path::Path;

use anyhow::{Context, Result};
use log::debug;

use crate::config::KomodoConfig;
use crate::consts::{DEFAULT_ALIST, DEFAULT_ALIST_NAME};
use crate::error::KomodoError;

#[derive(Debug, Clone, PartialEq)]
pub struct ExpansionFactorTable {
    factors: Vec<f64>,
}

impl ExpansionFactorTable {
    /// Validate and wrap a list of expansion factors.
    pub fn new(factors: Vec<f64>) -> Result<Self> {
        if factors.is_empty() {
            return Err(KomodoError::InvalidTable {
                reason: "no entries".into(),
            }
            .into());
        }
        for (i, &a) in factors.iter().enumerate() {
            if !(a.is_finite() && a > 0.0) {
                return Err(KomodoError::InvalidTable {
                    reason: format!("entry {i} = {a} (must be finite and > 0)"),
                }
                .into());
            }
        }
        Ok(Self { factors })
    }

    /// Table compiled into the binary.
    pub fn bundled() -> Result<Self> {
        Self::parse(DEFAULT_ALIST, Path::new(DEFAULT_ALIST_NAME))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read expansion factor list {}", path.display()))?;
        let table = Self::parse(&text, path)?;
        debug!("alist: {} entries from {}", table.len(), path.display());
        Ok(table)
    }

    /// Explicit file if given, otherwise the bundled table.
    pub fn load_or_bundled(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Self::bundled(),
        }
    }

    /// Table named by `cfg.alist` (`--alist`, then `KOMODO_ALIST`), else bundled.
    pub fn from_config(cfg: &KomodoConfig) -> Result<Self> {
        Self::load_or_bundled(cfg.alist.as_deref())
    }

    /// Parse alist text; `origin` is only used in error messages.
    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        let mut factors = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            for token in line.split_whitespace() {
                let a = token.parse::<f64>().map_err(|_| KomodoError::TableParse {
                    path: origin.to_path_buf(),
                    line: lineno + 1,
                    token: token.to_string(),
                })?;
                factors.push(a);
            }
        }
        Self::new(factors)
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    pub fn factors(&self) -> &[f64] {
        &self.factors
    }

    /// z = 1/a - 1, index preserved.
    pub fn redshifts(&self) -> Vec<f64> {
        self.factors.iter().map(|a| 1.0 / a - 1.0).collect()
    }
}
