//! Error taxonomy for komodo operations.
//!
//! Functions return `anyhow::Result`; these variants are raised into it and can be
//! recovered by callers with `err.downcast_ref::<KomodoError>()`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum KomodoError {
    /// Empty table, or an expansion factor that cannot be turned into a redshift.
    #[error("invalid expansion factor table: {reason}")]
    InvalidTable { reason: String },

    /// Non-finite requested redshift.
    #[error("invalid redshift query at position {index}: {value}")]
    InvalidQuery { index: usize, value: f64 },

    /// Malformed line in an expansion factor file.
    #[error("{}:{line}: cannot parse '{token}' as a number", path.display())]
    TableParse {
        path: PathBuf,
        line: usize,
        token: String,
    },

    #[error("run file '{name}' not found (tried: {})", display_paths(tried))]
    MissingSourceFile { name: String, tried: Vec<PathBuf> },

    #[error("environment variable {var} is not set and run files are not present locally")]
    EnvironmentNotConfigured { var: &'static str },

    #[error("no galaxy property structure found in {}", path.display())]
    SchemaNotFound { path: PathBuf },

    /// Binary was compiled without the `hdf5` feature.
    #[error("cannot open {}: komodo was built without HDF5 support (enable feature `hdf5`)", path.display())]
    BackendUnavailable { path: PathBuf },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
