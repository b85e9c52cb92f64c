//! komodo: command line helpers for Meraxes semi-analytic model outputs.

pub mod consts;
pub mod config;
pub mod error;

// Snapshot selection
pub mod alist;
pub mod select;

// Hierarchical file access and Meraxes readers
pub mod tree;
pub mod h5;
pub mod meraxes;

// Output and commands
pub mod table;
pub mod report;
pub mod newrun;

pub use alist::ExpansionFactorTable;
pub use config::{KomodoConfig, ReportConfig};
pub use error::KomodoError;
pub use select::{select_snaps, snaplist_line, RedshiftQuery, Selection};
pub use tree::{MemNode, Node};
