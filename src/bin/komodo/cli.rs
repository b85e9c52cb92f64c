use clap::{Parser, Subcommand};
use std::path::PathBuf;

use komodo::meraxes::XhWeight;

/// Command line utilities for simple Meraxes based tasks.
#[derive(Parser, Debug)]
#[command(name = "komodo", version, about, arg_required_else_help = true)]
pub struct Cli {
    /// Report snapshots with missing values and other read warnings
    #[arg(long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Hubble parameter to use instead of the one stored in the file
    #[arg(long = "little-h", global = true)]
    pub little_h: Option<f64>,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Global neutral hydrogen fraction for every snapshot
    #[command(name = "xHI_evo")]
    XhiEvo {
        fname: PathBuf,
        #[arg(long, short = 'w', value_enum, default_value_t = XhWeight::Volume)]
        weight: XhWeight,
        /// JSON output
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Snapshot, redshift and lookback time of every snapshot
    Snaplist {
        fname: PathBuf,
        /// JSON output
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Git ref (and uncommitted diff) of the Meraxes build that wrote the file
    Gitref { fname: PathBuf },
    /// Set up a new run directory
    ///
    /// Copies ../bin/meraxes, ../input/input.par and ../input/snaplist.txt
    /// from the current directory, or from $MERAXES_DIR/src when they are not
    /// all present here.
    Newrun {
        direc: PathBuf,
        /// Only copy executable.
        #[arg(long = "exec_only", default_value_t = false)]
        exec_only: bool,
    },
    /// Snapshots nearest to the requested redshifts
    ///
    /// Examples:
    ///   komodo select_snaps 6 7 8
    ///   komodo select_snaps --snaplist --alist ./alist.txt 5.5 10
    #[command(name = "select_snaps")]
    SelectSnaps {
        #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
        z: Vec<f64>,
        /// Create meraxes snaplist compatible output
        #[arg(long, default_value_t = false)]
        snaplist: bool,
        /// Meraxes compatible expansion factor list
        #[arg(long, value_parser = existing_path)]
        alist: Option<PathBuf>,
        /// JSON output (ignored with --snaplist)
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Galaxy properties stored in the file with units and h conversions
    #[command(name = "galaxy_props")]
    GalaxyProps {
        #[arg(value_parser = existing_path)]
        fname: PathBuf,
        /// JSON output
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn existing_path(s: &str) -> Result<PathBuf, String> {
    let p = PathBuf::from(s);
    if p.exists() {
        Ok(p)
    } else {
        Err(format!("path '{s}' does not exist"))
    }
}

impl Cli {
    pub fn parse() -> Self {
        <Cli as Parser>::parse()
    }
}
