//! Shared names: environment variables, run files, HDF5 layout of a Meraxes output.

// -------- Environment --------
pub const ENV_MERAXES_DIR: &str = "MERAXES_DIR";
pub const ENV_ALIST: &str = "KOMODO_ALIST";
pub const ENV_LITTLE_H: &str = "KOMODO_LITTLE_H";
pub const ENV_QUIET: &str = "KOMODO_QUIET";

// -------- Run bootstrap (newrun) --------
// Paths are relative to the resolution root (cwd or $MERAXES_DIR/src).
// The first entry is the executable; --exec_only keeps just that one.
pub const RUN_FILES: [&str; 3] = [
    "../bin/meraxes",
    "../input/input.par",
    "../input/snaplist.txt",
];
pub const MERAXES_SRC_SUBDIR: &str = "src";

// -------- Expansion factor list --------
pub const DEFAULT_ALIST_NAME: &str = "default_alist.txt";
pub const DEFAULT_ALIST: &str = include_str!("../data/default_alist.txt");

// -------- Meraxes output layout --------
pub const SNAP_GROUP_PREFIX: &str = "Snap";
pub const ATTR_REDSHIFT: &str = "Redshift";
pub const ATTR_LTTIME: &str = "LTTime";
pub const ATTR_XH_VOLUME: &str = "volume_weighted_global_xH";
pub const ATTR_XH_MASS: &str = "mass_weighted_global_xH";

pub const GROUP_INPUT_PARAMS: &str = "InputParams";
pub const ATTR_HUBBLE_H: &str = "Hubble_h";

pub const DATASET_GITDIFF: &str = "gitdiff";
pub const ATTR_GITREF: &str = "gitref";

pub const GROUP_UNITS: &str = "Units";
pub const GROUP_HUBBLE_CONV: &str = "HubbleConversions";
pub const DATASET_GALAXIES: &str = "Galaxies";

/// Placeholder printed for a value the file does not provide.
pub const MASKED: &str = "--";
