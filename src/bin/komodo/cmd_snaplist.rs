use anyhow::Result;
use std::path::PathBuf;

use komodo::h5::open_output;
use komodo::report::{snaplist, snaplist_table};
use komodo::KomodoConfig;

use super::util::{print_json, print_table};

pub fn exec(fname: PathBuf, json: bool, cfg: &KomodoConfig) -> Result<()> {
    let root = open_output(&fname)?;
    let rows = snaplist(&root, &cfg.report())?;
    if json {
        return print_json(&rows);
    }
    print_table(&snaplist_table(&rows));
    Ok(())
}
