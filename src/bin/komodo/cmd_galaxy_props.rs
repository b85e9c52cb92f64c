use anyhow::Result;
use std::path::PathBuf;

use komodo::h5::open_output;
use komodo::report::{galaxy_props, galaxy_props_table};
use komodo::KomodoConfig;

use super::util::{print_json, print_table};

pub fn exec(fname: PathBuf, json: bool, cfg: &KomodoConfig) -> Result<()> {
    let rows = {
        let root = open_output(&fname)?;
        galaxy_props(&root, &fname, &cfg.report())?
    };
    if json {
        return print_json(&rows);
    }
    print_table(&galaxy_props_table(&rows));
    Ok(())
}
