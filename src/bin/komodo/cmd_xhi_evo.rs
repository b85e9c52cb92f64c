use anyhow::Result;
use std::path::PathBuf;

use komodo::h5::open_output;
use komodo::meraxes::XhWeight;
use komodo::report::{xhi_evolution, xhi_table};
use komodo::KomodoConfig;

use super::util::{print_json, print_table};

pub fn exec(fname: PathBuf, weight: XhWeight, json: bool, cfg: &KomodoConfig) -> Result<()> {
    let root = open_output(&fname)?;
    let rows = xhi_evolution(&root, weight, &cfg.report())?;
    if json {
        return print_json(&rows);
    }
    print_table(&xhi_table(&rows));
    Ok(())
}
