use anyhow::Result;
use std::path::PathBuf;

use komodo::h5::open_output;
use komodo::report::{git_info, gitref_text};

pub fn exec(fname: PathBuf) -> Result<()> {
    let root = open_output(&fname)?;
    let info = git_info(&root)?;
    print!("{}", gitref_text(&info));
    Ok(())
}
