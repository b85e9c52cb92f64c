use anyhow::Result;

use komodo::select::selection_table;
use komodo::{snaplist_line, ExpansionFactorTable, KomodoConfig, RedshiftQuery};

use super::util::{print_json, print_table};

pub fn exec(
    z: Vec<f64>,
    snaplist: bool,
    json: bool,
    cfg: &KomodoConfig,
) -> Result<()> {
    let table = ExpansionFactorTable::from_config(cfg)?;
    let rows = table.select(&RedshiftQuery::from(z))?;

    if snaplist {
        println!("{}", snaplist_line(&rows));
    } else if json {
        print_json(&rows)?;
    } else {
        print_table(&selection_table(&rows));
    }
    Ok(())
}
