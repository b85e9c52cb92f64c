use anyhow::{Context, Result};
use serde::Serialize;

use komodo::table::Table;

/// Pretty JSON of `rows` on stdout.
pub fn print_json<T: Serialize + ?Sized>(rows: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(rows).context("serialize JSON output")?;
    println!("{s}");
    Ok(())
}

/// Table on stdout, every row.
pub fn print_table(table: &Table) {
    print!("{table}");
}
